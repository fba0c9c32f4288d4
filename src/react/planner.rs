//! Planner：系统指令、初始指令与单轮模型调用

use std::sync::Arc;

use crate::core::AgentError;
use crate::llm::{LlmClient, ModelTurn, ToolDefinition};
use crate::memory::{ConversationState, Message};

/// 固定的规划指令；max_chars 为短信长度上限
pub fn system_prompt(max_chars: usize) -> String {
    format!(
        "You are a dedicated AI Learning Planner. Your purpose is to ensure the user maximizes \
         their daily learning opportunities.\n\
         Action Flow: 1. Call get_today_events. 2. Based on event titles, call \
         get_top_github_recommendations for resources. 3. Synthesize the results. \
         4. Call send_sms_notification as the final action.\n\
         Constraints: The final message must be concise (<{max_chars} chars) and cite the top 1-2 \
         GitHub resources. If there are no events today, send a short message saying nothing is \
         scheduled instead of searching for resources."
    )
}

pub fn initial_instruction(recipient: &str) -> String {
    format!(
        "Generate today's complete learning schedule, find relevant hands-on resources, \
         and send the final message to the learner at {}.",
        recipient
    )
}

/// 持有 LLM 与 system prompt；每轮把 system + 会话消息 + 工具目录交给模型
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// LLM 累计 token 使用统计
    pub fn token_usage(&self) -> (u64, u64, u64) {
        self.llm.token_usage()
    }

    pub async fn next_turn(
        &self,
        state: &ConversationState,
        tools: &[ToolDefinition],
    ) -> Result<ModelTurn, AgentError> {
        let mut full_messages = Vec::with_capacity(state.len() + 1);
        full_messages.push(Message::system(self.system_prompt.clone()));
        full_messages.extend(state.messages().iter().cloned());
        Ok(self.llm.complete(&full_messages, tools).await?)
    }
}
