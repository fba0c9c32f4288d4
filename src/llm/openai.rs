//! OpenAI 兼容 Chat Completions 客户端（原生 tool calling）
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点（Gemini OpenAI 兼容层、OpenAI、DeepSeek、自建代理等）：
//! 请求携带 `tools` 目录，响应中的 `tool_calls` 解析为 ToolCall，工具结果以 `role: tool` 消息回填。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionTools, CreateChatCompletionRequestArgs,
    FunctionCall,
};
use async_openai::Client;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm::{LlmClient, LlmError, ModelTurn, ToolCall, ToolDefinition};
use crate::memory::{Message, Role};

/// Token 使用统计（累计值）
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: Arc<AtomicU64>,
    pub completion_tokens: Arc<AtomicU64>,
    pub total_tokens: Arc<AtomicU64>,
}

impl TokenUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, prompt: u64, completion: u64) {
        self.prompt_tokens.fetch_add(prompt, Ordering::Relaxed);
        self.completion_tokens.fetch_add(completion, Ordering::Relaxed);
        self.total_tokens.fetch_add(prompt + completion, Ordering::Relaxed);
    }

    pub fn get(&self) -> (u64, u64, u64) {
        (
            self.prompt_tokens.load(Ordering::Relaxed),
            self.completion_tokens.load(Ordering::Relaxed),
            self.total_tokens.load(Ordering::Relaxed),
        )
    }
}

impl From<OpenAIError> for LlmError {
    fn from(e: OpenAIError) -> Self {
        match e {
            OpenAIError::Reqwest(e) if e.is_timeout() => LlmError::Timeout,
            OpenAIError::Reqwest(e) => LlmError::Transport(e.to_string()),
            OpenAIError::ApiError(e) => LlmError::Api(e.to_string()),
            other => LlmError::InvalidResponse(other.to_string()),
        }
    }
}

/// 工具目录项转为 API tool；ToolDefinition 与 FunctionObject 字段同名
fn to_openai_tool(def: &ToolDefinition) -> Result<ChatCompletionTools, LlmError> {
    serde_json::from_value(json!({ "type": "function", "function": def }))
        .map_err(|e| LlmError::InvalidResponse(format!("tool '{}': {}", def.name, e)))
}

fn to_openai_call(call: &ToolCall) -> ChatCompletionMessageToolCalls {
    ChatCompletionMessageToolCalls::Function(ChatCompletionMessageToolCall {
        id: call.id.clone(),
        function: FunctionCall {
            name: call.name.clone(),
            arguments: call.arguments.to_string(),
        },
    })
}

/// 内部 Message 转为 API 消息；Assistant 的 tool_calls 参数重新编码为 JSON 字符串
fn to_openai_messages(messages: &[Message]) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
    messages
        .iter()
        .map(|m| {
            let message: ChatCompletionRequestMessage = match m.role {
                Role::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(m.content.clone())
                    .build()?
                    .into(),
                Role::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(m.content.clone())
                    .build()?
                    .into(),
                Role::Assistant => {
                    let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                    if !m.content.is_empty() || m.tool_calls.is_empty() {
                        args.content(m.content.clone());
                    }
                    if !m.tool_calls.is_empty() {
                        args.tool_calls(m.tool_calls.iter().map(to_openai_call).collect::<Vec<_>>());
                    }
                    args.build()?.into()
                }
                Role::Tool => ChatCompletionRequestToolMessageArgs::default()
                    .content(m.content.clone())
                    .tool_call_id(m.tool_call_id.clone().unwrap_or_default())
                    .build()?
                    .into(),
            };
            Ok::<_, LlmError>(message)
        })
        .collect()
}

/// API tool_call 转为 ToolCall：arguments 非法 JSON 时保留原文，由工具层报参数错误
fn from_openai_call(call: ChatCompletionMessageToolCalls) -> Option<ToolCall> {
    let ChatCompletionMessageToolCalls::Function(call) = call else {
        tracing::warn!("Ignoring non-function tool call from model");
        return None;
    };
    let raw = call.function.arguments.trim();
    let arguments = if raw.is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    };
    let id = if call.id.is_empty() {
        format!("call_{}", uuid::Uuid::new_v4().simple())
    } else {
        call.id
    };
    Some(ToolCall {
        id,
        name: call.function.name,
        arguments,
    })
}

/// OpenAI 兼容客户端：持有 async_openai Client、model 名与请求超时
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
    /// 累计 token 使用统计
    pub usage: TokenUsage,
}

impl OpenAiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout_secs: u64) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(base_url.trim_end_matches('/'))
            .with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            timeout: Duration::from_secs(timeout_secs),
            usage: TokenUsage::new(),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ModelTurn, LlmError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(to_openai_messages(messages)?);
        if !tools.is_empty() {
            args.tools(
                tools
                    .iter()
                    .map(to_openai_tool)
                    .collect::<Result<Vec<_>, _>>()?,
            );
        }
        let request = args.build()?;

        // 客户端自带的限流重试可能拖很久，整体受 llm.timeouts.request 约束
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| LlmError::Timeout)??;

        if let Some(usage) = &response.usage {
            self.usage
                .add(usage.prompt_tokens as u64, usage.completion_tokens as u64);
        }

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| LlmError::InvalidResponse("response has no choices".to_string()))?;

        Ok(ModelTurn {
            text: message.content,
            tool_calls: message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .filter_map(from_openai_call)
                .collect(),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn token_usage(&self) -> (u64, u64, u64) {
        self.usage.get()
    }
}
