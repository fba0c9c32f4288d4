//! 工具注册表
//!
//! 工具集合在编译期固定为 ToolKind 的三个变体；每个工具以强类型参数实现 Tool trait，
//! 经 DynTool 擦除类型后由 ToolRegistry 按 ToolKind 存储，模型给出的名称只做精确匹配。

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::AgentError;
use crate::llm::ToolDefinition;
use crate::tools::schema::parameters_schema;

/// 可供模型调用的能力（一种工具一个变体）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    TodayEvents,
    Recommendations,
    /// 终止工具：成功发送即结束规划
    SendSms,
}

impl ToolKind {
    /// 工具目录顺序
    pub const ALL: [ToolKind; 3] = [
        ToolKind::TodayEvents,
        ToolKind::Recommendations,
        ToolKind::SendSms,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::TodayEvents => "get_today_events",
            ToolKind::Recommendations => "get_top_github_recommendations",
            ToolKind::SendSms => "send_sms_notification",
        }
    }

    /// 精确匹配，不做大小写或模糊匹配
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ToolKind::SendSms)
    }

    /// 供模型阅读的说明（含返回结构）
    pub fn description(self) -> &'static str {
        match self {
            ToolKind::TodayEvents => {
                "Fetch today's calendar events (UTC day). Returns a JSON array of \
                 {title, start_time, link}; an empty array means nothing is scheduled."
            }
            ToolKind::Recommendations => {
                "Retrieve, score and rank the top GitHub repositories for a learning event title. \
                 Ranking prioritises hands-on content (tutorials, examples, workshops) over raw \
                 star count. Returns a JSON array of {name, url, description, stars, score, language} \
                 sorted by score descending."
            }
            ToolKind::SendSms => {
                "Send the synthesized learning plan as an SMS to the recipient. This is the final \
                 action of the plan. Returns {sent, recipient} on success."
            }
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 强类型工具：参数由模型给出的 JSON 反序列化而来，成功值原样回填给模型
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    const KIND: ToolKind;
    type Args: DeserializeOwned + JsonSchema + Send;

    async fn call(&self, args: Self::Args) -> Result<Value, String>;
}

/// 类型擦除后的工具（注册表存储形式）
#[async_trait]
pub trait DynTool: Send + Sync {
    fn kind(&self) -> ToolKind;

    /// 工具目录项：名称、说明、参数 JSON Schema
    fn definition(&self) -> ToolDefinition;

    /// 解码参数并执行；参数不合法为 ArgumentDecode，工具失败为 ToolExecutionFailed
    async fn invoke(&self, args: Value) -> Result<Value, AgentError>;
}

#[async_trait]
impl<T: Tool> DynTool for T {
    fn kind(&self) -> ToolKind {
        T::KIND
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: T::KIND.name().to_string(),
            description: T::KIND.description().to_string(),
            parameters: parameters_schema::<T::Args>(),
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, AgentError> {
        // 无参工具的调用常以 null 给出
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        let typed: T::Args =
            serde_json::from_value(args).map_err(|e| AgentError::ArgumentDecode {
                tool: T::KIND.name().to_string(),
                message: e.to_string(),
            })?;
        self.call(typed).await.map_err(AgentError::ToolExecutionFailed)
    }
}

/// 工具注册表：ToolKind → Arc<dyn DynTool>；重复注册静默覆盖
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<ToolKind, Arc<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool) {
        self.tools.insert(tool.kind(), Arc::new(tool));
    }

    pub fn get(&self, kind: ToolKind) -> Option<Arc<dyn DynTool>> {
        self.tools.get(&kind).cloned()
    }

    /// 按模型给出的名称查找
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn DynTool>> {
        ToolKind::from_name(name).and_then(|k| self.get(k))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// 已注册工具的目录（按 ToolKind::ALL 顺序）
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        ToolKind::ALL
            .iter()
            .filter_map(|k| self.tools.get(k))
            .map(|t| t.definition())
            .collect()
    }
}
