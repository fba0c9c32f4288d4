//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `STUDY_BEE__*` 覆盖（双下划线表示嵌套，如 `STUDY_BEE__LLM__PROVIDER=openai`）。
//! 最后用部署沿用的扁平环境变量（TWILIO_ACCOUNT_SID、LEARNING_CALENDAR_ID 等）补齐仍为空的字段。

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::llm::preset;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub calendar: CalendarSection,
    pub github: GithubSection,
    pub twilio: TwilioSection,
    pub tools: ToolsSection,
    pub server: ServerSection,
}

/// [app] 段：收件人与规划轮数上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    /// 学习者手机号（不校验格式）
    pub recipient: Option<String>,
    pub max_iterations: usize,
    /// 写入系统指令的短信长度上限；不做机械截断
    pub max_message_chars: usize,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            recipient: None,
            max_iterations: 15,
            max_message_chars: 300,
        }
    }
}

/// [llm] 段：后端选择与超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// gemini / openai / deepseek / mock
    pub provider: String,
    /// 未设置时取后端预设的默认模型
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeouts: LlmTimeoutsSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: None,
            base_url: None,
            api_key: None,
            timeouts: LlmTimeoutsSection::default(),
        }
    }
}

impl LlmSection {
    pub fn is_mock(&self) -> bool {
        self.provider.trim().eq_ignore_ascii_case("mock")
    }

    pub fn effective_model(&self) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| preset(&self.provider).map(|p| p.default_model.to_string()))
            .unwrap_or_else(|| crate::llm::GEMINI_FLASH.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmTimeoutsSection {
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self { request: 60 }
    }
}

/// [calendar] 段
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalendarSection {
    pub calendar_id: Option<String>,
    /// access token 文件：`{"access_token": ...}` 或纯文本
    pub credentials_file: PathBuf,
    /// 直接提供的 OAuth access token，优先于 credentials_file
    pub access_token: Option<String>,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for CalendarSection {
    fn default() -> Self {
        Self {
            calendar_id: None,
            credentials_file: PathBuf::from("credentials.json"),
            access_token: None,
            api_base: "https://www.googleapis.com/calendar/v3".to_string(),
            timeout_secs: 15,
        }
    }
}

/// [github] 段
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubSection {
    /// 可选；缺失时匿名调用
    pub token: Option<String>,
    pub api_base: String,
    /// 设置后改用远端推荐服务
    pub recommendation_url: Option<String>,
    pub timeout_secs: u64,
    pub default_max_results: usize,
}

impl Default for GithubSection {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.github.com".to_string(),
            recommendation_url: None,
            timeout_secs: 15,
            default_max_results: 3,
        }
    }
}

/// [twilio] 段
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TwilioSection {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for TwilioSection {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_base: "https://api.twilio.com".to_string(),
            timeout_secs: 15,
        }
    }
}

/// 模型引用未注册工具时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownToolPolicy {
    /// 回填 "not registered" 失败结果，保证每个调用都有回应
    #[default]
    Report,
    /// 只记日志，不产生结果
    Drop,
}

/// [tools] 段：工具超时与调度
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// 单次工具调用超时（秒）
    pub tool_timeout_secs: u64,
    /// 同一轮内的非终止工具是否并发执行
    pub parallel_dispatch: bool,
    pub unknown_tool: UnknownToolPolicy,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            tool_timeout_secs: 30,
            parallel_dispatch: true,
            unknown_tool: UnknownToolPolicy::Report,
        }
    }
}

/// [server] 段：推荐服务监听地址
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub public_url: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            public_url: None,
        }
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    let empty = slot.as_deref().map_or(true, |s| s.trim().is_empty());
    if empty {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            *slot = Some(v);
        }
    }
}

fn present(v: &Option<String>) -> bool {
    v.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl AppConfig {
    /// 用扁平环境变量补齐仍为空的字段（lookup 通常为 `std::env::var(..).ok()`）
    pub fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fill(&mut self.app.recipient, lookup("LEARNER_PHONE_NUMBER"));

        fill(&mut self.calendar.calendar_id, lookup("LEARNING_CALENDAR_ID"));
        fill(
            &mut self.calendar.access_token,
            lookup("GOOGLE_CALENDAR_ACCESS_TOKEN"),
        );
        if let Some(path) = lookup("GOOGLE_CALENDAR_SERVICE_ACCOUNT_FILE").filter(|p| !p.is_empty()) {
            if self.calendar.credentials_file == CalendarSection::default().credentials_file {
                self.calendar.credentials_file = PathBuf::from(path);
            }
        }

        fill(&mut self.github.token, lookup("GITHUB_TOKEN"));
        fill(&mut self.github.recommendation_url, lookup("GITHUB_MCP_URL"));

        fill(&mut self.twilio.account_sid, lookup("TWILIO_ACCOUNT_SID"));
        fill(&mut self.twilio.auth_token, lookup("TWILIO_AUTH_TOKEN"));
        fill(&mut self.twilio.from_number, lookup("TWILIO_PHONE_NUMBER"));

        if let Some(p) = preset(&self.llm.provider) {
            for name in p.key_env {
                fill(&mut self.llm.api_key, lookup(name));
            }
        }
    }

    /// 规划运行前的必需项检查；返回第一个缺失项
    pub fn validate(&self) -> Result<(), String> {
        if self.app.max_iterations == 0 {
            return Err("app.max_iterations must be at least 1".to_string());
        }
        if !present(&self.app.recipient) {
            return Err("learner phone number is not set (app.recipient / LEARNER_PHONE_NUMBER)".to_string());
        }
        if !present(&self.calendar.calendar_id) {
            return Err("calendar id is not set (calendar.calendar_id / LEARNING_CALENDAR_ID)".to_string());
        }
        if !present(&self.twilio.account_sid)
            || !present(&self.twilio.auth_token)
            || !present(&self.twilio.from_number)
        {
            return Err("Twilio credentials must be set (TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN / TWILIO_PHONE_NUMBER)".to_string());
        }
        if !self.llm.is_mock() {
            if preset(&self.llm.provider).is_none() && self.llm.base_url.is_none() {
                return Err(format!("unknown llm provider '{}'", self.llm.provider));
            }
            if !present(&self.llm.api_key) {
                return Err(format!("API key for provider '{}' is not set", self.llm.provider));
            }
        }
        if !(1..=10).contains(&self.github.default_max_results) {
            return Err("github.default_max_results must be within 1..=10".to_string());
        }
        Ok(())
    }
}

/// 从 config 目录加载配置，环境变量 STUDY_BEE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 叠加环境变量 STUDY_BEE__*（不做类型推断，保证 "+1555..." 之类仍是字符串）
/// 4. 扁平环境变量补齐空字段
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut cfg = load_layers(config_path.as_deref(), "STUDY_BEE")?;
    cfg.apply_env_fallbacks(|name| std::env::var(name).ok());
    Ok(cfg)
}

fn load_layers(config_path: Option<&Path>, env_prefix: &str) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix(env_prefix)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(false),
    );

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn complete() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.app.recipient = Some("+15550001111".to_string());
        cfg.calendar.calendar_id = Some("learning@example.com".to_string());
        cfg.twilio.account_sid = Some("AC1".to_string());
        cfg.twilio.auth_token = Some("t".to_string());
        cfg.twilio.from_number = Some("+15559998888".to_string());
        cfg.llm.api_key = Some("k".to_string());
        cfg
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.app.max_iterations, 15);
        assert_eq!(cfg.llm.provider, "gemini");
        assert_eq!(cfg.llm.effective_model(), "gemini-2.5-flash");
        assert_eq!(cfg.tools.tool_timeout_secs, 30);
        assert_eq!(cfg.tools.unknown_tool, UnknownToolPolicy::Report);
        assert_eq!(cfg.github.default_max_results, 3);
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn validate_names_first_missing_value() {
        assert!(complete().validate().is_ok());

        let mut cfg = complete();
        cfg.twilio.auth_token = None;
        assert!(cfg.validate().unwrap_err().contains("Twilio"));

        let mut cfg = complete();
        cfg.app.max_iterations = 0;
        assert!(cfg.validate().unwrap_err().contains("max_iterations"));

        let mut cfg = complete();
        cfg.calendar.calendar_id = Some("  ".to_string());
        assert!(cfg.validate().unwrap_err().contains("calendar"));
    }

    #[test]
    fn mock_provider_needs_no_key() {
        let mut cfg = complete();
        cfg.llm.provider = "mock".to_string();
        cfg.llm.api_key = None;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn flat_env_fills_only_empty_fields() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LEARNER_PHONE_NUMBER", "+15550002222"),
            ("LEARNING_CALENDAR_ID", "from-env"),
            ("TWILIO_ACCOUNT_SID", "AC-env"),
            ("GOOGLE_CALENDAR_SERVICE_ACCOUNT_FILE", "/secrets/token.json"),
            ("GOOGLE_API_KEY", "gkey"),
        ]);
        let mut cfg = AppConfig::default();
        cfg.calendar.calendar_id = Some("from-file".to_string());
        cfg.apply_env_fallbacks(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.app.recipient.as_deref(), Some("+15550002222"));
        assert_eq!(cfg.calendar.calendar_id.as_deref(), Some("from-file"));
        assert_eq!(cfg.twilio.account_sid.as_deref(), Some("AC-env"));
        assert_eq!(cfg.calendar.credentials_file, PathBuf::from("/secrets/token.json"));
        assert_eq!(cfg.llm.api_key.as_deref(), Some("gkey"));
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.toml");
        std::fs::write(
            &path,
            r#"
[app]
recipient = "+15550003333"
max_iterations = 4

[llm]
provider = "deepseek"

[tools]
unknown_tool = "drop"
parallel_dispatch = false
"#,
        )
        .unwrap();

        let cfg = load_layers(Some(&path), "STUDY_BEE_TEST_UNUSED").unwrap();
        assert_eq!(cfg.app.recipient.as_deref(), Some("+15550003333"));
        assert_eq!(cfg.app.max_iterations, 4);
        assert_eq!(cfg.app.max_message_chars, 300);
        assert_eq!(cfg.llm.effective_model(), "deepseek-chat");
        assert_eq!(cfg.tools.unknown_tool, UnknownToolPolicy::Drop);
        assert!(!cfg.tools.parallel_dispatch);
        assert_eq!(cfg.tools.tool_timeout_secs, 30);
    }
}
