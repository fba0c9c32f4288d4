//! 模型后端预设（均走 OpenAI 兼容 Chat Completions 协议）
//!
//! - gemini: Google Gemini OpenAI 兼容层，默认 gemini-2.5-flash
//! - openai: api.openai.com
//! - deepseek: api.deepseek.com，默认模型 deepseek-chat

/// Gemini 默认模型
pub const GEMINI_FLASH: &str = "gemini-2.5-flash";
pub const DEEPSEEK_CHAT: &str = "deepseek-chat";

/// 单个后端的端点、默认模型与 API Key 环境变量（按优先级）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPreset {
    pub name: &'static str,
    pub base_url: &'static str,
    pub default_model: &'static str,
    pub key_env: &'static [&'static str],
}

pub const GEMINI: ProviderPreset = ProviderPreset {
    name: "gemini",
    base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
    default_model: GEMINI_FLASH,
    key_env: &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
};

pub const OPENAI: ProviderPreset = ProviderPreset {
    name: "openai",
    base_url: "https://api.openai.com/v1",
    default_model: "gpt-4o-mini",
    key_env: &["OPENAI_API_KEY"],
};

pub const DEEPSEEK: ProviderPreset = ProviderPreset {
    name: "deepseek",
    base_url: "https://api.deepseek.com",
    default_model: DEEPSEEK_CHAT,
    key_env: &["DEEPSEEK_API_KEY", "OPENAI_API_KEY"],
};

/// 按名称查找预设（大小写不敏感）；mock 与未知名称返回 None
pub fn preset(name: &str) -> Option<ProviderPreset> {
    match name.trim().to_lowercase().as_str() {
        "gemini" | "google" => Some(GEMINI),
        "openai" => Some(OPENAI),
        "deepseek" => Some(DEEPSEEK),
        _ => None,
    }
}
