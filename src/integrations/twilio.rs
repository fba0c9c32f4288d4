//! Twilio 短信发送
//!
//! POST {api_base}/2010-04-01/Accounts/{sid}/Messages.json，表单 To / From / Body，HTTP basic auth。
//! 任何失败只记录日志并返回 false；不校验正文长度。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::TwilioSection;
use crate::integrations::{IntegrationError, NotificationSender};

#[derive(Debug, Deserialize)]
struct MessageCreated {
    sid: String,
}

pub struct TwilioSms {
    client: Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSms {
    pub fn new(
        api_base: &str,
        account_sid: &str,
        auth_token: &str,
        from_number: &str,
        timeout_secs: u64,
    ) -> Result<Self, IntegrationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            from_number: from_number.to_string(),
        })
    }

    /// 三项凭据缺一即失败
    pub fn from_config(section: &TwilioSection) -> Result<Self, IntegrationError> {
        let required = |v: &Option<String>| v.as_deref().filter(|s| !s.trim().is_empty()).map(str::to_string);
        let (Some(sid), Some(token), Some(from)) = (
            required(&section.account_sid),
            required(&section.auth_token),
            required(&section.from_number),
        ) else {
            tracing::error!("FATAL: One or more Twilio credentials are missing.");
            return Err(IntegrationError::Credentials(
                "Twilio credentials must be set".to_string(),
            ));
        };

        let sms = Self::new(&section.api_base, &sid, &token, &from, section.timeout_secs)?;
        tracing::info!("TwilioSms initialized");
        Ok(sms)
    }

    async fn create_message(&self, recipient: &str, body: &str) -> Result<String, IntegrationError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        );
        let response = self
            .client
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", recipient),
                ("From", self.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IntegrationError::upstream("Twilio", response.status()));
        }
        let created: MessageCreated = response
            .json()
            .await
            .map_err(|e| IntegrationError::Decode(e.to_string()))?;
        Ok(created.sid)
    }
}

#[async_trait]
impl NotificationSender for TwilioSms {
    async fn send(&self, recipient: &str, body: &str) -> bool {
        match self.create_message(recipient, body).await {
            Ok(sid) => {
                tracing::info!(recipient, sid = %sid, "SMS sent successfully");
                true
            }
            Err(e) => {
                tracing::error!(recipient, "Failed to send SMS: {}", e);
                false
            }
        }
    }
}
