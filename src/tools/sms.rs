//! send_sms_notification：终止工具

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::integrations::NotificationSender;
use crate::tools::{SmsArgs, Tool, ToolKind};

pub struct SmsNotificationTool {
    sender: Arc<dyn NotificationSender>,
}

impl SmsNotificationTool {
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Tool for SmsNotificationTool {
    const KIND: ToolKind = ToolKind::SendSms;
    type Args = SmsArgs;

    /// 发送返回 false 视为失败，规划不会因此结束
    async fn call(&self, args: SmsArgs) -> Result<Value, String> {
        if self.sender.send(&args.recipient, &args.message_body).await {
            Ok(json!({"sent": true, "recipient": args.recipient}))
        } else {
            Err(format!("Failed to send SMS to {}", args.recipient))
        }
    }
}
