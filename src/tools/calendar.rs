//! get_today_events：今日日程

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::integrations::CalendarSource;
use crate::tools::{TodayEventsArgs, Tool, ToolKind};

pub struct TodayEventsTool {
    source: Arc<dyn CalendarSource>,
}

impl TodayEventsTool {
    pub fn new(source: Arc<dyn CalendarSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for TodayEventsTool {
    const KIND: ToolKind = ToolKind::TodayEvents;
    type Args = TodayEventsArgs;

    async fn call(&self, _args: TodayEventsArgs) -> Result<Value, String> {
        let events = self.source.today_events().await.map_err(|e| e.to_string())?;
        serde_json::to_value(events).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::{Event, EventStart, IntegrationError};
    use chrono::NaiveDate;
    use serde_json::json;

    struct Fixed(Result<Vec<Event>, ()>);

    #[async_trait]
    impl CalendarSource for Fixed {
        async fn today_events(&self) -> Result<Vec<Event>, IntegrationError> {
            self.0
                .clone()
                .map_err(|_| IntegrationError::Transport("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn events_become_json_array() {
        let event = Event {
            title: "Intro to Kubernetes".to_string(),
            start_time: EventStart::Date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()),
            link: "N/A".to_string(),
        };
        let tool = TodayEventsTool::new(Arc::new(Fixed(Ok(vec![event]))));
        let out = tool.call(TodayEventsArgs {}).await.unwrap();
        assert_eq!(out[0]["title"], "Intro to Kubernetes");

        let empty = TodayEventsTool::new(Arc::new(Fixed(Ok(vec![]))));
        assert_eq!(empty.call(TodayEventsArgs {}).await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn fetch_error_is_a_tool_failure() {
        let tool = TodayEventsTool::new(Arc::new(Fixed(Err(()))));
        let err = tool.call(TodayEventsArgs {}).await.unwrap_err();
        assert!(err.contains("offline"));
    }
}
