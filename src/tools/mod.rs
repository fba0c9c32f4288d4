pub mod calendar;
pub mod executor;
pub mod recommend;
pub mod registry;
pub mod result;
pub mod schema;
pub mod sms;

pub use calendar::TodayEventsTool;
pub use executor::ToolExecutor;
pub use recommend::RecommendationTool;
pub use registry::{DynTool, Tool, ToolKind, ToolRegistry};
pub use result::{ToolPayload, ToolResult};
pub use schema::{parameters_schema, RecommendationArgs, SmsArgs, TodayEventsArgs};
pub use sms::SmsNotificationTool;
