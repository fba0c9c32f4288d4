//! 工具参数结构与 JSON Schema 生成（schemars）
//!
//! 生成的 schema 会被清理成各家函数调用接口都接受的子集：去掉 `$schema` / `title` / `format`，
//! 子结构内联，保证顶层为带 `properties` 的 object。

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// get_today_events：无参数
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TodayEventsArgs {}

/// get_top_github_recommendations
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecommendationArgs {
    /// The title of the learning event (e.g. 'Advanced Python with Asyncio').
    pub event_title: String,
    /// The maximum number of repositories to return (1-10, default 3).
    #[serde(default)]
    #[schemars(range(min = 1, max = 10))]
    pub max_results: Option<usize>,
}

/// send_sms_notification
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SmsArgs {
    /// The learner's phone number in E.164 format.
    pub recipient: String,
    /// The final plan text, under 300 characters, citing the top 1-2 GitHub resources.
    pub message_body: String,
}

/// 参数 schema（已清理）
pub fn parameters_schema<T: JsonSchema>() -> Value {
    let settings = SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = true;
        s.option_add_null_type = false;
    });
    let root = settings.into_generator().into_root_schema_for::<T>();
    let mut value = serde_json::to_value(root).unwrap_or_else(|_| json!({}));
    sanitize(&mut value);

    if let Value::Object(map) = &mut value {
        map.remove("$schema");
        map.remove("title");
        map.remove("definitions");
        map.remove("description");
        map.insert("type".to_string(), json!("object"));
        map.entry("properties").or_insert_with(|| json!({}));
    }
    value
}

fn sanitize(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("format");
            for v in map.values_mut() {
                sanitize(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sanitize),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_still_declare_properties() {
        let schema = parameters_schema::<TodayEventsArgs>();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"], json!({}));
        assert!(schema.get("$schema").is_none());
    }

    #[test]
    fn recommendation_schema_is_documentation_grade() {
        let schema = parameters_schema::<RecommendationArgs>();
        assert_eq!(schema["required"], json!(["event_title"]));
        let max = &schema["properties"]["max_results"];
        assert_eq!(max["type"], "integer");
        assert_eq!(max["minimum"].as_f64(), Some(1.0));
        assert_eq!(max["maximum"].as_f64(), Some(10.0));
        assert!(max.get("format").is_none());
        assert!(schema["properties"]["event_title"]["description"]
            .as_str()
            .unwrap()
            .contains("learning event"));
    }

    #[test]
    fn sms_requires_both_fields() {
        let schema = parameters_schema::<SmsArgs>();
        let mut required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        required.sort();
        assert_eq!(required, vec!["message_body", "recipient"]);
    }

    #[test]
    fn args_decode_with_defaults() {
        let args: RecommendationArgs =
            serde_json::from_value(json!({"event_title": "Rust"})).unwrap();
        assert_eq!(args.max_results, None);
        let _: TodayEventsArgs = serde_json::from_value(json!({})).unwrap();
    }
}
