//! Google Calendar 日程源
//!
//! 以 UTC 当日窗口查询 events.list（singleEvents=true，orderBy=startTime），
//! 归一化为 Event（title / start_time / link），并在本地再按窗口过滤一次。
//! 鉴权只接受现成的 OAuth access token（配置项或凭据文件），不做服务账号换取 token。

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CalendarSection;
use crate::integrations::{CalendarSource, IntegrationError};

/// 日程事件开始时间：带时区的时刻，或全天事件的日期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventStart {
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
}

/// 今日日程事件（只读，原样转给模型）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub start_time: EventStart,
    pub link: String,
}

/// UTC 日窗口：[00:00:00.000000, 23:59:59.999999]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        let end = start + chrono::Duration::days(1) - chrono::Duration::microseconds(1);
        Self { date, start, end }
    }

    pub fn today() -> Self {
        Self::for_date(Utc::now().date_naive())
    }

    /// 事件是否在窗口内开始；全天事件按日期比较
    pub fn contains(&self, start: &EventStart) -> bool {
        match start {
            EventStart::DateTime(dt) => {
                let utc = dt.with_timezone(&Utc);
                utc >= self.start && utc <= self.end
            }
            EventStart::Date(d) => *d == self.date,
        }
    }

    pub fn time_min(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn time_max(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

#[derive(Debug, Deserialize)]
struct EventsPage {
    #[serde(default)]
    items: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    summary: Option<String>,
    start: Option<RawTime>,
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

fn parse_start(raw: &RawTime) -> Option<EventStart> {
    if let Some(dt) = raw.date_time.as_deref() {
        return DateTime::parse_from_rfc3339(dt).ok().map(EventStart::DateTime);
    }
    raw.date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(EventStart::Date)
}

fn normalize(raw: RawEvent) -> Option<Event> {
    let start_time = raw.start.as_ref().and_then(parse_start)?;
    Some(Event {
        title: raw.summary.unwrap_or_else(|| "(untitled)".to_string()),
        start_time,
        link: raw.html_link.unwrap_or_else(|| "N/A".to_string()),
    })
}

/// 解析凭据文件内容：`{"access_token": "..."}` 或纯文本 token
pub(crate) fn parse_credentials(raw: &str) -> Result<String, IntegrationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IntegrationError::Credentials(
            "credentials file is empty".to_string(),
        ));
    }
    if !trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }
    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| IntegrationError::Decode(e.to_string()))?;
    if let Some(token) = value.get("access_token").and_then(|v| v.as_str()) {
        return Ok(token.to_string());
    }
    if value.get("type").and_then(|v| v.as_str()) == Some("service_account") {
        return Err(IntegrationError::Credentials(
            "service-account key exchange is not supported; provide an OAuth access token \
             (calendar.access_token or a {\"access_token\": ...} file)"
                .to_string(),
        ));
    }
    Err(IntegrationError::Credentials(
        "credentials file has no access_token".to_string(),
    ))
}

/// Google Calendar 客户端
pub struct GoogleCalendar {
    client: Client,
    api_base: String,
    calendar_id: String,
    access_token: String,
}

impl GoogleCalendar {
    pub fn new(
        api_base: &str,
        calendar_id: &str,
        access_token: &str,
        timeout_secs: u64,
    ) -> Result<Self, IntegrationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.to_string(),
            calendar_id: calendar_id.to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// 从配置构建：calendar_id 与 token 缺失均为致命错误
    pub fn from_config(section: &CalendarSection) -> Result<Self, IntegrationError> {
        let calendar_id = section
            .calendar_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                tracing::error!("FATAL: LEARNING_CALENDAR_ID is not set.");
                IntegrationError::Credentials("calendar id must be provided".to_string())
            })?;

        let token = match section.access_token.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => {
                let raw = std::fs::read_to_string(&section.credentials_file).map_err(|e| {
                    IntegrationError::Credentials(format!(
                        "cannot read {}: {}",
                        section.credentials_file.display(),
                        e
                    ))
                })?;
                parse_credentials(&raw)?
            }
        };

        let calendar = Self::new(
            &section.api_base,
            calendar_id,
            &token,
            section.timeout_secs,
        )?;
        tracing::info!(calendar_id = %calendar_id, "GoogleCalendar initialized");
        Ok(calendar)
    }

    fn events_url(&self) -> Result<Url, IntegrationError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| IntegrationError::Transport(format!("invalid api base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| IntegrationError::Transport("api base cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }

    /// 拉取指定日窗口内的事件
    pub async fn events_in(&self, window: &DayWindow) -> Result<Vec<Event>, IntegrationError> {
        let url = self.events_url()?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", window.time_min()),
                ("timeMax", window.time_max()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IntegrationError::upstream("Google Calendar", response.status()));
        }

        let page: EventsPage = response
            .json()
            .await
            .map_err(|e| IntegrationError::Decode(e.to_string()))?;

        let events: Vec<Event> = page
            .items
            .into_iter()
            .filter_map(normalize)
            .filter(|e| {
                let inside = window.contains(&e.start_time);
                if !inside {
                    tracing::debug!(title = %e.title, "dropping event outside the day window");
                }
                inside
            })
            .collect();

        if events.is_empty() {
            tracing::info!("No Events for Today");
        }
        Ok(events)
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendar {
    async fn today_events(&self) -> Result<Vec<Event>, IntegrationError> {
        self.events_in(&DayWindow::today()).await.map_err(|e| {
            tracing::error!("Error fetching calendar events: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn window_spans_the_full_utc_day() {
        let w = DayWindow::for_date(day());
        assert_eq!(w.time_min(), "2026-10-19T00:00:00.000000Z");
        assert_eq!(w.time_max(), "2026-10-19T23:59:59.999999Z");
    }

    #[test]
    fn window_excludes_neighbouring_days() {
        let w = DayWindow::for_date(day());
        let at = |s: &str| EventStart::DateTime(DateTime::parse_from_rfc3339(s).unwrap());

        assert!(w.contains(&at("2026-10-19T00:00:00Z")));
        assert!(w.contains(&at("2026-10-19T23:59:59.999999Z")));
        assert!(!w.contains(&at("2026-10-20T00:00:00Z")));
        assert!(!w.contains(&at("2026-10-18T23:59:59Z")));
        // 09:00 at UTC-05:00 is 14:00 UTC the same day
        assert!(w.contains(&at("2026-10-19T09:00:00-05:00")));
        // 21:00 at UTC-05:00 is already the next UTC day
        assert!(!w.contains(&at("2026-10-19T21:00:00-05:00")));

        assert!(w.contains(&EventStart::Date(day())));
        assert!(!w.contains(&EventStart::Date(day().succ_opt().unwrap())));
    }

    #[test]
    fn credentials_accept_token_file_shapes() {
        assert_eq!(parse_credentials("  ya29.token \n").unwrap(), "ya29.token");
        assert_eq!(
            parse_credentials(r#"{"access_token": "ya29.json"}"#).unwrap(),
            "ya29.json"
        );
        assert!(matches!(
            parse_credentials(r#"{"type": "service_account", "private_key": "x"}"#),
            Err(IntegrationError::Credentials(_))
        ));
        assert!(parse_credentials("").is_err());
    }

    #[test]
    fn from_config_requires_calendar_id() {
        let section = CalendarSection {
            calendar_id: None,
            access_token: Some("tok".to_string()),
            ..CalendarSection::default()
        };
        assert!(matches!(
            GoogleCalendar::from_config(&section),
            Err(IntegrationError::Credentials(_))
        ));
    }

    #[test]
    fn from_config_reads_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, r#"{"access_token": "file-token"}"#).unwrap();
        let section = CalendarSection {
            calendar_id: Some("learning@group.calendar.google.com".to_string()),
            credentials_file: path,
            ..CalendarSection::default()
        };
        let calendar = GoogleCalendar::from_config(&section).unwrap();
        assert_eq!(calendar.access_token, "file-token");
    }

    #[tokio::test]
    async fn events_are_normalized_and_windowed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/calendars/learning(@|%40)example\.com/events$".to_string()),
            )
            .match_header("authorization", "Bearer tok")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("timeMin".into(), "2026-10-19T00:00:00.000000Z".into()),
                Matcher::UrlEncoded("timeMax".into(), "2026-10-19T23:59:59.999999Z".into()),
                Matcher::UrlEncoded("singleEvents".into(), "true".into()),
                Matcher::UrlEncoded("orderBy".into(), "startTime".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "items": [
                        {
                            "summary": "Intro to Kubernetes",
                            "start": {"dateTime": "2026-10-19T09:00:00Z"},
                            "htmlLink": "https://calendar.google.com/event?eid=1"
                        },
                        {"start": {"date": "2026-10-19"}},
                        {"summary": "Tomorrow", "start": {"dateTime": "2026-10-20T09:00:00Z"}},
                        {"summary": "No start"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let calendar = GoogleCalendar::new(&server.url(), "learning@example.com", "tok", 5).unwrap();
        let events = calendar.events_in(&DayWindow::for_date(day())).await.unwrap();

        mock.assert_async().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Intro to Kubernetes");
        assert_eq!(events[0].link, "https://calendar.google.com/event?eid=1");
        assert_eq!(events[1].title, "(untitled)");
        assert_eq!(events[1].link, "N/A");
        assert_eq!(events[1].start_time, EventStart::Date(day()));
    }

    #[tokio::test]
    async fn upstream_failure_is_an_error_not_an_empty_day() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let calendar = GoogleCalendar::new(&server.url(), "cal", "tok", 5).unwrap();
        let err = calendar.events_in(&DayWindow::for_date(day())).await.unwrap_err();
        assert!(matches!(err, IntegrationError::Upstream { status: 403, .. }));
    }

    #[test]
    fn event_serializes_for_the_model() {
        let event = Event {
            title: "Rust".to_string(),
            start_time: EventStart::Date(day()),
            link: "N/A".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"title": "Rust", "start_time": "2026-10-19", "link": "N/A"})
        );
    }
}
