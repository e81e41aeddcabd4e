use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 이벤트 문서 버전
pub const EVENT_VERSION: &str = "1.0";

/// 헤더/쿼리 문자열 한 항목
///
/// 같은 이름이 여러 번 나타나면 `multi_value`에 전체 값이 담기고,
/// `value`는 첫 번째 값을 가집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub value: String,

    #[serde(rename = "multiValue", default, skip_serializing_if = "Option::is_none")]
    pub multi_value: Option<Vec<SingleValue>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleValue {
    pub value: String,
}

impl HeaderEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            multi_value: None,
        }
    }

    /// 여러 값으로부터 항목을 만듭니다. 값이 없으면 `None`.
    pub fn from_values<I, S>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match values.len() {
            0 => None,
            1 => values.into_iter().next().map(Self::new),
            _ => Some(Self {
                value: values[0].clone(),
                multi_value: Some(values.into_iter().map(|value| SingleValue { value }).collect()),
            }),
        }
    }

    /// 항목이 담고 있는 모든 값
    pub fn values(&self) -> Vec<&str> {
        match &self.multi_value {
            Some(values) if !values.is_empty() => values.iter().map(|v| v.value.as_str()).collect(),
            _ => vec![self.value.as_str()],
        }
    }
}

/// 소문자 헤더 이름 -> 항목
pub type FunctionHeaders = BTreeMap<String, HeaderEntry>;

/// 함수가 실행되는 이벤트 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    ViewerRequest,
    ViewerResponse,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::ViewerRequest => write!(f, "viewer-request"),
            EventType::ViewerResponse => write!(f, "viewer-response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    #[serde(default)]
    pub distribution_domain_name: String,
    #[serde(default)]
    pub distribution_id: String,
    pub event_type: EventType,
    #[serde(default)]
    pub request_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    #[serde(default)]
    pub ip: String,
}

/// 뷰어 요청 (읽기 전용)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestView {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub querystring: BTreeMap<String, HeaderEntry>,
    #[serde(default)]
    pub headers: FunctionHeaders,
}

impl RequestView {
    /// `host` 헤더 값
    pub fn host(&self) -> Option<&str> {
        self.headers.get("host").map(|entry| entry.value.as_str())
    }
}

/// 응답 (읽기/쓰기)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseView {
    pub status_code: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<FunctionHeaders>,
}

impl ResponseView {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            status_description: None,
            headers: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(FunctionHeaders::new)
            .insert(name.to_ascii_lowercase(), HeaderEntry::new(value));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get(name))
            .map(|entry| entry.value.as_str())
    }
}

/// 함수 한 번의 호출에 전달되는 이벤트 문서
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEvent {
    pub version: String,
    pub context: EventContext,
    #[serde(default)]
    pub viewer: Viewer,
    pub request: RequestView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseView>,
}

/// viewer-response 함수의 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionOutput {
    pub response: ResponseView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_document_shape() {
        let json = r#"{
            "version": "1.0",
            "context": { "eventType": "viewer-response", "requestId": "abc" },
            "viewer": { "ip": "198.51.100.11" },
            "request": {
                "method": "GET",
                "uri": "/",
                "headers": { "host": { "value": "cdn.example" } }
            },
            "response": {
                "statusCode": 302,
                "headers": {
                    "set-cookie": {
                        "value": "a=1",
                        "multiValue": [{ "value": "a=1" }, { "value": "b=2" }]
                    }
                }
            }
        }"#;

        let event: FunctionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.context.event_type, EventType::ViewerResponse);
        assert_eq!(event.request.host(), Some("cdn.example"));

        let response = event.response.unwrap();
        assert_eq!(response.status_code, 302);
        let cookie = &response.headers.as_ref().unwrap()["set-cookie"];
        assert_eq!(cookie.values(), vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_response_without_headers_serializes_without_key() {
        let json = serde_json::to_value(ResponseView::new(200)).unwrap();
        assert_eq!(json, serde_json::json!({ "statusCode": 200 }));
    }

    #[test]
    fn test_entry_from_values() {
        assert_eq!(HeaderEntry::from_values(Vec::<String>::new()), None);
        assert_eq!(HeaderEntry::from_values(["x"]), Some(HeaderEntry::new("x")));

        let multi = HeaderEntry::from_values(["x", "y"]).unwrap();
        assert_eq!(multi.value, "x");
        assert_eq!(multi.values(), vec!["x", "y"]);
    }
}
