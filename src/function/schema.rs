use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::debug;

use super::{FunctionError, FunctionEvent};

/// 이벤트 문서 검증 오류
#[derive(Debug, Clone, PartialEq)]
pub enum EventValidationError {
    ParseError(String),
    SchemaError { path: String, message: String },
}

/// 이벤트 문서를 JSON 스키마로 검증합니다.
pub struct EventValidator {
    schema: JSONSchema,
}

impl EventValidator {
    pub fn new() -> Result<Self, FunctionError> {
        let schema_str = r##"{
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "required": ["version", "context", "request"],
            "definitions": {
                "entries": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "object",
                        "required": ["value"],
                        "properties": {
                            "value": {"type": "string"},
                            "multiValue": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "required": ["value"],
                                    "properties": {"value": {"type": "string"}}
                                }
                            }
                        }
                    }
                }
            },
            "properties": {
                "version": {"type": "string", "enum": ["1.0"]},
                "context": {
                    "type": "object",
                    "required": ["eventType"],
                    "properties": {
                        "distributionDomainName": {"type": "string"},
                        "distributionId": {"type": "string"},
                        "eventType": {"type": "string", "enum": ["viewer-request", "viewer-response"]},
                        "requestId": {"type": "string"}
                    }
                },
                "viewer": {
                    "type": "object",
                    "properties": {"ip": {"type": "string"}}
                },
                "request": {
                    "type": "object",
                    "properties": {
                        "method": {"type": "string"},
                        "uri": {"type": "string"},
                        "querystring": {"$ref": "#/definitions/entries"},
                        "headers": {"$ref": "#/definitions/entries"}
                    }
                },
                "response": {
                    "type": "object",
                    "required": ["statusCode"],
                    "properties": {
                        "statusCode": {"type": "integer", "minimum": 100, "maximum": 599},
                        "statusDescription": {"type": "string"},
                        "headers": {"$ref": "#/definitions/entries"}
                    }
                }
            }
        }"##;

        let schema_value: Value = serde_json::from_str(schema_str)
            .map_err(|e| FunctionError::SchemaCompile(format!("스키마 파싱 오류: {}", e)))?;

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_value)
            .map_err(|e| FunctionError::SchemaCompile(format!("스키마 컴파일 오류: {}", e)))?;

        debug!("이벤트 스키마 컴파일 성공");
        Ok(Self { schema })
    }

    /// JSON 문자열 유효성 검사
    pub fn validate(&self, json_str: &str) -> Result<Value, Vec<EventValidationError>> {
        let value = serde_json::from_str::<Value>(json_str)
            .map_err(|e| vec![EventValidationError::ParseError(e.to_string())])?;

        if let Err(errors) = self.schema.validate(&value) {
            return Err(errors
                .map(|error| EventValidationError::SchemaError {
                    path: error.instance_path.to_string(),
                    message: error.to_string(),
                })
                .collect());
        }

        Ok(value)
    }

    /// 검증 후 이벤트로 변환합니다.
    pub fn parse_event(&self, json_str: &str) -> Result<FunctionEvent, FunctionError> {
        let value = self.validate(json_str)?;
        serde_json::from_value(value)
            .map_err(|e| FunctionError::InvalidEvent(vec![format!("변환 오류: {}", e)]))
    }
}

impl From<Vec<EventValidationError>> for FunctionError {
    fn from(errors: Vec<EventValidationError>) -> Self {
        FunctionError::InvalidEvent(
            errors
                .iter()
                .map(|e| match e {
                    EventValidationError::ParseError(msg) => format!("파싱 오류: {}", msg),
                    EventValidationError::SchemaError { path, message } =>
                        format!("스키마 오류 (경로: {}): {}", path, message),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::EventType;

    #[test]
    fn test_validate_sample_event() {
        let validator = EventValidator::new().unwrap();
        let json = r#"{
            "version": "1.0",
            "context": { "eventType": "viewer-response" },
            "request": { "headers": { "host": { "value": "cdn.example" } } },
            "response": { "statusCode": 302, "headers": {} }
        }"#;

        let event = validator.parse_event(json).unwrap();
        assert_eq!(event.context.event_type, EventType::ViewerResponse);
        assert_eq!(event.response.map(|r| r.status_code), Some(302));
    }

    #[test]
    fn test_reject_malformed_events() {
        let validator = EventValidator::new().unwrap();

        // JSON 아님
        assert!(matches!(
            validator.validate("{not json").unwrap_err().as_slice(),
            [EventValidationError::ParseError(_)]
        ));

        // 헤더 값이 {value} 형식이 아님
        let bare_header = r#"{
            "version": "1.0",
            "context": { "eventType": "viewer-response" },
            "request": { "headers": { "host": "cdn.example" } }
        }"#;
        let errors = validator.validate(bare_header).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            EventValidationError::SchemaError { path, .. } if path == "/request/headers/host"
        )));

        // 상태 코드 범위 초과
        let bad_status = r#"{
            "version": "1.0",
            "context": { "eventType": "viewer-response" },
            "request": {},
            "response": { "statusCode": 999 }
        }"#;
        assert!(validator.validate(bad_status).is_err());

        // 알 수 없는 버전
        let bad_version = r#"{
            "version": "2.0",
            "context": { "eventType": "viewer-response" },
            "request": {}
        }"#;
        assert!(matches!(
            validator.parse_event(bad_version),
            Err(FunctionError::InvalidEvent(_))
        ));
    }
}
