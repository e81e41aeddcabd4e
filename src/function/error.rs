use std::fmt;
use super::event::EventType;

/// 엣지 함수 실행 및 구성 에러
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// 302 응답을 다시 쓰는데 요청에 Host 헤더가 없음
    MissingHost,
    /// Host 헤더 값을 URL 호스트로 쓸 수 없음
    InvalidHost {
        host: String,
        reason: String,
    },
    /// viewer-response 이벤트에 response 객체가 없음
    MissingResponse,
    /// 지원하지 않는 이벤트 단계
    UnsupportedEventType(EventType),
    /// 같은 이벤트 단계에 함수가 두 번 연결됨
    DuplicateAssociation(EventType),
    /// 함수가 실행되는 단계와 연결 단계가 다름
    MismatchedEventType {
        function: String,
        expected: EventType,
        actual: EventType,
    },
    /// 함수가 돌려준 헤더를 HTTP 헤더로 표현할 수 없음
    InvalidHeader {
        name: String,
        reason: String,
    },
    /// 이벤트 문서가 스키마에 맞지 않음
    InvalidEvent(Vec<String>),
    /// 이벤트 스키마 컴파일 실패
    SchemaCompile(String),
}

impl fmt::Display for FunctionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionError::MissingHost =>
                write!(f, "리다이렉트 재작성에 필요한 Host 헤더가 누락됨"),
            FunctionError::InvalidHost { host, reason } =>
                write!(f, "유효하지 않은 호스트 {:?}: {}", host, reason),
            FunctionError::MissingResponse =>
                write!(f, "viewer-response 이벤트에 response 객체가 없음"),
            FunctionError::UnsupportedEventType(event_type) =>
                write!(f, "지원하지 않는 이벤트 단계: {}", event_type),
            FunctionError::DuplicateAssociation(event_type) =>
                write!(f, "이벤트 단계 {}에 함수가 이미 연결되어 있음", event_type),
            FunctionError::MismatchedEventType { function, expected, actual } =>
                write!(f, "함수 {}는 {} 단계용이지만 {} 단계에 연결됨", function, expected, actual),
            FunctionError::InvalidHeader { name, reason } =>
                write!(f, "헤더 {} 변환 실패: {}", name, reason),
            FunctionError::InvalidEvent(errors) =>
                write!(f, "이벤트 문서 검증 실패: {}", errors.join("; ")),
            FunctionError::SchemaCompile(reason) =>
                write!(f, "이벤트 스키마 오류: {}", reason),
        }
    }
}

impl std::error::Error for FunctionError {}
