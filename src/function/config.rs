use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use super::EventType;

/// 연결 가능한 함수 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FunctionKind {
    RedirectHostRewrite,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionKind::RedirectHostRewrite => write!(f, "redirect-host-rewrite"),
        }
    }
}

impl FromStr for FunctionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redirect-host-rewrite" => Ok(FunctionKind::RedirectHostRewrite),
            _ => Err(format!("Unknown function: {}", s)),
        }
    }
}

/// 이벤트 단계와 함수의 연결
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionAssociation {
    pub event_type: EventType,
    pub function: FunctionKind,
}

impl FunctionAssociation {
    pub fn viewer_response(function: FunctionKind) -> Self {
        Self {
            event_type: EventType::ViewerResponse,
            function,
        }
    }
}

/// 기본 동작: viewer-response 단계의 리다이렉트 호스트 재작성
pub fn default_associations() -> Vec<FunctionAssociation> {
    vec![FunctionAssociation::viewer_response(FunctionKind::RedirectHostRewrite)]
}
