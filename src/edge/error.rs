use std::fmt;
use crate::function::FunctionError;

#[derive(Debug)]
pub enum EdgeError {
    /// 리스너 바인딩 실패
    Bind {
        addr: String,
        error: std::io::Error,
    },
    /// 인증서/키 로드 실패
    Tls(String),
    /// 오리진 URL을 만들 수 없음
    InvalidOriginUrl {
        url: String,
        reason: String,
    },
    /// 오리진 요청 실패
    Origin {
        url: String,
        reason: String,
    },
    /// 엣지 함수 실행 실패
    Function(FunctionError),
}

impl fmt::Display for EdgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeError::Bind { addr, error } => write!(f, "{} 바인딩 실패: {}", addr, error),
            EdgeError::Tls(msg) => write!(f, "TLS 설정 오류: {}", msg),
            EdgeError::InvalidOriginUrl { url, reason } =>
                write!(f, "오리진 URL {} 오류: {}", url, reason),
            EdgeError::Origin { url, reason } => write!(f, "오리진 {} 요청 실패: {}", url, reason),
            EdgeError::Function(e) => write!(f, "엣지 함수 실행 실패: {}", e),
        }
    }
}

impl std::error::Error for EdgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EdgeError::Bind { error, .. } => Some(error),
            EdgeError::Function(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FunctionError> for EdgeError {
    fn from(err: FunctionError) -> Self {
        EdgeError::Function(err)
    }
}
