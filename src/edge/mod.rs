//! 로컬 엣지 호스트
//!
//! 하나의 오리진과 하나의 기본 동작만 가진 배포를 실행합니다.
//! 캐시는 없고, 모든 요청을 오리진에서 가져옵니다.

pub mod convert;
mod error;
mod handler;
mod listener;
mod origin;
mod response;

pub use error::EdgeError;
pub use handler::{EdgeHandler, ViewerScheme};
pub use listener::EdgeListener;
pub use origin::OriginClient;
pub use response::{error_response, redirect_response};
