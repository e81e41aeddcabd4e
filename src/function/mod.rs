//! 엣지 함수
//!
//! 뷰어로 나가는 응답을 변환하는 함수와 이벤트 문서 모델을 제공합니다.

mod config;
mod error;
mod event;
mod harness;
mod host;
mod manager;
mod rewriter;
mod schema;
mod traits;

pub use config::{default_associations, FunctionAssociation, FunctionKind};
pub use error::FunctionError;
pub use event::{
    EventContext, EventType, FunctionEvent, FunctionHeaders, FunctionOutput, HeaderEntry,
    RequestView, ResponseView, SingleValue, Viewer, EVENT_VERSION,
};
pub use harness::test_function;
pub use host::HostInfo;
pub use manager::FunctionManager;
pub use rewriter::{
    ResponseHeaderRewriter, LOCATION_HEADER, MARKER_HEADER, MARKER_VALUE, REDIRECT_STATUS,
};
pub use schema::{EventValidationError, EventValidator};
pub use traits::EdgeFunction;
