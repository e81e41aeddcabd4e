use super::{EventType, FunctionError, RequestView, ResponseView};

/// 엣지 함수 트레이트
///
/// 하나의 이벤트 단계에서 응답을 변환하는 동기 함수입니다.
/// 호출 사이에 상태를 공유하지 않으므로 여러 작업에서 동시에 호출할 수 있습니다.
pub trait EdgeFunction: Send + Sync {
    /// 함수의 고유 이름을 반환합니다.
    fn name(&self) -> &str;

    /// 함수가 실행되는 이벤트 단계
    fn event_type(&self) -> EventType;

    /// 뷰어로 나가는 응답을 처리합니다.
    fn handle_response(
        &self,
        request: &RequestView,
        response: ResponseView,
    ) -> Result<ResponseView, FunctionError>;
}
