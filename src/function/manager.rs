use tracing::debug;
use super::{
    EdgeFunction, EventType, FunctionAssociation, FunctionError, FunctionEvent, FunctionKind,
    FunctionOutput, RequestView, ResponseHeaderRewriter, ResponseView,
};

/// 함수 종류로부터 함수 인스턴스를 생성합니다.
fn create_function(kind: FunctionKind) -> Box<dyn EdgeFunction> {
    match kind {
        FunctionKind::RedirectHostRewrite => Box::new(ResponseHeaderRewriter::new()),
    }
}

/// 동작(behavior)에 연결된 함수들을 보관하고 이벤트를 전달합니다.
///
/// 이벤트 단계마다 함수는 최대 하나입니다.
#[derive(Default)]
pub struct FunctionManager {
    viewer_response: Option<Box<dyn EdgeFunction>>,
}

impl std::fmt::Debug for FunctionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionManager")
            .field("viewer_response", &self.viewer_response.as_ref().map(|func| func.name()))
            .finish()
    }
}

impl FunctionManager {
    pub fn new(associations: &[FunctionAssociation]) -> Result<Self, FunctionError> {
        let mut manager = Self::default();

        for association in associations {
            // 이 크레이트는 viewer-response 단계만 실행함
            if association.event_type == EventType::ViewerRequest {
                return Err(FunctionError::UnsupportedEventType(EventType::ViewerRequest));
            }

            let function = create_function(association.function);
            if function.event_type() != association.event_type {
                return Err(FunctionError::MismatchedEventType {
                    function: function.name().to_string(),
                    expected: function.event_type(),
                    actual: association.event_type,
                });
            }

            if manager.viewer_response.is_some() {
                return Err(FunctionError::DuplicateAssociation(EventType::ViewerResponse));
            }
            debug!(function = %function.name(), "viewer-response 함수 연결");
            manager.viewer_response = Some(function);
        }

        Ok(manager)
    }

    /// viewer-response 단계에 연결된 함수 이름
    pub fn viewer_response_function(&self) -> Option<&str> {
        self.viewer_response.as_ref().map(|function| function.name())
    }

    /// viewer-response 함수를 실행합니다. 연결된 함수가 없으면 응답을 그대로 돌려줍니다.
    pub fn run_viewer_response(
        &self,
        request: &RequestView,
        response: ResponseView,
    ) -> Result<ResponseView, FunctionError> {
        match &self.viewer_response {
            Some(function) => function.handle_response(request, response),
            None => Ok(response),
        }
    }

    /// 이벤트 문서 하나를 처리합니다.
    pub fn handle_event(&self, event: FunctionEvent) -> Result<FunctionOutput, FunctionError> {
        if event.context.event_type != EventType::ViewerResponse {
            return Err(FunctionError::UnsupportedEventType(event.context.event_type));
        }
        let response = event.response.ok_or(FunctionError::MissingResponse)?;
        let response = self.run_viewer_response(&event.request, response)?;
        Ok(FunctionOutput { response })
    }
}
