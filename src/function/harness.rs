use tracing::info;
use super::{EventValidator, FunctionAssociation, FunctionError, FunctionKind, FunctionManager, FunctionOutput};

/// 이벤트 문서(JSON) 하나로 함수를 시험 실행합니다.
pub fn test_function(kind: FunctionKind, event_json: &str) -> Result<FunctionOutput, FunctionError> {
    let validator = EventValidator::new()?;
    let event = validator.parse_event(event_json)?;
    info!(
        function = %kind,
        request_id = %event.context.request_id,
        "함수 시험 실행"
    );

    let manager = FunctionManager::new(&[FunctionAssociation::viewer_response(kind)])?;
    manager.handle_event(event)
}
