use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};
use tracing::error;

/// 엣지에서 직접 만드는 오류 응답
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(message.into())))
        .unwrap_or_else(|e| {
            error!(error = %e, "에러 응답 생성 실패");
            Response::new(Full::new(Bytes::from("Internal Server Error")))
        })
}

/// HTTPS로 옮기는 301 응답
pub fn redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            error!(error = %e, location = %location, "리다이렉트 응답 생성 실패");
            error_response(StatusCode::BAD_REQUEST, "Bad Request")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let response = error_response(StatusCode::FORBIDDEN, "denied");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_redirect_response() {
        let response = redirect_response("https://cdn.example/docs");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "https://cdn.example/docs");

        // 헤더로 쓸 수 없는 값
        let invalid = redirect_response("https://cdn.example/\n");
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
