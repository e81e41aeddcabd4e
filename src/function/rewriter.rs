use super::{EdgeFunction, EventType, FunctionError, FunctionHeaders, HeaderEntry, HostInfo, RequestView, ResponseView};

/// 이 함수를 거친 응답에 붙는 표식 헤더
pub const MARKER_HEADER: &str = "cfn";
pub const MARKER_VALUE: &str = "1";
pub const LOCATION_HEADER: &str = "location";
/// Location을 다시 쓰는 상태 코드
pub const REDIRECT_STATUS: u16 = 302;

/// 응답 헤더 재작성 함수
///
/// 모든 응답에 `cfn: 1` 표식을 붙이고, 302 응답의 `Location`을
/// 뷰어가 요청한 호스트의 루트(`https://{host}/`)로 바꿉니다.
/// 정적 호스팅 오리진이 자기 엔드포인트 주소로 리다이렉트하는 것을 막습니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseHeaderRewriter;

impl ResponseHeaderRewriter {
    pub const NAME: &'static str = "redirect-host-rewrite";

    pub fn new() -> Self {
        Self
    }

    /// 응답을 재작성합니다. 상태 코드는 바꾸지 않습니다.
    ///
    /// ```
    /// use spa_edge::function::{RequestView, ResponseHeaderRewriter, ResponseView};
    ///
    /// let request = RequestView::default();
    /// let response = ResponseHeaderRewriter::new()
    ///     .rewrite(&request, ResponseView::new(200))
    ///     .unwrap();
    /// assert_eq!(response.header("cfn"), Some("1"));
    /// ```
    pub fn rewrite(
        &self,
        request: &RequestView,
        mut response: ResponseView,
    ) -> Result<ResponseView, FunctionError> {
        let headers = response.headers.get_or_insert_with(FunctionHeaders::new);
        headers.insert(MARKER_HEADER.to_string(), HeaderEntry::new(MARKER_VALUE));

        if response.status_code != REDIRECT_STATUS {
            return Ok(response);
        }

        let host = request.host().ok_or(FunctionError::MissingHost)?;
        let host = HostInfo::from_header_value(host)?;
        headers.insert(
            LOCATION_HEADER.to_string(),
            HeaderEntry::new(format!("https://{}/", host)),
        );
        Ok(response)
    }
}

impl EdgeFunction for ResponseHeaderRewriter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn event_type(&self) -> EventType {
        EventType::ViewerResponse
    }

    fn handle_response(
        &self,
        request: &RequestView,
        response: ResponseView,
    ) -> Result<ResponseView, FunctionError> {
        self.rewrite(request, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_host(host: &str) -> RequestView {
        let mut request = RequestView::default();
        request.headers.insert("host".to_string(), HeaderEntry::new(host));
        request
    }

    #[test]
    fn test_non_redirect_only_gets_marker() {
        let request = request_with_host("site.example");
        let response = ResponseView::new(200);

        let result = ResponseHeaderRewriter::new().rewrite(&request, response).unwrap();

        let mut expected = FunctionHeaders::new();
        expected.insert("cfn".to_string(), HeaderEntry::new("1"));
        assert_eq!(result.status_code, 200);
        assert_eq!(result.headers, Some(expected));
    }

    #[test]
    fn test_redirect_location_uses_viewer_host() {
        let request = request_with_host("cdn.example");
        let response = ResponseView::new(302)
            .with_header("location", "http://bucket.s3-website-region.amazonaws.com/");

        let result = ResponseHeaderRewriter::new().rewrite(&request, response).unwrap();

        assert_eq!(result.status_code, 302);
        assert_eq!(result.header("location"), Some("https://cdn.example/"));
        assert_eq!(result.header("cfn"), Some("1"));
    }

    #[test]
    fn test_non_redirect_keeps_existing_location() {
        let request = request_with_host("cdn.example");
        let response = ResponseView::new(301).with_header("location", "/elsewhere");

        let result = ResponseHeaderRewriter::new().rewrite(&request, response).unwrap();

        assert_eq!(result.header("location"), Some("/elsewhere"));
    }

    #[test]
    fn test_missing_host_only_fails_on_redirect() {
        let request = RequestView::default();
        let rewriter = ResponseHeaderRewriter::new();

        assert!(rewriter.rewrite(&request, ResponseView::new(404)).is_ok());
        assert_eq!(
            rewriter.rewrite(&request, ResponseView::new(302)),
            Err(FunctionError::MissingHost)
        );
    }

    #[test]
    fn test_empty_host_is_rejected() {
        let request = request_with_host("");
        let result = ResponseHeaderRewriter::new().rewrite(&request, ResponseView::new(302));
        assert!(matches!(result, Err(FunctionError::InvalidHost { .. })));
    }
}
