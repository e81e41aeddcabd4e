use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::HOST;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use tracing::debug;
use uuid::Uuid;

use crate::distribution::{DistributionSettings, ViewerProtocolPolicy};
use crate::function::{
    EventContext, EventType, FunctionError, FunctionEvent, FunctionManager, HostInfo,
    RequestView, ResponseView, Viewer, EVENT_VERSION,
};
use crate::logging::{log_request, RequestLog};
use super::convert::{apply_function_headers, headers_to_function, request_view};
use super::origin::OriginClient;
use super::response::{error_response, redirect_response};
use super::EdgeError;

/// 요청이 들어온 뷰어 연결의 스킴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerScheme {
    Http,
    Https,
}

/// 뷰어 요청 처리기
///
/// 뷰어 프로토콜과 메서드를 확인하고, 오리진에서 응답을 가져온 뒤
/// viewer-response 함수를 실행합니다.
pub struct EdgeHandler {
    distribution: DistributionSettings,
    origin: OriginClient,
    functions: FunctionManager,
    https_port: Option<u16>,
}

impl EdgeHandler {
    pub fn new(distribution: DistributionSettings) -> Result<Self, EdgeError> {
        let functions = FunctionManager::new(&distribution.behavior.function_associations)?;
        let origin = OriginClient::new(distribution.origin.clone())?;
        Ok(Self {
            distribution,
            origin,
            functions,
            https_port: None,
        })
    }

    /// HTTPS 리스너 포트. redirect-to-https 응답의 대상 포트로 쓰입니다.
    pub fn with_https_port(mut self, port: u16) -> Self {
        self.https_port = Some(port);
        self
    }

    pub async fn handle_request(
        &self,
        req: Request<Incoming>,
        scheme: ViewerScheme,
        peer: SocketAddr,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        let mut log = RequestLog::new(request_id.clone());
        log.with_request(&req);

        let response = self.process(req, scheme, peer, &request_id, &mut log).await;

        log.with_response(response.status());
        log.duration_ms = start_time.elapsed().as_millis() as u64;
        log_request(&log);

        Ok(response)
    }

    async fn process(
        &self,
        req: Request<Incoming>,
        scheme: ViewerScheme,
        peer: SocketAddr,
        request_id: &str,
        log: &mut RequestLog,
    ) -> Response<Full<Bytes>> {
        // 1. 뷰어 프로토콜 정책
        if let Some(response) = self.check_viewer_protocol(&req, scheme) {
            return response;
        }

        // 2. 허용 메서드
        if !self.distribution.behavior.allowed_methods.allows(req.method()) {
            return error_response(
                StatusCode::FORBIDDEN,
                format!("이 배포는 {} 메서드를 허용하지 않습니다", req.method()),
            );
        }

        // 3. 오리진 요청
        let viewer_request = request_view(&req);
        match self.origin.origin_uri(req.uri()) {
            Ok(uri) => log.with_origin(&uri.to_string()),
            Err(e) => {
                log.with_error(&e);
                return error_response(StatusCode::BAD_REQUEST, "잘못된 요청 경로");
            }
        }
        let origin_response = match self.origin.fetch(req).await {
            Ok(response) => response,
            Err(e) => {
                log.with_error(&e);
                return error_response(StatusCode::BAD_GATEWAY, "오리진에 연결할 수 없습니다");
            }
        };

        // 4. viewer-response 함수
        match self.apply_viewer_response(&viewer_request, origin_response, request_id, peer) {
            Ok(response) => response,
            Err(e) => {
                log.with_error(&e);
                error_response(StatusCode::SERVICE_UNAVAILABLE, "엣지 함수 실행에 실패했습니다")
            }
        }
    }

    fn check_viewer_protocol(
        &self,
        req: &Request<Incoming>,
        scheme: ViewerScheme,
    ) -> Option<Response<Full<Bytes>>> {
        if scheme == ViewerScheme::Https {
            return None;
        }

        match self.distribution.behavior.viewer_protocol_policy {
            ViewerProtocolPolicy::AllowAll => None,
            ViewerProtocolPolicy::HttpsOnly => Some(error_response(
                StatusCode::FORBIDDEN,
                "이 배포는 HTTPS 요청만 허용합니다",
            )),
            ViewerProtocolPolicy::RedirectToHttps => {
                let host = req.headers().get(HOST).and_then(|host| host.to_str().ok());
                let path = req.uri().path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
                let response = match host.map(|host| self.https_location(host, path)) {
                    Some(Ok(location)) => redirect_response(&location),
                    Some(Err(e)) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
                    None => error_response(StatusCode::BAD_REQUEST, "Host 헤더가 누락됨"),
                };
                Some(response)
            }
        }
    }

    /// 뷰어 Host의 포트를 HTTPS 리스너 포트로 바꾼 리다이렉트 대상
    fn https_location(&self, host: &str, path: &str) -> Result<String, FunctionError> {
        let mut host = HostInfo::from_header_value(host)?;
        host.port = self.https_port.filter(|port| *port != 443);
        Ok(format!("https://{}{}", host, path))
    }

    /// 오리진 응답에 viewer-response 함수를 적용합니다.
    ///
    /// 함수가 바꾸거나 지운 헤더만 원래 응답 헤더에 반영합니다.
    pub fn apply_viewer_response(
        &self,
        request: &RequestView,
        response: Response<Full<Bytes>>,
        request_id: &str,
        peer: SocketAddr,
    ) -> Result<Response<Full<Bytes>>, EdgeError> {
        let (mut parts, body) = response.into_parts();
        let origin_headers = headers_to_function(&parts.headers);

        let event = FunctionEvent {
            version: EVENT_VERSION.to_string(),
            context: EventContext {
                distribution_domain_name: self.distribution.domain_name.clone(),
                distribution_id: self.distribution.distribution_id.clone(),
                event_type: EventType::ViewerResponse,
                request_id: request_id.to_string(),
            },
            viewer: Viewer {
                ip: peer.ip().to_string(),
            },
            request: request.clone(),
            response: Some(ResponseView {
                status_code: parts.status.as_u16(),
                status_description: parts.status.canonical_reason().map(str::to_string),
                headers: Some(origin_headers.clone()),
            }),
        };

        let output = self.functions.handle_event(event)?;
        debug!(
            request_id = %request_id,
            status = output.response.status_code,
            "viewer-response 함수 실행 완료"
        );

        parts.status = StatusCode::from_u16(output.response.status_code).map_err(|e| {
            FunctionError::InvalidHeader {
                name: "statusCode".to_string(),
                reason: e.to_string(),
            }
        })?;
        match &output.response.headers {
            Some(headers) => apply_function_headers(&mut parts.headers, &origin_headers, headers)?,
            None => parts.headers.clear(),
        }

        Ok(Response::from_parts(parts, body))
    }

    pub async fn handle_connection<I>(
        &self,
        io: I,
        scheme: ViewerScheme,
        peer: SocketAddr,
    ) -> Result<(), hyper::Error>
    where
        I: hyper::rt::Read + hyper::rt::Write + Unpin,
    {
        http1::Builder::new()
            .serve_connection(io, service_fn(|req| self.handle_request(req, scheme, peer)))
            .await
    }
}
