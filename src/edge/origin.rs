use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderMap, HeaderName, HeaderValue, HOST};
use hyper::{Request, Response, Uri};
use hyper_util::client::legacy;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, instrument};

use crate::distribution::OriginSettings;
use super::convert::is_hop_by_hop;
use super::EdgeError;

/// 오리진 요청 클라이언트
///
/// 뷰어 Host 헤더는 넘기지 않고 오리진 도메인을 Host로 씁니다.
/// 정적 웹사이트 엔드포인트는 Host로 버킷을 찾기 때문입니다.
#[derive(Clone)]
pub struct OriginClient {
    client: legacy::Client<HttpConnector, Incoming>,
    origin: OriginSettings,
    custom_headers: Vec<(HeaderName, HeaderValue)>,
}

impl OriginClient {
    pub fn new(origin: OriginSettings) -> Result<Self, EdgeError> {
        let connector = HttpConnector::new();
        let client = legacy::Client::builder(TokioExecutor::new()).build::<_, Incoming>(connector);

        let custom_headers = origin
            .custom_headers
            .iter()
            .map(|(name, value)| -> Result<(HeaderName, HeaderValue), EdgeError> {
                let invalid = |reason: String| EdgeError::InvalidOriginUrl {
                    url: origin.domain_name.clone(),
                    reason,
                };
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| invalid(format!("커스텀 헤더 이름 {}: {}", name, e)))?;
                let value = HeaderValue::from_str(value)
                    .map_err(|e| invalid(format!("커스텀 헤더 {} 값: {}", name, e)))?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, EdgeError>>()?;

        Ok(Self {
            client,
            origin,
            custom_headers,
        })
    }

    /// 뷰어 요청 경로에 대응하는 오리진 URI
    pub fn origin_uri(&self, viewer_uri: &Uri) -> Result<Uri, EdgeError> {
        let path_and_query = viewer_uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = self
            .origin
            .request_url(path_and_query)
            .map_err(|e| EdgeError::InvalidOriginUrl {
                url: format!("{}{}", self.origin.domain_name, path_and_query),
                reason: e.to_string(),
            })?;
        url.as_str().parse::<Uri>().map_err(|e| EdgeError::InvalidOriginUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// 뷰어 요청을 오리진으로 보내고 본문까지 모은 응답을 돌려줍니다.
    #[instrument(skip(self, req), fields(uri = %req.uri()))]
    pub async fn fetch(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>, EdgeError> {
        let uri = self.origin_uri(req.uri())?;
        let url = uri.to_string();
        let proxied_req = self.build_origin_request(uri, req)?;

        let res = self.client.request(proxied_req).await.map_err(|e| EdgeError::Origin {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let (parts, body) = res.into_parts();
        let bytes = body
            .collect()
            .await
            .map_err(|e| EdgeError::Origin {
                url: url.clone(),
                reason: format!("응답 본문 수신 실패: {}", e),
            })?
            .to_bytes();

        debug!(status = %parts.status, bytes_size = bytes.len(), "오리진 응답 수신");
        Ok(Response::from_parts(parts, Full::new(bytes)))
    }

    fn build_origin_request(
        &self,
        uri: Uri,
        req: Request<Incoming>,
    ) -> Result<Request<Incoming>, EdgeError> {
        let host = HeaderValue::from_str(&self.origin.domain_name).map_err(|e| {
            EdgeError::InvalidOriginUrl {
                url: uri.to_string(),
                reason: e.to_string(),
            }
        })?;

        let (mut parts, body) = req.into_parts();
        let mut headers = HeaderMap::with_capacity(parts.headers.len() + self.custom_headers.len());
        for (name, value) in parts.headers.iter() {
            if name != &HOST && !is_hop_by_hop(name) {
                headers.append(name.clone(), value.clone());
            }
        }
        headers.insert(HOST, host);
        for (name, value) in &self.custom_headers {
            headers.insert(name.clone(), value.clone());
        }
        parts.headers = headers;
        parts.uri = uri;

        Ok(Request::from_parts(parts, body))
    }
}
