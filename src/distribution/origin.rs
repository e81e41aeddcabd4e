use hyper::header::{HeaderName, HeaderValue, HOST};
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

use crate::settings::SettingsError;

/// 오리진 연결 프로토콜
///
/// 정적 웹사이트 호스팅 엔드포인트는 평문 HTTP만 제공합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginProtocolPolicy {
    #[default]
    HttpOnly,
}

/// 오리진 설정
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OriginSettings {
    /// 오리진 호스트 (예: "bucket.s3-website-ap-northeast-1.amazonaws.com", "127.0.0.1:9000")
    pub domain_name: String,

    /// 모든 요청 경로 앞에 붙는 접두사
    #[serde(default)]
    pub origin_path: String,

    #[serde(default)]
    pub protocol_policy: OriginProtocolPolicy,

    /// 오리진 요청마다 붙이는 헤더 (공유 비밀 Referer 등)
    #[serde(default)]
    pub custom_headers: BTreeMap<String, String>,
}

impl OriginSettings {
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            origin_path: String::new(),
            protocol_policy: OriginProtocolPolicy::HttpOnly,
            custom_headers: BTreeMap::new(),
        }
    }

    pub fn with_origin_path(mut self, path: impl Into<String>) -> Self {
        self.origin_path = path.into();
        self
    }

    pub fn with_custom_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }

    /// "/"와 ""는 접두사 없음. 그 외에는 앞 슬래시를 붙이고 뒤 슬래시를 뗍니다.
    pub fn normalized_path(&self) -> String {
        let trimmed = self.origin_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// 뷰어 요청 경로에 대응하는 오리진 URL
    pub fn request_url(&self, path_and_query: &str) -> Result<Url, url::ParseError> {
        let path_and_query = if path_and_query.starts_with('/') {
            path_and_query.to_string()
        } else {
            format!("/{}", path_and_query)
        };
        let scheme = match self.protocol_policy {
            OriginProtocolPolicy::HttpOnly => "http",
        };
        Url::parse(&format!(
            "{}://{}{}{}",
            scheme,
            self.domain_name,
            self.normalized_path(),
            path_and_query
        ))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let domain = self.domain_name.trim();
        if domain.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "origin.domain_name이 비어 있음".to_string(),
            ));
        }
        if domain.contains("://") {
            return Err(SettingsError::InvalidConfig(format!(
                "origin.domain_name에는 스킴을 넣을 수 없음: {}", domain
            )));
        }

        let url = Url::parse(&format!("http://{}", domain)).map_err(|e| {
            SettingsError::InvalidConfig(format!("origin.domain_name {} 오류: {}", domain, e))
        })?;
        if url.host_str().is_none()
            || url.path() != "/"
            || url.query().is_some()
            || url.fragment().is_some()
            || !url.username().is_empty()
        {
            return Err(SettingsError::InvalidConfig(format!(
                "origin.domain_name은 host[:port] 형식이어야 함: {}", domain
            )));
        }

        for (name, value) in &self.custom_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                SettingsError::InvalidConfig(format!("커스텀 헤더 이름 {} 오류: {}", name, e))
            })?;
            if header_name == HOST {
                return Err(SettingsError::InvalidConfig(
                    "커스텀 헤더로 Host를 지정할 수 없음".to_string(),
                ));
            }
            HeaderValue::from_str(value).map_err(|e| {
                SettingsError::InvalidConfig(format!("커스텀 헤더 {} 값 오류: {}", name, e))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_path() {
        let cases = [("", ""), ("/", ""), ("app", "/app"), ("/app/", "/app"), ("/a/b", "/a/b")];
        for (input, expected) in cases {
            let origin = OriginSettings::new("origin.example").with_origin_path(input);
            assert_eq!(origin.normalized_path(), expected, "{}", input);
        }
    }

    #[test]
    fn test_request_url() {
        let origin = OriginSettings::new("127.0.0.1:9000").with_origin_path("/site/");
        let url = origin.request_url("/index.html?v=1").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/site/index.html?v=1");

        let root = OriginSettings::new("bucket.s3-website.example").with_origin_path("/");
        assert_eq!(root.request_url("/").unwrap().as_str(), "http://bucket.s3-website.example/");
    }

    #[test]
    fn test_validate() {
        assert!(OriginSettings::new("bucket.s3-website.example").validate().is_ok());
        assert!(OriginSettings::new("127.0.0.1:9000")
            .with_custom_header("Referer", "b32c5227-6b77-4dba-894a-cf18d109a53a")
            .validate()
            .is_ok());

        assert!(OriginSettings::new("").validate().is_err());
        assert!(OriginSettings::new("http://bucket.example").validate().is_err());
        assert!(OriginSettings::new("bucket.example/path").validate().is_err());
        assert!(OriginSettings::new("bucket.example")
            .with_custom_header("Host", "other.example")
            .validate()
            .is_err());
        assert!(OriginSettings::new("bucket.example")
            .with_custom_header("bad header", "x")
            .validate()
            .is_err());
    }
}
