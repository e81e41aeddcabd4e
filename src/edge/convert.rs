//! HTTP 메시지와 함수 이벤트 모델 사이의 변환

use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::Request;
use std::collections::BTreeMap;
use tracing::debug;

use crate::function::{FunctionError, FunctionHeaders, HeaderEntry, RequestView};

/// 프록시 구간을 넘어가지 않는 헤더
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// HTTP 헤더를 함수 헤더로 변환합니다. UTF-8이 아닌 값은 건너뜁니다.
pub fn headers_to_function(headers: &HeaderMap) -> FunctionHeaders {
    let mut converted = FunctionHeaders::new();
    for name in headers.keys() {
        if is_hop_by_hop(name) {
            continue;
        }
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|value| match std::str::from_utf8(value.as_bytes()) {
                Ok(value) => Some(value),
                Err(_) => {
                    debug!(header = %name, "UTF-8이 아닌 헤더 값은 함수에 넘기지 않음");
                    None
                }
            })
            .collect();
        if let Some(entry) = HeaderEntry::from_values(values) {
            converted.insert(name.as_str().to_string(), entry);
        }
    }
    converted
}

/// 함수 실행 결과를 원래 HTTP 헤더에 반영합니다.
///
/// `before`는 함수에 넘긴 헤더, `after`는 함수가 돌려준 헤더입니다.
/// 함수가 건드리지 않은 헤더는 원래 바이트 그대로 남고,
/// 바뀌거나 추가된 헤더는 교체되며, 빠진 헤더는 지워집니다.
/// 프록시 구간 헤더는 항상 제거합니다.
pub fn apply_function_headers(
    headers: &mut HeaderMap,
    before: &FunctionHeaders,
    after: &FunctionHeaders,
) -> Result<(), FunctionError> {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }

    for name in before.keys() {
        if !after.contains_key(name) {
            headers.remove(name.as_str());
        }
    }

    for (name, entry) in after {
        if before.get(name) == Some(entry) {
            continue;
        }
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            FunctionError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            }
        })?;
        if is_hop_by_hop(&header_name) {
            continue;
        }

        let values = entry
            .values()
            .into_iter()
            .map(|value| {
                HeaderValue::from_bytes(value.as_bytes()).map_err(|e| FunctionError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, FunctionError>>()?;

        headers.remove(&header_name);
        for value in values {
            headers.append(header_name.clone(), value);
        }
    }
    Ok(())
}

/// 쿼리 문자열을 키별 항목으로 나눕니다. 값은 받은 그대로(인코딩 유지) 둡니다.
pub fn querystring_to_function(query: Option<&str>) -> BTreeMap<String, HeaderEntry> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for pair in query.unwrap_or_default().split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        grouped.entry(key.to_string()).or_default().push(value.to_string());
    }

    grouped
        .into_iter()
        .filter_map(|(key, values)| HeaderEntry::from_values(values).map(|entry| (key, entry)))
        .collect()
}

/// 뷰어 요청으로부터 RequestView를 만듭니다.
pub fn request_view<B>(req: &Request<B>) -> RequestView {
    RequestView {
        method: req.method().to_string(),
        uri: req.uri().path().to_string(),
        querystring: querystring_to_function(req.uri().query()),
        headers: headers_to_function(req.headers()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_to_function_keeps_multi_values() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("cdn.example"));
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("x-amz-meta-title", HeaderValue::from_bytes("한글".as_bytes()).unwrap());
        headers.insert("x-latin1", HeaderValue::from_bytes(b"caf\xe9").unwrap());

        let converted = headers_to_function(&headers);
        assert_eq!(converted["host"].value, "cdn.example");
        assert_eq!(converted["set-cookie"].values(), vec!["a=1", "b=2"]);
        assert_eq!(converted["x-amz-meta-title"].value, "한글");
        assert!(!converted.contains_key("transfer-encoding"));
        assert!(!converted.contains_key("x-latin1"));
    }

    #[test]
    fn test_apply_function_headers_keeps_untouched_bytes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-disposition",
            HeaderValue::from_bytes(b"attachment; filename=\"caf\xe9.txt\"").unwrap(),
        );
        headers.insert("x-amz-meta-title", HeaderValue::from_bytes("한글".as_bytes()).unwrap());
        headers.insert("location", HeaderValue::from_static("http://origin/"));
        headers.insert("etag", HeaderValue::from_static("\"abc\""));
        headers.insert("connection", HeaderValue::from_static("keep-alive"));

        let before = headers_to_function(&headers);
        let mut after = before.clone();
        after.insert("cfn".to_string(), HeaderEntry::new("1"));
        after.insert("location".to_string(), HeaderEntry::new("https://cdn.example/"));
        after.remove("etag");

        apply_function_headers(&mut headers, &before, &after).unwrap();

        assert_eq!(
            headers["content-disposition"].as_bytes(),
            b"attachment; filename=\"caf\xe9.txt\""
        );
        assert_eq!(headers["x-amz-meta-title"].as_bytes(), "한글".as_bytes());
        assert_eq!(headers["location"], "https://cdn.example/");
        assert_eq!(headers["cfn"], "1");
        assert!(headers.get("etag").is_none());
        assert!(headers.get("connection").is_none());
    }

    #[test]
    fn test_apply_function_headers_multi_values() {
        let mut headers = HeaderMap::new();
        let before = headers_to_function(&headers);
        let mut after = before.clone();
        after.insert(
            "set-cookie".to_string(),
            HeaderEntry::from_values(vec!["a=1", "b=2"]).unwrap(),
        );

        apply_function_headers(&mut headers, &before, &after).unwrap();
        assert_eq!(headers.get_all("set-cookie").iter().count(), 2);
    }

    #[test]
    fn test_invalid_function_header() {
        let mut headers = HeaderMap::new();
        let before = FunctionHeaders::new();
        let mut after = FunctionHeaders::new();
        after.insert("location".to_string(), HeaderEntry::new("https://a\nb/"));
        assert!(matches!(
            apply_function_headers(&mut headers, &before, &after),
            Err(FunctionError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_querystring() {
        let query = querystring_to_function(Some("a=1&b=&a=2&flag"));
        assert_eq!(query["a"].values(), vec!["1", "2"]);
        assert_eq!(query["b"].value, "");
        assert_eq!(query["flag"].value, "");
        assert!(querystring_to_function(None).is_empty());
    }

    #[test]
    fn test_request_view() {
        let req = Request::builder()
            .method("GET")
            .uri("/docs/index.html?lang=ko")
            .header("host", "cdn.example")
            .body(())
            .unwrap();

        let view = request_view(&req);
        assert_eq!(view.method, "GET");
        assert_eq!(view.uri, "/docs/index.html");
        assert_eq!(view.querystring["lang"].value, "ko");
        assert_eq!(view.host(), Some("cdn.example"));
    }
}
