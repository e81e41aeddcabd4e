use hyper::Method;
use serde::Deserialize;
use std::str::FromStr;

use crate::function::{default_associations, FunctionAssociation};

/// 허용 메서드 집합
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllowedMethods {
    GetHead,
    #[default]
    GetHeadOptions,
    All,
}

impl AllowedMethods {
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            AllowedMethods::GetHead => method == Method::GET || method == Method::HEAD,
            AllowedMethods::GetHeadOptions => {
                method == Method::GET || method == Method::HEAD || method == Method::OPTIONS
            }
            AllowedMethods::All => [
                Method::GET,
                Method::HEAD,
                Method::OPTIONS,
                Method::PUT,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
            ]
            .contains(method),
        }
    }
}

impl FromStr for AllowedMethods {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "get-head" => Ok(AllowedMethods::GetHead),
            "get-head-options" => Ok(AllowedMethods::GetHeadOptions),
            "all" => Ok(AllowedMethods::All),
            _ => Err(format!("Invalid allowed methods: {}", s)),
        }
    }
}

/// 뷰어 프로토콜 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    AllowAll,
    RedirectToHttps,
    #[default]
    HttpsOnly,
}

impl FromStr for ViewerProtocolPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow-all" => Ok(ViewerProtocolPolicy::AllowAll),
            "redirect-to-https" => Ok(ViewerProtocolPolicy::RedirectToHttps),
            "https-only" => Ok(ViewerProtocolPolicy::HttpsOnly),
            _ => Err(format!("Invalid viewer protocol policy: {}", s)),
        }
    }
}

/// 기본 동작 설정
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BehaviorSettings {
    #[serde(default)]
    pub allowed_methods: AllowedMethods,

    #[serde(default)]
    pub viewer_protocol_policy: ViewerProtocolPolicy,

    #[serde(default = "default_associations")]
    pub function_associations: Vec<FunctionAssociation>,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            allowed_methods: AllowedMethods::default(),
            viewer_protocol_policy: ViewerProtocolPolicy::default(),
            function_associations: default_associations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_methods() {
        let methods = AllowedMethods::GetHeadOptions;
        assert!(methods.allows(&Method::GET));
        assert!(methods.allows(&Method::HEAD));
        assert!(methods.allows(&Method::OPTIONS));
        assert!(!methods.allows(&Method::POST));

        assert!(!AllowedMethods::GetHead.allows(&Method::OPTIONS));
        assert!(AllowedMethods::All.allows(&Method::DELETE));
        assert!(!AllowedMethods::All.allows(&Method::CONNECT));
    }

    #[test]
    fn test_parse_policies() {
        assert_eq!("GET-HEAD".parse::<AllowedMethods>(), Ok(AllowedMethods::GetHead));
        assert_eq!(
            "redirect-to-https".parse::<ViewerProtocolPolicy>(),
            Ok(ViewerProtocolPolicy::RedirectToHttps)
        );
        assert!("sometimes".parse::<ViewerProtocolPolicy>().is_err());
    }
}
