use std::fmt;
use super::error::FunctionError;

/// 뷰어 Host 헤더에서 얻은 호스트 정보입니다.
///
/// # 필드
///
/// * `name` - 호스트 이름 (예: "cdn.example", IPv6는 "[::1]"처럼 대괄호 포함)
/// * `port` - 선택적 포트 번호
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostInfo {
    pub name: String,
    pub port: Option<u16>,
}

impl HostInfo {
    /// Host 헤더 값에서 HostInfo를 생성합니다.
    ///
    /// # 예제
    ///
    /// ```
    /// use spa_edge::function::HostInfo;
    ///
    /// let host = HostInfo::from_header_value("cdn.example:8443").unwrap();
    /// assert_eq!(host.name, "cdn.example");
    /// assert_eq!(host.port, Some(8443));
    /// assert_eq!(host.to_string(), "cdn.example:8443");
    /// ```
    pub fn from_header_value(value: &str) -> Result<Self, FunctionError> {
        if value.is_empty() {
            return Err(invalid(value, "빈 값"));
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control() || "/?#@\\".contains(c)) {
            return Err(invalid(value, "URL 호스트에 쓸 수 없는 문자 포함"));
        }

        // IPv6 리터럴
        if value.starts_with('[') {
            let end = value.find(']').ok_or_else(|| invalid(value, "닫는 대괄호 없음"))?;
            let (name, rest) = value.split_at(end + 1);
            let port = match rest {
                "" => None,
                _ => match rest.strip_prefix(':') {
                    Some(port) => Some(parse_port(value, port)?),
                    None => return Err(invalid(value, "Invalid format")),
                },
            };
            return Ok(HostInfo { name: name.to_string(), port });
        }

        let parts: Vec<&str> = value.split(':').collect();
        match parts.as_slice() {
            [name] => Ok(HostInfo {
                name: name.to_string(),
                port: None,
            }),
            [name, port] => {
                if name.is_empty() {
                    return Err(invalid(value, "Invalid format"));
                }
                Ok(HostInfo {
                    name: name.to_string(),
                    port: Some(parse_port(value, port)?),
                })
            }
            _ => Err(invalid(value, "Invalid format")),
        }
    }
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.name, port),
            None => write!(f, "{}", self.name),
        }
    }
}

fn parse_port(host: &str, port: &str) -> Result<u16, FunctionError> {
    let port = port
        .parse::<u16>()
        .map_err(|_| invalid(host, "포트 형식 오류"))?;
    if port == 0 {
        return Err(invalid(host, "포트는 0보다 커야 함"));
    }
    Ok(port)
}

fn invalid(host: &str, reason: &str) -> FunctionError {
    FunctionError::InvalidHost {
        host: host.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_info_parsing() {
        let test_cases = vec![
            ("cdn.example", Some(("cdn.example", None))),
            ("cdn.example:8443", Some(("cdn.example", Some(8443)))),
            ("[::1]", Some(("[::1]", None))),
            ("[::1]:8080", Some(("[::1]", Some(8080)))),
            ("", None),
            (":8080", None),
            ("cdn.example:", None),
            ("cdn.example:0", None),
            ("cdn.example:65536", None),
            ("cdn.example:80:extra", None),
            ("evil.example/path", None),
            ("user@cdn.example", None),
            ("cdn .example", None),
            ("[::1", None),
            ("[::1]x", None),
        ];

        for (input, expected) in test_cases {
            let result = HostInfo::from_header_value(input);
            match expected {
                Some((name, port)) => {
                    let info = result.unwrap_or_else(|e| panic!("{} 파싱 실패: {}", input, e));
                    assert_eq!(info.name, name);
                    assert_eq!(info.port, port);
                    assert_eq!(info.to_string(), input);
                }
                None => {
                    let err = result.expect_err(input);
                    assert!(matches!(err, FunctionError::InvalidHost { .. }), "{}", input);
                }
            }
        }
    }
}
