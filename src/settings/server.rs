use serde::Deserialize;
use std::env;
use std::path::Path;
use super::SettingsError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ServerSettings {
    /// 바인딩 주소 (기본값: 0.0.0.0)
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP 포트 (기본값: 8080)
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// HTTPS 활성화 여부
    #[serde(default)]
    pub https_enabled: bool,

    /// HTTPS 포트 (기본값: 8443)
    #[serde(default = "default_https_port")]
    pub https_port: u16,

    /// TLS 인증서 경로 (PEM)
    pub tls_cert_path: Option<String>,

    /// TLS 키 경로 (PKCS#8 PEM)
    pub tls_key_path: Option<String>,
}

fn default_bind_address() -> String { "0.0.0.0".to_string() }
fn default_http_port() -> u16 { 8080 }
fn default_https_port() -> u16 { 8443 }

pub fn parse_env_var<T: std::str::FromStr, F: FnOnce() -> T>(name: &str, default: F) -> Result<T, SettingsError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: val,
            reason: e.to_string(),
        }),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(e) => Err(SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: "".to_string(),
            reason: e.to_string(),
        }),
    }
}

impl ServerSettings {
    fn parse_port(name: &str, default: u16) -> Result<u16, SettingsError> {
        let port: u16 = parse_env_var(name, || default)?;
        if port == 0 {
            return Err(SettingsError::EnvVarInvalid {
                var_name: name.to_string(),
                value: port.to_string(),
                reason: "포트는 0이 될 수 없습니다".to_string(),
            });
        }
        Ok(port)
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        let settings = Self {
            bind_address: env::var("EDGE_BIND_ADDRESS").unwrap_or_else(|_| default_bind_address()),
            http_port: Self::parse_port("EDGE_HTTP_PORT", default_http_port())?,
            https_enabled: parse_env_var::<bool, _>("EDGE_HTTPS_ENABLED", || false)?,
            https_port: Self::parse_port("EDGE_HTTPS_PORT", default_https_port())?,
            tls_cert_path: env::var("EDGE_TLS_CERT").ok(),
            tls_key_path: env::var("EDGE_TLS_KEY").ok(),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.http_port)
    }

    pub fn https_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.https_port)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.https_enabled {
            return Ok(());
        }

        // HTTPS가 활성화된 경우 인증서/키 파일 필수 검사
        let cert_path = self.tls_cert_path.as_ref().ok_or_else(|| SettingsError::EnvVarMissing {
            var_name: "EDGE_TLS_CERT".to_string(),
        })?;
        let key_path = self.tls_key_path.as_ref().ok_or_else(|| SettingsError::EnvVarMissing {
            var_name: "EDGE_TLS_KEY".to_string(),
        })?;

        for path in [cert_path, key_path] {
            if !Path::new(path).exists() {
                return Err(SettingsError::FileError {
                    path: path.clone(),
                    error: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "파일을 찾을 수 없습니다",
                    ),
                });
            }
        }

        // HTTP/HTTPS 포트 충돌 검사
        if self.http_port == self.https_port {
            return Err(SettingsError::EnvVarInvalid {
                var_name: "EDGE_HTTP_PORT/EDGE_HTTPS_PORT".to_string(),
                value: format!("{}/{}", self.http_port, self.https_port),
                reason: "HTTP와 HTTPS 포트는 달라야 합니다".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            http_port: default_http_port(),
            https_enabled: false,
            https_port: default_https_port(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}
