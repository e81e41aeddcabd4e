use std::{env, fs, path::Path};
use serde::Deserialize;
use tracing::debug;

use crate::distribution::{
    AllowedMethods, DistributionSettings, OriginSettings, ViewerProtocolPolicy, SECRET_HEADER,
};

mod error;
pub mod logging;
mod server;

pub use error::SettingsError;
pub use logging::{LogFormat, LogOutput, LogSettings};
pub use server::{parse_env_var, ServerSettings};

pub type Result<T> = std::result::Result<T, SettingsError>;

/// 설정 파일 경로를 지정하는 환경 변수
pub const CONFIG_FILE_ENV: &str = "EDGE_CONFIG_FILE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    // 배포 설정
    pub distribution: DistributionSettings,
}

impl Settings {
    /// 설정 파일이 지정되어 있으면 파일에서, 아니면 환경 변수에서 읽습니다.
    pub fn load() -> Result<Self> {
        match env::var(CONFIG_FILE_ENV) {
            Ok(config_path) => Self::from_toml_file(&config_path),
            Err(_) => Self::from_env(),
        }
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("설정 파일 로드: {}", path.as_ref().display());
        let content = fs::read_to_string(&path).map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        let settings = Self::from_toml_str(&content)?;
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| SettingsError::ParseError { source: e })?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_env() -> Result<Self> {
        let settings = Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            distribution: distribution_from_env()?,
        };

        // 설정 생성 시점에 바로 검증
        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.distribution.validate()?;
        Ok(())
    }
}

fn distribution_from_env() -> Result<DistributionSettings> {
    let domain_name = env::var("EDGE_ORIGIN_DOMAIN").map_err(|_| SettingsError::EnvVarMissing {
        var_name: "EDGE_ORIGIN_DOMAIN".to_string(),
    })?;

    let mut origin = OriginSettings::new(domain_name);
    if let Ok(path) = env::var("EDGE_ORIGIN_PATH") {
        origin = origin.with_origin_path(path);
    }
    if let Ok(secret) = env::var("EDGE_ORIGIN_SECRET") {
        origin = origin.with_custom_header(SECRET_HEADER, secret);
    }

    let mut distribution = DistributionSettings::new(origin);
    if let Ok(domain) = env::var("EDGE_DISTRIBUTION_DOMAIN") {
        distribution.domain_name = domain;
    }
    distribution.behavior.viewer_protocol_policy =
        parse_env_var("EDGE_VIEWER_PROTOCOL", ViewerProtocolPolicy::default)?;
    distribution.behavior.allowed_methods =
        parse_env_var("EDGE_ALLOWED_METHODS", AllowedMethods::default)?;

    Ok(distribution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_toml() {
        let toml_content = r#"
            [server]
            http_port = 9080

            [logging]
            format = "json"
            level = "debug"
            output = "stderr"

            [distribution.origin]
            domain_name = "127.0.0.1:9000"

            [distribution.behavior]
            viewer_protocol_policy = "allow-all"
        "#;

        let settings = Settings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.server.http_port, 9080);
        assert!(!settings.server.https_enabled);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.level, tracing::Level::DEBUG);
        assert_eq!(settings.logging.output, LogOutput::Stderr);
        assert_eq!(
            settings.distribution.behavior.viewer_protocol_policy,
            ViewerProtocolPolicy::AllowAll
        );
        assert_eq!(
            settings.distribution.behavior.allowed_methods,
            AllowedMethods::GetHeadOptions
        );
    }

    #[test]
    fn test_settings_requires_distribution() {
        let result = Settings::from_toml_str("[server]\nhttp_port = 80\n");
        assert!(matches!(result, Err(SettingsError::ParseError { .. })));
    }

    #[test]
    fn test_invalid_log_level_in_toml() {
        let toml_content = r#"
            [logging]
            level = "loud"

            [distribution.origin]
            domain_name = "127.0.0.1:9000"
        "#;
        assert!(Settings::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_https_requires_certificates() {
        let toml_content = r#"
            [server]
            https_enabled = true

            [distribution.origin]
            domain_name = "127.0.0.1:9000"
        "#;
        let result = Settings::from_toml_str(toml_content);
        assert!(matches!(result, Err(SettingsError::EnvVarMissing { .. })));
    }
}
