//! 배포(distribution) 모델
//!
//! 단일 오리진과 단일 기본 동작으로 이루어진 배포 설정입니다.

mod behavior;
mod origin;

pub use behavior::{AllowedMethods, BehaviorSettings, ViewerProtocolPolicy};
pub use origin::{OriginProtocolPolicy, OriginSettings};

use serde::Deserialize;
use crate::function::FunctionManager;
use crate::settings::SettingsError;

/// 공유 비밀 값을 실어 보내는 오리진 헤더
pub const SECRET_HEADER: &str = "Referer";

fn default_domain_name() -> String {
    "localhost".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DistributionSettings {
    /// 이벤트 context에 보고되는 배포 도메인
    #[serde(default = "default_domain_name")]
    pub domain_name: String,

    #[serde(default)]
    pub distribution_id: String,

    pub origin: OriginSettings,

    #[serde(default)]
    pub behavior: BehaviorSettings,
}

impl DistributionSettings {
    pub fn new(origin: OriginSettings) -> Self {
        Self {
            domain_name: default_domain_name(),
            distribution_id: String::new(),
            origin,
            behavior: BehaviorSettings::default(),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.domain_name.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "distribution.domain_name이 비어 있음".to_string(),
            ));
        }
        self.origin.validate()?;
        FunctionManager::new(&self.behavior.function_associations)?;
        Ok(())
    }
}
