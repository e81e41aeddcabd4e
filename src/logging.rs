use std::path::Path;
use time::format_description::well_known::Rfc3339;
use tracing::{error, info, span, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt::time::UtcTime, EnvFilter};

use crate::settings::{LogFormat, LogOutput, LogSettings, SettingsError};

/// 로깅을 초기화합니다. 반환된 guard가 살아 있는 동안 로그가 기록됩니다.
///
/// `RUST_LOG`가 지정되어 있으면 설정의 레벨보다 우선합니다.
pub fn init_logging(settings: &LogSettings) -> Result<WorkerGuard, SettingsError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(settings.level).into())
    });

    let (writer, guard) = match &settings.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogOutput::File(path) => {
            let path = Path::new(path);
            let directory = path.parent().filter(|dir| !dir.as_os_str().is_empty());
            let file_name = path.file_name().ok_or_else(|| {
                SettingsError::LoggingInit(format!("로그 파일 이름이 없음: {}", path.display()))
            })?;
            let appender = tracing_appender::rolling::never(
                directory.unwrap_or_else(|| Path::new(".")),
                file_name,
            );
            tracing_appender::non_blocking(appender)
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_timer(UtcTime::new(Rfc3339))
        .with_target(true)
        .with_ansi(matches!(settings.output, LogOutput::Stdout | LogOutput::Stderr));

    let result = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    result.map_err(|e| SettingsError::LoggingInit(e.to_string()))?;

    Ok(guard)
}

/// 요청 하나의 처리 기록
#[derive(Debug)]
pub struct RequestLog {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub host: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub origin_url: Option<String>,
    pub error: Option<String>,
}

impl RequestLog {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            method: String::new(),
            path: String::new(),
            host: String::new(),
            status_code: 0,
            duration_ms: 0,
            origin_url: None,
            error: None,
        }
    }

    pub fn with_request<B>(&mut self, req: &hyper::Request<B>) {
        self.method = req.method().to_string();
        self.path = req.uri().path().to_string();
        if let Some(host) = req.headers().get(hyper::header::HOST) {
            self.host = host.to_str().unwrap_or_default().to_string();
        }

        info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            host = %self.host,
            "요청 수신"
        );
    }

    pub fn with_response(&mut self, status: hyper::StatusCode) {
        self.status_code = status.as_u16();
    }

    pub fn with_origin(&mut self, url: &str) {
        self.origin_url = Some(url.to_string());
    }

    pub fn with_error(&mut self, error: impl std::fmt::Display) {
        let error_msg = error.to_string();
        error!(
            request_id = %self.request_id,
            error = %error_msg,
            "요청 처리 오류"
        );
        self.error = Some(error_msg);
    }
}

pub fn log_request(log: &RequestLog) {
    let span = span!(
        Level::INFO,
        "request",
        request_id = %log.request_id,
        method = %log.method,
        path = %log.path,
        host = %log.host,
        status = %log.status_code,
        duration_ms = %log.duration_ms
    );
    let _enter = span.enter();

    if log.error.is_some() {
        error!(origin = ?log.origin_url, error = ?log.error, "요청 실패");
    } else if log.status_code >= 400 {
        warn!(origin = ?log.origin_url, "요청 완료 (오류 상태)");
    } else {
        info!(origin = ?log.origin_url, "요청 완료");
    }
}
