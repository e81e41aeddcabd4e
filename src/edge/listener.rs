use std::net::SocketAddr;
use std::sync::Arc;

use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::settings::ServerSettings;
use crate::tls::TlsConfig;
use super::handler::{EdgeHandler, ViewerScheme};
use super::EdgeError;

/// HTTP(및 선택적 HTTPS) 뷰어 리스너
pub struct EdgeListener {
    http_listener: TcpListener,
    https_config: Option<TlsConfig>,
}

impl EdgeListener {
    pub async fn new(settings: &ServerSettings) -> Result<Self, EdgeError> {
        let addr = settings.http_addr();
        let http_listener = TcpListener::bind(&addr).await.map_err(|e| {
            error!(error = %e, addr = %addr, "HTTP 포트 바인딩 실패");
            EdgeError::Bind { addr: addr.clone(), error: e }
        })?;
        info!(addr = %addr, "HTTP 리스너 시작");

        let https_config = match (&settings.tls_cert_path, &settings.tls_key_path) {
            (Some(cert_path), Some(key_path)) if settings.https_enabled => {
                Some(TlsConfig::new(cert_path, key_path, &settings.https_addr()).await?)
            }
            _ => None,
        };

        Ok(Self {
            http_listener,
            https_config,
        })
    }

    /// 이미 바인딩된 HTTP 리스너로 생성합니다.
    pub fn from_listener(http_listener: TcpListener) -> Self {
        Self {
            http_listener,
            https_config: None,
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.http_listener.local_addr()
    }

    pub async fn run(self, handler: Arc<EdgeHandler>) -> Result<(), EdgeError> {
        loop {
            tokio::select! {
                result = self.http_listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            let handler = handler.clone();
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                if let Err(err) = handler.handle_connection(io, ViewerScheme::Http, peer).await {
                                    error!(error = %err, "HTTP 연결 처리 실패");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "HTTP 연결 수락 실패");
                        }
                    }
                }

                result = async {
                    match &self.https_config {
                        Some(config) => config.listener.accept().await,
                        None => std::future::pending().await,
                    }
                } => {
                    match (result, &self.https_config) {
                        (Ok((stream, peer)), Some(config)) => {
                            let handler = handler.clone();
                            let acceptor = config.acceptor.clone();

                            tokio::spawn(async move {
                                match acceptor.accept(stream).await {
                                    Ok(tls_stream) => {
                                        let io = TokioIo::new(tls_stream);
                                        if let Err(err) = handler.handle_connection(io, ViewerScheme::Https, peer).await {
                                            error!(error = %err, "HTTPS 연결 처리 실패");
                                        }
                                    }
                                    Err(e) => {
                                        error!(error = %e, "TLS 핸드쉐이크 실패");
                                    }
                                }
                            });
                        }
                        (Err(e), _) => {
                            error!(error = %e, "HTTPS 연결 수락 실패");
                        }
                        (Ok(_), None) => {}
                    }
                }
            }
        }
    }
}
