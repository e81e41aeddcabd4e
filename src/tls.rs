use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_rustls::rustls::{self, Certificate, PrivateKey};
use tokio_rustls::TlsAcceptor;
use tracing::{error, info};

use crate::edge::EdgeError;

/// HTTPS 뷰어 리스너
pub struct TlsConfig {
    pub acceptor: TlsAcceptor,
    pub listener: TcpListener,
}

impl TlsConfig {
    pub async fn new(cert_path: &str, key_path: &str, addr: &str) -> Result<Self, EdgeError> {
        let tls_config = Self::load_tls_config(cert_path, key_path)?;
        let acceptor = TlsAcceptor::from(Arc::new(tls_config));

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            error!(error = %e, addr = %addr, "HTTPS 포트 바인딩 실패");
            EdgeError::Bind { addr: addr.to_string(), error: e }
        })?;

        info!(addr = %addr, "HTTPS 리스너 시작");
        Ok(Self { acceptor, listener })
    }

    fn load_tls_config(cert_path: &str, key_path: &str) -> Result<rustls::ServerConfig, EdgeError> {
        let tls_error = |path: &str, e: &dyn std::fmt::Display| EdgeError::Tls(format!("{}: {}", path, e));

        let cert_file = File::open(cert_path).map_err(|e| tls_error(cert_path, &e))?;
        let mut cert_reader = BufReader::new(cert_file);
        let certs: Vec<Certificate> = rustls_pemfile::certs(&mut cert_reader)
            .map_err(|e| tls_error(cert_path, &e))?
            .into_iter()
            .map(Certificate)
            .collect();
        if certs.is_empty() {
            return Err(EdgeError::Tls(format!("{}: 인증서를 찾을 수 없음", cert_path)));
        }

        let key_file = File::open(key_path).map_err(|e| tls_error(key_path, &e))?;
        let mut key_reader = BufReader::new(key_file);
        let key = rustls_pemfile::pkcs8_private_keys(&mut key_reader)
            .map_err(|e| tls_error(key_path, &e))?
            .into_iter()
            .next()
            .ok_or_else(|| EdgeError::Tls(format!("{}: 개인키를 찾을 수 없음", key_path)))?;

        rustls::ServerConfig::builder()
            .with_safe_defaults()
            .with_no_client_auth()
            .with_single_cert(certs, PrivateKey(key))
            .map_err(|e| EdgeError::Tls(e.to_string()))
    }
}
