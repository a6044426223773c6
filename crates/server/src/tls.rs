use crate::config::TlsConfig;
use anyhow::{Context, Result};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use futures::StreamExt;
use rustls_acme::{caches::DirCache, AcmeConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CERT_FILE: &str = "cert.pem";
const KEY_FILE: &str = "key.pem";

/// Install the process-wide rustls crypto provider. Safe to call twice.
pub fn install_crypto_provider() {
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }
}

/// HTTPS from PEM files, or from a self-signed certificate kept in
/// `cert_dir` when no files are configured.
pub async fn serve_https(
    addr: SocketAddr,
    app: Router,
    tls: &TlsConfig,
    names: Vec<String>,
) -> Result<()> {
    let (cert, key) = match (&tls.cert_path, &tls.key_path) {
        (Some(cert), Some(key)) => (cert.clone(), key.clone()),
        _ => ensure_self_signed(&tls.cert_dir, names)?,
    };

    let rustls = RustlsConfig::from_pem_file(&cert, &key)
        .await
        .with_context(|| format!("Failed to load TLS certificate {}", cert.display()))?;

    tracing::info!("HTTPS listening on {} (certificate {})", addr, cert.display());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    axum_server::bind_rustls(addr, rustls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .context("HTTPS server failed")?;

    Ok(())
}

/// HTTPS with certificates from Let's Encrypt (TLS-ALPN-01).
pub async fn serve_acme(addr: SocketAddr, app: Router, tls: &TlsConfig) -> Result<()> {
    let domain = tls
        .domain
        .clone()
        .context("acme mode requires a domain")?;

    let mut config = AcmeConfig::new([domain.clone()])
        .cache(DirCache::new(tls.acme_cache_dir.clone()))
        .directory_lets_encrypt(tls.acme_production);
    if let Some(email) = &tls.acme_email {
        config = config.contact_push(format!("mailto:{}", email));
    }

    let mut state = config.state();
    let acceptor = state.axum_acceptor(state.default_rustls_config());

    tokio::spawn(async move {
        while let Some(event) = state.next().await {
            match event {
                Ok(ok) => tracing::info!("acme event: {:?}", ok),
                Err(err) => tracing::error!("acme error: {:?}", err),
            }
        }
    });

    tracing::info!(
        "HTTPS (Let's Encrypt {}) listening on {} for {}",
        if tls.acme_production { "production" } else { "staging" },
        addr,
        domain
    );

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    axum_server::bind(addr)
        .acceptor(acceptor)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .context("HTTPS server failed")?;

    Ok(())
}

/// Paths of the self-signed certificate in `dir`, generating it on first use.
pub fn ensure_self_signed(dir: &Path, names: Vec<String>) -> Result<(PathBuf, PathBuf)> {
    let cert_path = dir.join(CERT_FILE);
    let key_path = dir.join(KEY_FILE);

    if cert_path.exists() && key_path.exists() {
        tracing::info!("Reusing self-signed certificate in {}", dir.display());
        return Ok((cert_path, key_path));
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create certificate directory {}", dir.display()))?;

    let certified = rcgen::generate_simple_self_signed(names.clone())
        .context("Failed to generate self-signed certificate")?;

    std::fs::write(&cert_path, certified.cert.pem()).context("Failed to write certificate")?;
    write_private_key(&key_path, certified.key_pair.serialize_pem().as_bytes())
        .context("Failed to write private key")?;

    tracing::warn!(
        "Generated self-signed certificate for {} in {}; clients must trust it explicitly",
        names.join(", "),
        dir.display()
    );

    Ok((cert_path, key_path))
}

/// Private key readable by the owner only
#[cfg(unix)]
fn write_private_key(path: &Path, pem: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies when the file is created
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(pem)
}

#[cfg(not(unix))]
fn write_private_key(path: &Path, pem: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, pem)
}

async fn graceful_shutdown(handle: Handle) {
    crate::shutdown_signal().await;
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
