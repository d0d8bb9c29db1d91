//! Mailbox session lifecycle
//!
//! [`MailSession`] owns the single connection to the IMAP server. It
//! is created Disconnected, moves to Connected on a successful
//! `connect()`, and back on `disconnect()`; both calls are idempotent
//! no-ops when already in the target state. There is never more than
//! one live connection per value, and the operation layer borrows the
//! session exclusively, so commands are serialized by construction.

use crate::config::ImapConfig;
use crate::error::{Error, Result};
use async_imap::Session;
use rustls::pki_types::ServerName;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info};

/// A TLS-wrapped IMAP session.
pub type ImapSession = Session<Compat<tokio_rustls::client::TlsStream<TcpStream>>>;

/// The one lifecycle-managed connection to the configured account.
pub struct MailSession {
    config: ImapConfig,
    inner: Option<ImapSession>,
}

impl MailSession {
    #[must_use]
    pub const fn new(config: ImapConfig) -> Self {
        Self {
            config,
            inner: None,
        }
    }

    /// Whether a live session is currently held.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.inner.is_some()
    }

    /// Establish the connection and log in.
    ///
    /// No-op when already connected. With `tls` set the TLS handshake
    /// happens immediately after the TCP connect (implicit TLS, the
    /// port-993 mode); otherwise the connection is upgraded via
    /// STARTTLS. Peer certificates are NOT verified in either mode:
    /// the accounts this targets frequently sit behind bridges or
    /// providers with self-signed certificates. Credentials are only
    /// ever sent inside the TLS channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tls`] for handshake failures and
    /// [`Error::Connection`] for login failures; the state stays
    /// Disconnected on any failure.
    pub async fn connect(&mut self) -> Result<()> {
        if self.inner.is_some() {
            debug!("Already connected");
            return Ok(());
        }

        let addr = format!("{}:{}", self.config.host, self.config.port);
        debug!("Connecting to IMAP server at {}", addr);

        let tcp_stream = TcpStream::connect(&addr).await?;

        let connector = tls_connector();
        let server_name = ServerName::try_from(self.config.host.clone())
            .map_err(|e| Error::Tls(format!("Invalid server name: {e}")))?;

        let tls_stream = if self.config.tls {
            connector
                .connect(server_name, tcp_stream)
                .await
                .map_err(|e| Error::Tls(e.to_string()))?
        } else {
            let mut client = async_imap::Client::new(tcp_stream.compat());
            client
                .run_command_and_check_ok("STARTTLS", None)
                .await
                .map_err(|e| Error::Tls(format!("STARTTLS failed: {e}")))?;
            let inner = client.into_inner().into_inner();
            connector
                .connect(server_name, inner)
                .await
                .map_err(|e| Error::Tls(e.to_string()))?
        };

        let client = async_imap::Client::new(tls_stream.compat());
        let session = client
            .login(&self.config.address, &self.config.password)
            .await
            .map_err(|(e, _)| Error::Connection(format!("Login failed: {e}")))?;

        info!("Connected to IMAP server");
        self.inner = Some(session);
        Ok(())
    }

    /// Log out and drop the connection.
    ///
    /// No-op when already disconnected. The session value is dropped
    /// before LOGOUT errors are reported, so the state is
    /// Disconnected afterwards either way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] when the LOGOUT exchange fails.
    pub async fn disconnect(&mut self) -> Result<()> {
        let Some(mut session) = self.inner.take() else {
            debug!("Already disconnected");
            return Ok(());
        };

        session
            .logout()
            .await
            .map_err(|e| Error::Connection(format!("Logout failed: {e}")))?;

        info!("Disconnected from IMAP server");
        Ok(())
    }

    /// Borrow the live session for issuing commands.
    pub(crate) fn active(&mut self) -> Result<&mut ImapSession> {
        self.inner
            .as_mut()
            .ok_or_else(|| Error::Connection("Not connected".into()))
    }
}

/// Build a TLS connector that accepts all certificates.
fn tls_connector() -> TlsConnector {
    let config = rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCert))
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}

/// Certificate verifier that accepts all certificates.
///
/// Deliberate policy, not an accident: the target deployments sit
/// behind self-signed or misconfigured provider certificates.
#[derive(Debug)]
struct AcceptAnyCert;

impl rustls::client::danger::ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::ECDSA_NISTP521_SHA512,
            rustls::SignatureScheme::RSA_PSS_SHA256,
            rustls::SignatureScheme::RSA_PSS_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA512,
            rustls::SignatureScheme::ED25519,
        ]
    }
}
