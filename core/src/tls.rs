//! Mutual-TLS client construction
//!
//! Credentials are read once at startup. The resulting [`reqwest::Client`]
//! presents the client certificate and never verifies the server's
//! certificate: only the server authenticates its peer.

use crate::config::TlsPaths;
use crate::error::{CredentialRole, LoadError, LoadResult};

use std::path::Path;

/// PEM credentials loaded from disk
///
/// Immutable once loaded; the key material is never printed by `Debug`.
#[derive(Clone)]
pub struct TlsCredentials {
    /// Client certificate chain followed by its private key, PEM encoded
    identity_pem: Vec<u8>,
    /// DER-encoded CA certificates
    ca_roots: Vec<Vec<u8>>,
    client_chain_len: usize,
}

impl TlsCredentials {
    /// Read and validate the three credential files
    ///
    /// # Errors
    /// Returns [`LoadError::Credential`] naming the first file that cannot
    /// be read or holds no usable PEM item.
    pub fn load(paths: &TlsPaths) -> LoadResult<Self> {
        let cert_pem = read_file(CredentialRole::ClientCertificate, &paths.cert)?;
        let client_chain = parse_certificates(CredentialRole::ClientCertificate, &paths.cert, &cert_pem)?;

        let key_pem = read_file(CredentialRole::PrivateKey, &paths.key)?;
        check_private_key(&paths.key, &key_pem)?;

        let ca_pem = read_file(CredentialRole::CaCertificate, &paths.ca)?;
        let ca_roots = parse_certificates(CredentialRole::CaCertificate, &paths.ca, &ca_pem)?;

        tracing::debug!(
            cert = %paths.cert.display(),
            key = %paths.key.display(),
            ca = %paths.ca.display(),
            chain_len = client_chain.len(),
            ca_roots = ca_roots.len(),
            "Loaded TLS credentials"
        );

        let mut identity_pem = cert_pem;
        if !identity_pem.ends_with(b"\n") {
            identity_pem.push(b'\n');
        }
        identity_pem.extend_from_slice(&key_pem);

        Ok(Self {
            identity_pem,
            ca_roots,
            client_chain_len: client_chain.len(),
        })
    }

    /// Number of certificates in the client chain
    pub fn client_chain_len(&self) -> usize {
        self.client_chain_len
    }

    /// Number of CA certificates offered as trust roots
    pub fn ca_root_count(&self) -> usize {
        self.ca_roots.len()
    }

    /// Build the shared HTTPS client
    ///
    /// `pool_size` bounds idle keep-alive connections to the target; pass the
    /// worker count so every worker can keep its connection warm.
    pub fn build_client(&self, pool_size: usize) -> LoadResult<reqwest::Client> {
        let identity = reqwest::Identity::from_pem(&self.identity_pem).map_err(LoadError::Tls)?;

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .danger_accept_invalid_certs(true)
            .pool_max_idle_per_host(pool_size);

        for der in &self.ca_roots {
            let root = reqwest::Certificate::from_der(der).map_err(LoadError::Tls)?;
            builder = builder.add_root_certificate(root);
        }

        builder.build().map_err(LoadError::Tls)
    }
}

impl std::fmt::Debug for TlsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsCredentials")
            .field("client_chain_len", &self.client_chain_len)
            .field("ca_roots", &self.ca_roots.len())
            .finish_non_exhaustive()
    }
}

fn read_file(role: CredentialRole, path: &Path) -> LoadResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| LoadError::credential(role, path, e.to_string()))
}

fn parse_certificates(role: CredentialRole, path: &Path, pem: &[u8]) -> LoadResult<Vec<Vec<u8>>> {
    let certs = rustls_pemfile::certs(&mut &pem[..])
        .map(|cert| cert.map(|der| der.as_ref().to_vec()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| LoadError::credential(role, path, e.to_string()))?;

    if certs.is_empty() {
        return Err(LoadError::credential(
            role,
            path,
            "no PEM certificate found",
        ));
    }
    Ok(certs)
}

fn check_private_key(path: &Path, pem: &[u8]) -> LoadResult<()> {
    match rustls_pemfile::private_key(&mut &pem[..]) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(LoadError::credential(
            CredentialRole::PrivateKey,
            path,
            "no PEM private key found",
        )),
        Err(e) => Err(LoadError::credential(
            CredentialRole::PrivateKey,
            path,
            e.to_string(),
        )),
    }
}
