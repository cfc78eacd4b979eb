//! Error types for mtls-load-core

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Which credential file a load error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialRole {
    /// PEM client certificate presented to the server
    ClientCertificate,
    /// PEM private key matching the client certificate
    PrivateKey,
    /// PEM CA bundle used as trust roots
    CaCertificate,
}

impl std::fmt::Display for CredentialRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CredentialRole::ClientCertificate => "client certificate",
            CredentialRole::PrivateKey => "private key",
            CredentialRole::CaCertificate => "CA certificate",
        };
        f.write_str(name)
    }
}

/// Core error type
#[derive(Error, Debug)]
pub enum LoadError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A builder was missing a required part
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// A credential file could not be read or parsed
    #[error("failed to load {role} from {}: {reason}", path.display())]
    Credential {
        /// Which credential failed
        role: CredentialRole,
        /// Path that was read
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// The HTTPS client could not be constructed
    #[error("failed to build TLS client: {0}")]
    Tls(#[source] reqwest::Error),

    /// Worker or orchestration failure
    #[error("orchestration error: {0}")]
    Orchestration(String),
}

impl LoadError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        LoadError::Config(message.into())
    }

    /// Create a missing-configuration error for a builder field
    pub fn missing_config(field: &'static str) -> Self {
        LoadError::MissingConfig(field)
    }

    /// Create a credential error
    pub fn credential(role: CredentialRole, path: &Path, reason: impl Into<String>) -> Self {
        LoadError::Credential {
            role,
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create an orchestration error
    pub fn orchestration(message: impl Into<String>) -> Self {
        LoadError::Orchestration(message.into())
    }
}

/// Result type alias
pub type LoadResult<T> = std::result::Result<T, LoadError>;
