//! Connection gatekeeper: resolves an offered credential to an identity
//! through the allow-list before any session exists.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

/// Name of an admitted client, as listed in the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `(credential) -> allow | deny`.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, credential: &str) -> Option<Identity>;
}

/// Fixed name -> credential list, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    entries: Vec<(Identity, String)>,
}

impl AllowList {
    pub fn new(identities: BTreeMap<String, String>) -> Self {
        let entries = identities
            .into_iter()
            .map(|(name, cred)| (Identity::new(name), key_material(&cred)))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Authorizer for AllowList {
    fn authorize(&self, credential: &str) -> Option<Identity> {
        let offered = key_material(credential);
        if offered.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(_, cred)| *cred == offered)
            .map(|(id, _)| id.clone())
    }
}

/// Authorized-key lines (`<type> <base64> [comment]`) compare on type and key
/// only. Anything else compares as the trimmed string.
fn key_material(credential: &str) -> String {
    let mut parts = credential.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(kind), Some(key)) if is_key_type(kind) => format!("{kind} {key}"),
        _ => credential.trim().to_string(),
    }
}

fn is_key_type(kind: &str) -> bool {
    kind.starts_with("ssh-") || kind.starts_with("ecdsa-") || kind.starts_with("sk-")
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GateError {
    #[error("authorization denied")]
    AuthorizationDenied,
}

#[derive(Clone)]
pub struct Gatekeeper {
    authorizer: Arc<dyn Authorizer>,
}

impl Gatekeeper {
    pub fn new(authorizer: Arc<dyn Authorizer>) -> Self {
        Self { authorizer }
    }

    /// Admit or refuse. A missing credential is refused like an unknown one.
    pub fn admit(&self, credential: Option<&str>) -> Result<Identity, GateError> {
        match credential.and_then(|c| self.authorizer.authorize(c)) {
            Some(identity) => {
                info!(identity = %identity, "client admitted");
                Ok(identity)
            }
            None => {
                warn!(offered = credential.is_some(), "client refused");
                Err(GateError::AuthorizationDenied)
            }
        }
    }
}
