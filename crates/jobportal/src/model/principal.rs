//! The authenticated actor behind a request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LifecycleError;

/// Kind of principal, as stored next to access tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Company,
    User,
    Admin,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Company => "company",
            PrincipalKind::User => "user",
            PrincipalKind::Admin => "admin",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrincipalKind {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(PrincipalKind::Company),
            "user" => Ok(PrincipalKind::User),
            "admin" => Ok(PrincipalKind::Admin),
            other => Err(LifecycleError::invalid_argument(format!(
                "unknown principal kind '{}'",
                other
            ))),
        }
    }
}

/// An authenticated principal. Produced once by the authentication layer and
/// passed explicitly into every lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Principal {
    Company(String),
    User(String),
    Admin(String),
}

impl Principal {
    pub fn new(kind: PrincipalKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            PrincipalKind::Company => Principal::Company(id),
            PrincipalKind::User => Principal::User(id),
            PrincipalKind::Admin => Principal::Admin(id),
        }
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Company(_) => PrincipalKind::Company,
            Principal::User(_) => PrincipalKind::User,
            Principal::Admin(_) => PrincipalKind::Admin,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Principal::Company(id) | Principal::User(id) | Principal::Admin(id) => id,
        }
    }

    /// Returns the company id, or `Forbidden` for any other kind.
    pub fn require_company(&self) -> Result<&str, LifecycleError> {
        match self {
            Principal::Company(id) => Ok(id),
            _ => Err(LifecycleError::Forbidden),
        }
    }

    /// Returns the candidate id, or `Forbidden` for any other kind.
    pub fn require_user(&self) -> Result<&str, LifecycleError> {
        match self {
            Principal::User(id) => Ok(id),
            _ => Err(LifecycleError::Forbidden),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}
