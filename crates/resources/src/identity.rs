//! Identity and permission descriptor types

use formwork_core::{Error, LogicalId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for service principals
///
/// A service principal names the platform service allowed to assume a role,
/// e.g. the container task runner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServicePrincipal(String);

impl ServicePrincipal {
    /// Create a new service principal
    #[must_use]
    pub fn new(principal: impl Into<String>) -> Self {
        Self(principal.into())
    }

    /// Get the principal as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to inner String
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ServicePrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ServicePrincipal {
    fn from(principal: &str) -> Self {
        Self(principal.to_string())
    }
}

/// Configuration for a workload execution identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    /// Platform service allowed to assume this role
    pub assumed_by: ServicePrincipal,
}

impl RoleSpec {
    /// Check the locally verifiable configuration rules
    pub fn validate(&self, id: &LogicalId) -> Result<()> {
        if self.assumed_by.as_str().is_empty() {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "trust principal must not be empty",
            ));
        }
        Ok(())
    }
}

/// A single permission a role can hold on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read objects or rows
    Read,
    /// Create, overwrite, and delete objects or rows
    Write,
    /// Open authenticated connections
    Connect,
}

impl Permission {
    /// The coarse read/write pair granted on storage
    pub const READ_WRITE: [Permission; 2] = [Permission::Read, Permission::Write];

    /// Get the permission name as it appears in templates
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Connect => "connect",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
