//! The closed set of resource kinds a plan can declare

use crate::identity::Permission;
use formwork_core::Attribute;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a declared resource
///
/// The kind decides which descriptor struct configures the resource and which
/// post-provisioning attributes it exposes to deferred references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Isolated virtual network
    Network,
    /// Versioned object-storage bucket
    Bucket,
    /// Managed relational database instance
    Database,
    /// Container-image repository
    Registry,
    /// Container-orchestration cluster
    Cluster,
    /// Execution identity for workloads
    Role,
    /// Load-balanced container service
    Service,
    /// User directory for sign-in
    UserPool,
    /// Application client of a user pool
    UserPoolClient,
}

impl ResourceKind {
    /// Get the kind name as it appears in templates
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Network => "network",
            ResourceKind::Bucket => "bucket",
            ResourceKind::Database => "database",
            ResourceKind::Registry => "registry",
            ResourceKind::Cluster => "cluster",
            ResourceKind::Role => "role",
            ResourceKind::Service => "service",
            ResourceKind::UserPool => "user_pool",
            ResourceKind::UserPoolClient => "user_pool_client",
        }
    }

    /// Post-provisioning attributes resources of this kind expose
    #[must_use]
    pub fn attributes(self) -> &'static [Attribute] {
        match self {
            ResourceKind::Bucket => &[Attribute::Name],
            ResourceKind::Database => &[Attribute::EndpointAddress],
            ResourceKind::Service => &[Attribute::LoadBalancerDnsName],
            ResourceKind::UserPool => &[Attribute::PoolId],
            ResourceKind::Network
            | ResourceKind::Registry
            | ResourceKind::Cluster
            | ResourceKind::Role
            | ResourceKind::UserPoolClient => &[],
        }
    }

    /// Check whether this kind exposes the given attribute
    #[must_use]
    pub fn exposes(self, attribute: Attribute) -> bool {
        self.attributes().contains(&attribute)
    }

    /// Permissions a role can hold on resources of this kind
    #[must_use]
    pub fn grantable(self) -> &'static [Permission] {
        match self {
            ResourceKind::Bucket => &Permission::READ_WRITE,
            ResourceKind::Database => &[Permission::Connect],
            _ => &[],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
