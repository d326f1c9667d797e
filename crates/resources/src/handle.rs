//! Typed references to declared resources
//!
//! Handles are minted by the stack builder when a resource is declared and
//! passed back into later descriptors. Because every handle carries its kind
//! in the type, wiring a bucket where a network belongs is a compile error
//! rather than a validation failure. Handles for resources that expose
//! post-provisioning attributes also mint the deferred values for them.

use formwork_core::{Attribute, LogicalId, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed reference to a declared network
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkRef(LogicalId);

impl NetworkRef {
    /// Create a handle for a declared network
    #[must_use]
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    /// Get the logical id this handle points at
    #[must_use]
    pub fn logical_id(&self) -> &LogicalId {
        &self.0
    }
}

impl fmt::Display for NetworkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed reference to a declared bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketRef(LogicalId);

impl BucketRef {
    /// Create a handle for a declared bucket
    #[must_use]
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    /// Get the logical id this handle points at
    #[must_use]
    pub fn logical_id(&self) -> &LogicalId {
        &self.0
    }

    /// Deferred reference to the bucket's engine-assigned name
    #[must_use]
    pub fn name(&self) -> Value {
        Value::deferred(self.0.clone(), Attribute::Name)
    }
}

impl fmt::Display for BucketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed reference to a declared database instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseRef(LogicalId);

impl DatabaseRef {
    /// Create a handle for a declared database
    #[must_use]
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    /// Get the logical id this handle points at
    #[must_use]
    pub fn logical_id(&self) -> &LogicalId {
        &self.0
    }

    /// Deferred reference to the instance endpoint hostname
    #[must_use]
    pub fn endpoint_address(&self) -> Value {
        Value::deferred(self.0.clone(), Attribute::EndpointAddress)
    }
}

impl fmt::Display for DatabaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed reference to a declared image registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryRef(LogicalId);

impl RegistryRef {
    /// Create a handle for a declared registry
    #[must_use]
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    /// Get the logical id this handle points at
    #[must_use]
    pub fn logical_id(&self) -> &LogicalId {
        &self.0
    }
}

impl fmt::Display for RegistryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed reference to a declared compute cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterRef(LogicalId);

impl ClusterRef {
    /// Create a handle for a declared cluster
    #[must_use]
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    /// Get the logical id this handle points at
    #[must_use]
    pub fn logical_id(&self) -> &LogicalId {
        &self.0
    }
}

impl fmt::Display for ClusterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed reference to a declared role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleRef(LogicalId);

impl RoleRef {
    /// Create a handle for a declared role
    #[must_use]
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    /// Get the logical id this handle points at
    #[must_use]
    pub fn logical_id(&self) -> &LogicalId {
        &self.0
    }
}

impl fmt::Display for RoleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed reference to a declared service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRef(LogicalId);

impl ServiceRef {
    /// Create a handle for a declared service
    #[must_use]
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    /// Get the logical id this handle points at
    #[must_use]
    pub fn logical_id(&self) -> &LogicalId {
        &self.0
    }

    /// Deferred reference to the load balancer's DNS name
    #[must_use]
    pub fn load_balancer_dns_name(&self) -> Value {
        Value::deferred(self.0.clone(), Attribute::LoadBalancerDnsName)
    }
}

impl fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed reference to a declared user pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPoolRef(LogicalId);

impl UserPoolRef {
    /// Create a handle for a declared user pool
    #[must_use]
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    /// Get the logical id this handle points at
    #[must_use]
    pub fn logical_id(&self) -> &LogicalId {
        &self.0
    }

    /// Deferred reference to the pool's identifier
    #[must_use]
    pub fn pool_id(&self) -> Value {
        Value::deferred(self.0.clone(), Attribute::PoolId)
    }
}

impl fmt::Display for UserPoolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed reference to a declared user pool client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPoolClientRef(LogicalId);

impl UserPoolClientRef {
    /// Create a handle for a declared user pool client
    #[must_use]
    pub fn new(id: LogicalId) -> Self {
        Self(id)
    }

    /// Get the logical id this handle points at
    #[must_use]
    pub fn logical_id(&self) -> &LogicalId {
        &self.0
    }
}

impl fmt::Display for UserPoolClientRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_serialize_as_bare_logical_ids() {
        let handle = BucketRef::new(LogicalId::new_unchecked("StorageFilesBucket"));
        assert_eq!(
            serde_json::to_value(&handle).unwrap(),
            serde_json::json!("StorageFilesBucket")
        );
    }

    #[test]
    fn attribute_accessors_mint_deferred_values() {
        let db = DatabaseRef::new(LogicalId::new_unchecked("StorageAppDB"));
        let value = db.endpoint_address();
        assert!(value.is_deferred());
        assert_eq!(value.to_string(), "${StorageAppDB.endpoint_address}");

        let pool = UserPoolRef::new(LogicalId::new_unchecked("StorageAppUserPool"));
        assert_eq!(
            pool.pool_id().as_deferred().unwrap().attribute,
            Attribute::PoolId
        );
    }
}
