use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Error, Result};

/// Type-safe wrapper for resource logical ids
///
/// A logical id names one declared resource inside a stack and becomes the
/// resource's key in the synthesized template. Ids are stack-unique; the
/// provisioning engine maps them to physical identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogicalId(String);

impl LogicalId {
    /// Create a new logical id if it is well-formed
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let mut chars = id.chars();
        let valid = match chars.next() {
            Some(first) => {
                first.is_ascii_alphanumeric()
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            }
            None => false,
        };
        if valid {
            Ok(Self(id))
        } else {
            Err(Error::invalid_configuration(
                &id,
                "logical ids must be non-empty, start with an alphanumeric \
                 character, and contain only alphanumerics, '-' or '_'",
            ))
        }
    }

    /// Create a logical id without validation (for internal use)
    #[must_use]
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
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

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LogicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A post-provisioning attribute the engine can resolve on a resource
///
/// Each attribute is exposed by exactly one resource kind; the stack rejects
/// a deferred reference whose attribute does not belong to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Engine-assigned name of an object-store bucket
    Name,
    /// Hostname of a database instance endpoint
    EndpointAddress,
    /// DNS name of a service's load balancer
    LoadBalancerDnsName,
    /// Opaque identifier of a user pool
    PoolId,
}

impl Attribute {
    /// Get the attribute name as it appears in templates
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::EndpointAddress => "endpoint_address",
            Attribute::LoadBalancerDnsName => "load_balancer_dns_name",
            Attribute::PoolId => "pool_id",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placeholder for an attribute known only after provisioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredRef {
    /// Logical id of the resource the attribute belongs to
    pub resource: LogicalId,
    /// The attribute the engine resolves at deployment time
    pub attribute: Attribute,
}

impl fmt::Display for DeferredRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.attribute)
    }
}

/// A configuration value that is either known at authoring time or resolved
/// by the provisioning engine after deployment
///
/// Deferred values are never eagerly computed: they travel through the
/// template as tagged placeholders and only the engine substitutes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A plain string known when the plan is authored
    Literal(String),
    /// A reference resolved during actual provisioning
    Deferred { deferred: DeferredRef },
}

impl Value {
    /// Create a literal value
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Value::Literal(value.into())
    }

    /// Create a deferred reference to a resource attribute
    #[must_use]
    pub fn deferred(resource: LogicalId, attribute: Attribute) -> Self {
        Value::Deferred {
            deferred: DeferredRef {
                resource,
                attribute,
            },
        }
    }

    /// Check if this value is known at authoring time
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Value::Literal(_))
    }

    /// Check if this value defers to the provisioning engine
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Value::Deferred { .. })
    }

    /// Get the literal string if this value is one
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Value::Literal(value) => Some(value),
            Value::Deferred { .. } => None,
        }
    }

    /// Get the deferred reference if this value is one
    #[must_use]
    pub fn as_deferred(&self) -> Option<&DeferredRef> {
        match self {
            Value::Literal(_) => None,
            Value::Deferred { deferred } => Some(deferred),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(value) => f.write_str(value),
            Value::Deferred { deferred } => write!(f, "${{{deferred}}}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Literal(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Literal(value)
    }
}

/// Rule governing what happens to a resource when its stack is destroyed
///
/// Every resource in a stack defaults to teardown-with-stack; `Retain` is the
/// explicit override for resources that must outlive their stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Delete the resource when the stack is destroyed
    #[default]
    Destroy,
    /// Keep the resource after the stack is destroyed
    Retain,
}

impl RemovalPolicy {
    /// Get the policy name as it appears in templates
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RemovalPolicy::Destroy => "destroy",
            RemovalPolicy::Retain => "retain",
        }
    }
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_id_accepts_well_formed_names() {
        for id in ["StorageAppVPC", "db-1", "a", "task_role", "0widget"] {
            assert_eq!(LogicalId::new(id).unwrap().as_str(), id);
        }
    }

    #[test]
    fn logical_id_rejects_malformed_names() {
        for id in ["", "-leading-dash", "has space", "semi;colon", "_underscore"] {
            let err = LogicalId::new(id).unwrap_err();
            assert!(err.to_string().contains("invalid configuration"));
        }
    }

    #[test]
    fn literal_value_serializes_as_bare_string() {
        let value = Value::literal("latest");
        assert_eq!(serde_json::to_value(&value).unwrap(), serde_json::json!("latest"));
    }

    #[test]
    fn deferred_value_serializes_as_tagged_reference() {
        let value = Value::deferred(LogicalId::new("StorageAppDB").unwrap(), Attribute::EndpointAddress);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!({
                "deferred": {
                    "resource": "StorageAppDB",
                    "attribute": "endpoint_address",
                }
            })
        );
    }

    #[test]
    fn value_round_trips_through_json() {
        let literal: Value = serde_json::from_str("\"plain\"").unwrap();
        assert_eq!(literal, Value::literal("plain"));

        let deferred: Value = serde_json::from_str(
            r#"{"deferred": {"resource": "Bucket", "attribute": "name"}}"#,
        )
        .unwrap();
        assert!(deferred.is_deferred());
        assert_eq!(deferred.as_deferred().unwrap().attribute, Attribute::Name);
    }

    #[test]
    fn deferred_value_displays_as_placeholder() {
        let value = Value::deferred(LogicalId::new("Bucket").unwrap(), Attribute::Name);
        assert_eq!(value.to_string(), "${Bucket.name}");
    }

    #[test]
    fn removal_policy_defaults_to_destroy() {
        assert_eq!(RemovalPolicy::default(), RemovalPolicy::Destroy);
        assert_eq!(serde_json::to_value(RemovalPolicy::Destroy).unwrap(), serde_json::json!("destroy"));
    }
}
