//! Database descriptor types

use crate::handle::NetworkRef;
use formwork_core::{Error, LogicalId, RemovalPolicy, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported Postgres engine versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostgresVersion {
    #[serde(rename = "15.4")]
    V15_4,
    #[serde(rename = "15.5")]
    V15_5,
    #[serde(rename = "16.1")]
    V16_1,
}

impl PostgresVersion {
    /// Get the version as the engine expects it
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PostgresVersion::V15_4 => "15.4",
            PostgresVersion::V15_5 => "15.5",
            PostgresVersion::V16_1 => "16.1",
        }
    }
}

impl fmt::Display for PostgresVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database engine selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// Managed Postgres at a pinned minor version
    Postgres { version: PostgresVersion },
}

/// Instance family of a database host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceClass {
    #[serde(rename = "t3")]
    BurstableT3,
    #[serde(rename = "t4g")]
    BurstableT4g,
    #[serde(rename = "m5")]
    StandardM5,
}

impl InstanceClass {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceClass::BurstableT3 => "t3",
            InstanceClass::BurstableT4g => "t4g",
            InstanceClass::StandardM5 => "m5",
        }
    }
}

/// Instance size within a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceSize {
    Micro,
    Small,
    Medium,
    Large,
}

impl InstanceSize {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceSize::Micro => "micro",
            InstanceSize::Small => "small",
            InstanceSize::Medium => "medium",
            InstanceSize::Large => "large",
        }
    }
}

/// Instance type of a database host, e.g. `t3.micro`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceType {
    pub class: InstanceClass,
    pub size: InstanceSize,
}

impl InstanceType {
    /// Combine a family and a size into an instance type
    #[must_use]
    pub fn of(class: InstanceClass, size: InstanceSize) -> Self {
        Self { class, size }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class.as_str(), self.size.as_str())
    }
}

/// How the database obtains its admin credentials
///
/// The template only ever carries the generation instruction; no password
/// material exists at authoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Credentials {
    /// Engine generates a password and stores it in a managed secret
    GeneratedSecret { username: String },
}

/// Configuration for a managed relational database instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSpec {
    /// Engine and pinned version
    pub engine: Engine,
    /// Host instance type
    pub instance: InstanceType,
    /// Allocated storage in GiB
    pub allocated_storage_gib: u32,
    /// Network the instance lives in
    pub network: NetworkRef,
    /// Admin credential strategy
    pub credentials: Credentials,
    /// Replicate synchronously into a second availability zone
    pub multi_zone: bool,
    /// Expose the endpoint outside the network
    pub publicly_accessible: bool,
    /// Refuse instance deletion while enabled
    pub deletion_protection: bool,
    /// Teardown policy, lifted out of the properties into the template
    #[serde(default, skip_serializing)]
    pub removal_policy: RemovalPolicy,
}

impl DatabaseSpec {
    /// Check the locally verifiable configuration rules
    pub fn validate(&self, id: &LogicalId) -> Result<()> {
        if self.allocated_storage_gib == 0 {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "allocated storage must be at least 1 GiB",
            ));
        }
        let Credentials::GeneratedSecret { username } = &self.credentials;
        if username.is_empty() {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "credentials username must not be empty",
            ));
        }
        if self.deletion_protection && self.removal_policy == RemovalPolicy::Destroy {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "deletionProtection contradicts removal policy 'destroy'",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database() -> DatabaseSpec {
        DatabaseSpec {
            engine: Engine::Postgres {
                version: PostgresVersion::V15_5,
            },
            instance: InstanceType::of(InstanceClass::BurstableT3, InstanceSize::Micro),
            allocated_storage_gib: 20,
            network: NetworkRef::new(LogicalId::new_unchecked("StorageAppVPC")),
            credentials: Credentials::GeneratedSecret {
                username: "postgres".to_string(),
            },
            multi_zone: false,
            publicly_accessible: false,
            deletion_protection: false,
            removal_policy: RemovalPolicy::Destroy,
        }
    }

    #[test]
    fn instance_type_displays_as_class_dot_size() {
        let instance = InstanceType::of(InstanceClass::BurstableT3, InstanceSize::Micro);
        assert_eq!(instance.to_string(), "t3.micro");
    }

    #[test]
    fn rejects_zero_storage() {
        let spec = DatabaseSpec {
            allocated_storage_gib: 0,
            ..database()
        };
        let err = spec
            .validate(&LogicalId::new_unchecked("StorageAppDB"))
            .unwrap_err();
        assert!(err.to_string().contains("allocated storage"));
    }

    #[test]
    fn rejects_deletion_protection_on_destroyed_instances() {
        let spec = DatabaseSpec {
            deletion_protection: true,
            ..database()
        };
        let err = spec
            .validate(&LogicalId::new_unchecked("StorageAppDB"))
            .unwrap_err();
        assert!(err.to_string().contains("deletionProtection"));
    }

    #[test]
    fn properties_carry_the_generation_instruction_not_a_password() {
        let json = serde_json::to_value(database()).unwrap();
        assert_eq!(
            json["credentials"],
            serde_json::json!({ "generated_secret": { "username": "postgres" } })
        );
        assert_eq!(json["engine"], serde_json::json!({ "postgres": { "version": "15.5" } }));
        assert!(json.get("removalPolicy").is_none());
    }
}
