//! Object-store descriptor types

use formwork_core::{Error, LogicalId, RemovalPolicy, Result};
use serde::{Deserialize, Serialize};

/// Public-access stance of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicAccess {
    /// Reject every form of public access
    BlockAll,
    /// Leave public access decisions to individual objects
    AllowAll,
}

/// Configuration for a versioned object-storage bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSpec {
    /// Keep prior object versions on overwrite and delete
    pub versioned: bool,
    /// Public-access stance applied to the whole bucket
    pub public_access: PublicAccess,
    /// Empty the bucket before deleting it on stack teardown
    pub auto_delete_objects: bool,
    /// Teardown policy, lifted out of the properties into the template
    #[serde(default, skip_serializing)]
    pub removal_policy: RemovalPolicy,
}

impl BucketSpec {
    /// Check the locally verifiable configuration rules
    pub fn validate(&self, id: &LogicalId) -> Result<()> {
        if self.auto_delete_objects && self.removal_policy != RemovalPolicy::Destroy {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "autoDeleteObjects requires removal policy 'destroy'",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket() -> BucketSpec {
        BucketSpec {
            versioned: true,
            public_access: PublicAccess::BlockAll,
            auto_delete_objects: true,
            removal_policy: RemovalPolicy::Destroy,
        }
    }

    #[test]
    fn auto_delete_requires_destroy_policy() {
        let spec = BucketSpec {
            removal_policy: RemovalPolicy::Retain,
            ..bucket()
        };
        let err = spec
            .validate(&LogicalId::new_unchecked("StorageFilesBucket"))
            .unwrap_err();
        assert!(err.to_string().contains("autoDeleteObjects"));
    }

    #[test]
    fn properties_omit_the_removal_policy() {
        let json = serde_json::to_value(bucket()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "versioned": true,
                "publicAccess": "block-all",
                "autoDeleteObjects": true,
            })
        );
    }
}
