//! Image-registry descriptor types

use formwork_core::{Error, LogicalId, RemovalPolicy, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a container-image repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySpec {
    /// Externally visible repository name, unique per stack
    pub repository_name: String,
    /// Teardown policy, lifted out of the properties into the template
    #[serde(default, skip_serializing)]
    pub removal_policy: RemovalPolicy,
}

impl RegistrySpec {
    /// Check the locally verifiable configuration rules
    pub fn validate(&self, id: &LogicalId) -> Result<()> {
        let name = &self.repository_name;
        let mut chars = name.chars();
        let well_formed = match chars.next() {
            Some(first) => {
                first.is_ascii_lowercase()
                    && chars.all(|c| {
                        c.is_ascii_lowercase()
                            || c.is_ascii_digit()
                            || matches!(c, '-' | '_' | '.' | '/')
                    })
            }
            None => false,
        };
        if !well_formed {
            return Err(Error::invalid_configuration(
                id.as_str(),
                format!(
                    "repository name '{name}' must start with a lowercase letter and \
                     contain only lowercase letters, digits, '-', '_', '.' or '/'"
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_repository_names() {
        for name in ["storage-app", "team/storage-app", "app_2.backend"] {
            let spec = RegistrySpec {
                repository_name: name.to_string(),
                removal_policy: RemovalPolicy::Destroy,
            };
            assert!(spec.validate(&LogicalId::new_unchecked("StorageAppRepo")).is_ok());
        }
    }

    #[test]
    fn rejects_malformed_repository_names() {
        for name in ["", "Storage-App", "1app", "has space"] {
            let spec = RegistrySpec {
                repository_name: name.to_string(),
                removal_policy: RemovalPolicy::Destroy,
            };
            assert!(
                spec.validate(&LogicalId::new_unchecked("StorageAppRepo")).is_err(),
                "expected '{name}' to be rejected"
            );
        }
    }
}
