//! Network descriptor types

use formwork_core::{Error, LogicalId, Result};
use serde::{Deserialize, Serialize};

/// Configuration for an isolated virtual network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    /// Upper bound on availability zones the network spans
    pub max_zones: u8,
}

impl NetworkSpec {
    /// Check the locally verifiable configuration rules
    pub fn validate(&self, id: &LogicalId) -> Result<()> {
        if self.max_zones < 2 {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "a network must span at least 2 availability zones",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_zone_networks() {
        let spec = NetworkSpec { max_zones: 1 };
        let err = spec
            .validate(&LogicalId::new_unchecked("StorageAppVPC"))
            .unwrap_err();
        assert!(err.to_string().contains("at least 2 availability zones"));
    }

    #[test]
    fn accepts_two_zones() {
        let spec = NetworkSpec { max_zones: 2 };
        assert!(spec.validate(&LogicalId::new_unchecked("StorageAppVPC")).is_ok());
    }
}
