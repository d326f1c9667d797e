//! User-directory descriptor types

use crate::handle::UserPoolRef;
use formwork_core::{Error, LogicalId, RemovalPolicy, Result};
use serde::{Deserialize, Serialize};

/// Which identifiers users can sign in with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInAliases {
    /// Sign in with an email address
    pub email: bool,
    /// Sign in with a chosen username
    pub username: bool,
    /// Sign in with a phone number
    pub phone: bool,
}

impl SignInAliases {
    /// Check whether at least one alias is enabled
    #[must_use]
    pub fn any(self) -> bool {
        self.email || self.username || self.phone
    }
}

/// Constraints on one standard user attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeConstraint {
    /// Users must supply the attribute at sign-up
    pub required: bool,
    /// Users may change the attribute after sign-up
    pub mutable: bool,
}

/// Schema of the standard attributes collected at sign-up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardAttributes {
    /// Email address constraints, if the attribute is collected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<AttributeConstraint>,
}

/// Configuration for a user directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPoolSpec {
    /// Externally visible pool name, unique per stack
    pub pool_name: String,
    /// Let users create their own accounts
    pub self_sign_up: bool,
    /// Identifiers accepted at sign-in
    pub sign_in_aliases: SignInAliases,
    /// Standard attribute schema
    pub standard_attributes: StandardAttributes,
    /// Teardown policy, lifted out of the properties into the template
    #[serde(default, skip_serializing)]
    pub removal_policy: RemovalPolicy,
}

impl UserPoolSpec {
    /// Check the locally verifiable configuration rules
    pub fn validate(&self, id: &LogicalId) -> Result<()> {
        if self.pool_name.is_empty() {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "pool name must not be empty",
            ));
        }
        if !self.sign_in_aliases.any() {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "at least one sign-in alias must be enabled",
            ));
        }
        Ok(())
    }
}

/// Configuration for an application client of a user pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPoolClientSpec {
    /// Pool this client authenticates against
    pub user_pool: UserPoolRef,
    /// Issue a client secret (disabled for public clients)
    pub generate_secret: bool,
}

impl UserPoolClientSpec {
    /// Check the locally verifiable configuration rules
    pub fn validate(&self, _id: &LogicalId) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_pool() -> UserPoolSpec {
        UserPoolSpec {
            pool_name: "StorageAppUsers".to_string(),
            self_sign_up: true,
            sign_in_aliases: SignInAliases {
                email: true,
                ..SignInAliases::default()
            },
            standard_attributes: StandardAttributes {
                email: Some(AttributeConstraint {
                    required: true,
                    mutable: false,
                }),
            },
            removal_policy: RemovalPolicy::Destroy,
        }
    }

    #[test]
    fn requires_at_least_one_sign_in_alias() {
        let spec = UserPoolSpec {
            sign_in_aliases: SignInAliases::default(),
            ..user_pool()
        };
        let err = spec
            .validate(&LogicalId::new_unchecked("StorageAppUserPool"))
            .unwrap_err();
        assert!(err.to_string().contains("sign-in alias"));
    }

    #[test]
    fn uncollected_attributes_stay_out_of_the_properties() {
        let spec = UserPoolSpec {
            standard_attributes: StandardAttributes::default(),
            ..user_pool()
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["standardAttributes"], serde_json::json!({}));
    }
}
