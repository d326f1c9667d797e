//! Additive permission grants attached to roles

use formwork_core::LogicalId;
use formwork_resources::Permission;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Ordered, deduplicated permissions one role holds, keyed by resource
///
/// Grants are additive and idempotent: granting the same permission twice
/// has the same net effect as granting it once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantSet {
    permissions: BTreeMap<LogicalId, BTreeSet<Permission>>,
}

impl GrantSet {
    /// Create an empty grant set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add permissions on a resource
    ///
    /// Returns `true` when this is the first grant against the resource.
    pub fn grant(&mut self, resource: &LogicalId, permissions: &[Permission]) -> bool {
        let set = self.permissions.entry(resource.clone()).or_default();
        let first = set.is_empty();
        set.extend(permissions.iter().copied());
        first
    }

    /// Permissions held on one resource
    #[must_use]
    pub fn permissions_on(&self, resource: &LogicalId) -> Option<&BTreeSet<Permission>> {
        self.permissions.get(resource)
    }

    /// Check whether any permission is held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.values().all(BTreeSet::is_empty)
    }

    /// Iterate granted resources and their permissions in id order
    pub fn iter(&self) -> impl Iterator<Item = (&LogicalId, &BTreeSet<Permission>)> {
        self.permissions.iter()
    }

    /// Flatten the grants into template policy statements
    #[must_use]
    pub fn to_policy(&self) -> Vec<PolicyStatement> {
        self.permissions
            .iter()
            .filter(|(_, permissions)| !permissions.is_empty())
            .map(|(resource, permissions)| PolicyStatement {
                resource: resource.clone(),
                permissions: permissions.iter().copied().collect(),
            })
            .collect()
    }
}

/// One access-policy line in a role's template properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatement {
    /// Resource the permissions apply to
    pub resource: LogicalId,
    /// Sorted, deduplicated permissions
    pub permissions: Vec<Permission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket_id() -> LogicalId {
        LogicalId::new_unchecked("StorageFilesBucket")
    }

    fn database_id() -> LogicalId {
        LogicalId::new_unchecked("StorageAppDB")
    }

    #[test]
    fn granting_twice_equals_granting_once() {
        let mut once = GrantSet::new();
        once.grant(&bucket_id(), &Permission::READ_WRITE);

        let mut twice = GrantSet::new();
        twice.grant(&bucket_id(), &Permission::READ_WRITE);
        twice.grant(&bucket_id(), &Permission::READ_WRITE);

        assert_eq!(once, twice);
        assert_eq!(once.to_policy(), twice.to_policy());
    }

    #[test]
    fn grants_accumulate_across_calls() {
        let mut grants = GrantSet::new();
        grants.grant(&bucket_id(), &[Permission::Read]);
        grants.grant(&bucket_id(), &[Permission::Write]);
        let held: Vec<Permission> = grants
            .permissions_on(&bucket_id())
            .unwrap()
            .iter()
            .copied()
            .collect();
        assert_eq!(held, vec![Permission::Read, Permission::Write]);
    }

    #[test]
    fn first_grant_per_resource_is_reported() {
        let mut grants = GrantSet::new();
        assert!(grants.grant(&bucket_id(), &[Permission::Read]));
        assert!(!grants.grant(&bucket_id(), &[Permission::Write]));
        assert!(grants.grant(&database_id(), &[Permission::Connect]));
    }

    #[test]
    fn policy_statements_sort_by_resource_id() {
        let mut grants = GrantSet::new();
        grants.grant(&database_id(), &[Permission::Connect]);
        grants.grant(&bucket_id(), &Permission::READ_WRITE);
        let policy = grants.to_policy();
        assert_eq!(policy[0].resource, database_id());
        assert_eq!(policy[1].resource, bucket_id());
    }
}
