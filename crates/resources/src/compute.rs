//! Compute descriptor types

use crate::handle::{ClusterRef, NetworkRef, RegistryRef, RoleRef};
use formwork_core::{Error, LogicalId, Result, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration for a container-orchestration cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Network the cluster's workloads run in
    pub network: NetworkRef,
}

impl ClusterSpec {
    /// Check the locally verifiable configuration rules
    pub fn validate(&self, _id: &LogicalId) -> Result<()> {
        Ok(())
    }
}

/// Where a service pulls its container image from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// An image pushed to a declared registry under a tag
    Registry { repository: RegistryRef, tag: String },
}

/// Configuration for a load-balanced container service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Cluster that hosts the service tasks
    pub cluster: ClusterRef,
    /// Container image to run
    pub image: ImageSource,
    /// Port the container listens on; the load balancer forwards to it
    pub container_port: u16,
    /// Identity the running tasks assume
    pub task_role: RoleRef,
    /// Environment injected into the container, in declaration order
    pub environment: IndexMap<String, Value>,
    /// Expose the load balancer to the public internet
    pub public_load_balancer: bool,
    /// Number of task replicas to keep running
    pub desired_count: u32,
}

impl ServiceSpec {
    /// Check the locally verifiable configuration rules
    pub fn validate(&self, id: &LogicalId) -> Result<()> {
        if self.container_port == 0 {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "container port must not be 0",
            ));
        }
        if self.desired_count == 0 {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "desired count must be at least 1",
            ));
        }
        let ImageSource::Registry { tag, .. } = &self.image;
        if tag.is_empty() {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "image tag must not be empty",
            ));
        }
        if self.environment.keys().any(String::is_empty) {
            return Err(Error::invalid_configuration(
                id.as_str(),
                "environment variable names must not be empty",
            ));
        }
        Ok(())
    }
}
