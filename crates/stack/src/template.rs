//! The synthesized deployment template
//!
//! The template is the single artifact handed to the external provisioning
//! engine. It is plain data: resources in declaration order, their
//! properties, their dependency lists, and the declared outputs. Deferred
//! values survive serialization as tagged placeholders for the engine to
//! resolve.

use formwork_core::{Error, LogicalId, RemovalPolicy, Result, Value};
use formwork_resources::ResourceKind;
use indexmap::IndexMap;
use serde::Serialize;

/// A synthesized deployment plan document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Format marker for the consuming engine
    pub format_version: String,
    /// Name of the stack the template was synthesized from
    pub stack: String,
    /// Resource entries in declaration order
    pub resources: IndexMap<String, TemplateResource>,
    /// Declared outputs in declaration order
    pub outputs: IndexMap<String, TemplateOutput>,
}

/// One resource entry in the template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResource {
    /// Resource kind
    pub kind: ResourceKind,
    /// Serialized descriptor properties
    pub properties: serde_json::Value,
    /// Upstream resources, deduplicated, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<LogicalId>,
    /// What happens to the resource on stack teardown
    pub deletion_policy: RemovalPolicy,
}

/// One output entry in the template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateOutput {
    /// Literal value or deferred reference the engine publishes
    pub value: Value,
}

impl Template {
    /// Render the template as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }

    /// Render the template as compact JSON
    pub fn to_json_compact(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::from)
    }

    /// Look up a resource entry by logical id
    #[must_use]
    pub fn resource(&self, id: &str) -> Option<&TemplateResource> {
        self.resources.get(id)
    }
}
