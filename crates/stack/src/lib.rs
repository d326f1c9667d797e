//! Resource graph builder and template synthesis for `formwork`.
//!
//! A [`Stack`] accumulates typed resource declarations into a dependency
//! graph, applies permission grants, registers outputs, and finally emits a
//! deployment template for the external provisioning engine. Construction is
//! all-or-nothing: any dangling reference, naming collision, or invalid
//! configuration fails the declaring call and no template is produced.
//!
//! ## Key Components
//!
//! - **`builder`**: The [`Stack`] itself and its `add_*` / `grant_*` /
//!   `add_output` operations.
//! - **`graph`**: The petgraph-backed resource graph and the typed
//!   cross-resource references stored on its edges.
//! - **`grants`**: Additive, idempotent permission sets per role.
//! - **`template`**: The synthesized document handed to the engine.

pub mod builder;
pub mod grants;
pub mod graph;
pub mod template;

pub use self::{
    builder::Stack,
    grants::{GrantSet, PolicyStatement},
    graph::{DependencyKind, Reference, ResourceGraph, ResourceNode, ResourceRecord},
    template::{Template, TemplateOutput, TemplateResource},
};
