//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod entity;
mod issue;
mod project;

pub use entity::{Entity, DomainError, DomainResult};
pub use issue::{Issue, IssueStatus, IssueType, IssueUpdate};
pub use project::Project;
