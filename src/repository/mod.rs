//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod issue_repo;
mod project_repo;


pub use traits::{IssueStore, Repository};
pub use db::{init_db, DbState, IN_MEMORY};
pub use issue_repo::IssueRepository;
pub use project_repo::ProjectRepository;
