//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, a GraphQL endpoint, in-memory, etc.

use std::sync::Arc;

use async_trait::async_trait;
use crate::domain::{DomainResult, Entity, Issue, IssueUpdate};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// What the board needs from wherever issues are kept
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Every issue of a project, in no particular order
    async fn list_issues(&self, project_id: &str) -> DomainResult<Vec<Issue>>;

    /// Persist a single move. Returns the issue as stored.
    async fn update_issue(&self, update: &IssueUpdate) -> DomainResult<Issue>;
}

#[async_trait]
impl<S: IssueStore + ?Sized> IssueStore for Arc<S> {
    async fn list_issues(&self, project_id: &str) -> DomainResult<Vec<Issue>> {
        (**self).list_issues(project_id).await
    }

    async fn update_issue(&self, update: &IssueUpdate) -> DomainResult<Issue> {
        (**self).update_issue(update).await
    }
}
