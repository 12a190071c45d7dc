//! Project Repository

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Project};
use super::traits::Repository;

/// SQLite implementation of Project repository
pub struct ProjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProjectRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Project> for ProjectRepository {
    async fn create(&self, entity: &Project) -> DomainResult<Project> {
        entity.validate()?;

        let mut project = entity.clone();
        if project.id.is_empty() {
            project.id = uuid::Uuid::new_v4().to_string();
        }
        project.created_at = Some(chrono::Utc::now().timestamp_millis());

        let conn = self.conn.lock().await;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO projects (id, name, key, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![project.id, project.name, project.key, project.created_at],
        )?;
        if inserted == 0 {
            return Err(DomainError::Conflict(format!("Project {} already exists", project.id)));
        }
        Ok(project)
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<Project>> {
        let conn = self.conn.lock().await;
        let project = conn
            .query_row(
                "SELECT id, name, key, created_at FROM projects WHERE id = ?1",
                params![id],
                row_to_project,
            )
            .optional()?;
        Ok(project)
    }

    async fn list(&self) -> DomainResult<Vec<Project>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, name, key, created_at FROM projects ORDER BY created_at, rowid")?;
        let projects = stmt.query_map([], row_to_project)?.collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    async fn update(&self, entity: &Project) -> DomainResult<Project> {
        entity.validate()?;

        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE projects SET name = ?1, key = ?2 WHERE id = ?3",
            params![entity.name, entity.key, entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Project {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: String) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        // Manual cascade: a project's issues go with it
        conn.execute("DELETE FROM issues WHERE project_id = ?1", params![id])?;
        conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(())
    }
}

/// Convert a database row to Project
pub(super) fn row_to_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        key: row.get(2)?,
        created_at: row.get(3)?,
    })
}
