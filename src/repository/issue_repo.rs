//! Issue Repository
//!
//! SQLite-backed issue storage. Doubles as an `IssueStore` so a board can
//! run against a local database.

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::board::FIRST_POSITION;
use crate::domain::{DomainError, DomainResult, Issue, IssueStatus, IssueType, IssueUpdate};
use super::project_repo::row_to_project;
use super::traits::{IssueStore, Repository};

const ISSUE_COLUMNS: &str = "id, key, name, status, issue_type, project_id, board_position, sprint_position, \
     assignee_id, parent_id, sprint_id, created_at, updated_at";

/// SQLite implementation of Issue repository
pub struct IssueRepository {
    conn: Arc<Mutex<Connection>>,
}

impl IssueRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// All issues of a project
    pub async fn list_by_project(&self, project_id: &str) -> DomainResult<Vec<Issue>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM issues WHERE project_id = ?1 ORDER BY rowid",
            ISSUE_COLUMNS
        ))?;
        let issues = stmt
            .query_map(params![project_id], row_to_issue)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(issues)
    }

    /// One column of a project, top to bottom (ties by insertion order)
    pub async fn list_by_status(&self, project_id: &str, status: IssueStatus) -> DomainResult<Vec<Issue>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM issues WHERE project_id = ?1 AND status = ?2 ORDER BY board_position ASC, rowid ASC",
            ISSUE_COLUMNS
        ))?;
        let issues = stmt
            .query_map(params![project_id, status.as_str()], row_to_issue)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(issues)
    }

    /// Position just below the last issue of a column
    pub async fn next_board_position(&self, project_id: &str, status: IssueStatus) -> DomainResult<f64> {
        let conn = self.conn.lock().await;
        Ok(next_position(&conn, project_id, status)?)
    }

    /// Create an issue at the bottom of its column
    pub async fn create_in_column(&self, issue: &Issue) -> DomainResult<Issue> {
        let conn = self.conn.lock().await;
        let mut issue = issue.clone();
        issue.board_position = next_position(&conn, &issue.project_id, issue.status)?;
        insert_issue(&conn, issue)
    }
}

fn next_position(conn: &Connection, project_id: &str, status: IssueStatus) -> rusqlite::Result<f64> {
    let max: Option<f64> = conn.query_row(
        "SELECT MAX(board_position) FROM issues WHERE project_id = ?1 AND status = ?2",
        params![project_id, status.as_str()],
        |row| row.get(0),
    )?;
    Ok(max.map_or(FIRST_POSITION, |max| max + 1.0))
}

/// Highest `N` among the project's `KEY-N` issue keys, 0 if there are none
fn last_key_number(conn: &Connection, project_id: &str, project_key: &str) -> rusqlite::Result<i64> {
    let last: Option<i64> = conn.query_row(
        "SELECT MAX(CAST(SUBSTR(key, LENGTH(?2) + 2) AS INTEGER)) FROM issues \
         WHERE project_id = ?1 AND SUBSTR(key, 1, LENGTH(?2) + 1) = ?2 || '-'",
        params![project_id, project_key],
        |row| row.get(0),
    )?;
    Ok(last.unwrap_or(0))
}

/// Insert with a generated id and key where missing
fn insert_issue(conn: &Connection, mut issue: Issue) -> DomainResult<Issue> {
    if issue.name.trim().is_empty() {
        return Err(DomainError::InvalidInput("Issue name must not be empty".to_string()));
    }
    if issue.id.is_empty() {
        issue.id = uuid::Uuid::new_v4().to_string();
    }
    if issue.key.is_empty() {
        let project = conn
            .query_row(
                "SELECT id, name, key, created_at FROM projects WHERE id = ?1",
                params![issue.project_id],
                row_to_project,
            )
            .optional()?
            .ok_or_else(|| DomainError::NotFound(format!("Project {} not found", issue.project_id)))?;
        issue.key = project.issue_key(last_key_number(conn, &project.id, &project.key)? + 1);
    }

    let now = chrono::Utc::now().timestamp_millis();
    issue.created_at = Some(now);
    issue.updated_at = Some(now);

    let inserted = conn.execute(
        &format!(
            "INSERT OR IGNORE INTO issues ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            ISSUE_COLUMNS
        ),
        params![
            issue.id,
            issue.key,
            issue.name,
            issue.status.as_str(),
            issue.issue_type.as_str(),
            issue.project_id,
            issue.board_position,
            issue.sprint_position,
            issue.assignee_id,
            issue.parent_id,
            issue.sprint_id,
            issue.created_at,
            issue.updated_at,
        ],
    )?;
    if inserted == 0 {
        return Err(DomainError::Conflict(format!("Issue {} already exists", issue.id)));
    }

    Ok(issue)
}

fn find_issue(conn: &Connection, id: &str) -> DomainResult<Option<Issue>> {
    let issue = conn
        .query_row(
            &format!("SELECT {} FROM issues WHERE id = ?1", ISSUE_COLUMNS),
            params![id],
            row_to_issue,
        )
        .optional()?;
    Ok(issue)
}

#[async_trait]
impl Repository<Issue> for IssueRepository {
    async fn create(&self, entity: &Issue) -> DomainResult<Issue> {
        let conn = self.conn.lock().await;
        insert_issue(&conn, entity.clone())
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<Issue>> {
        let conn = self.conn.lock().await;
        find_issue(&conn, &id)
    }

    async fn list(&self) -> DomainResult<Vec<Issue>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM issues ORDER BY project_id, rowid", ISSUE_COLUMNS))?;
        let issues = stmt.query_map([], row_to_issue)?.collect::<Result<Vec<_>, _>>()?;
        Ok(issues)
    }

    async fn update(&self, entity: &Issue) -> DomainResult<Issue> {
        let conn = self.conn.lock().await;
        let now = chrono::Utc::now().timestamp_millis();

        let changed = conn.execute(
            "UPDATE issues SET key = ?1, name = ?2, status = ?3, issue_type = ?4, board_position = ?5, \
             sprint_position = ?6, assignee_id = ?7, parent_id = ?8, sprint_id = ?9, updated_at = ?10 WHERE id = ?11",
            params![
                entity.key,
                entity.name,
                entity.status.as_str(),
                entity.issue_type.as_str(),
                entity.board_position,
                entity.sprint_position,
                entity.assignee_id,
                entity.parent_id,
                entity.sprint_id,
                now,
                entity.id,
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Issue {} not found", entity.id)));
        }

        let mut updated = entity.clone();
        updated.updated_at = Some(now);
        Ok(updated)
    }

    async fn delete(&self, id: String) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM issues WHERE id = ?1", params![id])?;
        Ok(())
    }
}

#[async_trait]
impl IssueStore for IssueRepository {
    async fn list_issues(&self, project_id: &str) -> DomainResult<Vec<Issue>> {
        self.list_by_project(project_id).await
    }

    /// Writes status and position of one issue; nothing else is touched
    async fn update_issue(&self, update: &IssueUpdate) -> DomainResult<Issue> {
        if !update.board_position.is_finite() {
            return Err(DomainError::InvalidInput(format!(
                "Board position must be finite, got {}",
                update.board_position
            )));
        }

        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE issues SET status = ?1, board_position = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                update.status.as_str(),
                update.board_position,
                chrono::Utc::now().timestamp_millis(),
                update.id,
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Issue {} not found", update.id)));
        }

        find_issue(&conn, &update.id)?
            .ok_or_else(|| DomainError::NotFound(format!("Issue {} not found", update.id)))
    }
}

/// Convert a database row to Issue
fn row_to_issue(row: &Row<'_>) -> rusqlite::Result<Issue> {
    let status: String = row.get(3)?;
    let status = IssueStatus::from_str(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            Box::new(DomainError::InvalidInput(format!("Unknown issue status {}", status))),
        )
    })?;

    let issue_type: String = row.get(4)?;
    let issue_type = IssueType::from_str(&issue_type).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            Box::new(DomainError::InvalidInput(format!("Unknown issue type {}", issue_type))),
        )
    })?;

    Ok(Issue {
        id: row.get(0)?,
        key: row.get(1)?,
        name: row.get(2)?,
        status,
        issue_type,
        project_id: row.get(5)?,
        board_position: row.get(6)?,
        sprint_position: row.get(7)?,
        assignee_id: row.get(8)?,
        parent_id: row.get(9)?,
        sprint_id: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}
