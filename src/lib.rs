//! Issue Board
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - board: Fractional ordering of issues inside status columns
//! - filters / helpers: What the board shows
//! - store: Local board state with optimistic moves
//! - controller: Drag-end handling against an issue store
//! - repository: Data access abstractions and SQLite implementations
//! - client: GraphQL issue store

pub mod board;
pub mod client;
pub mod config;
pub mod controller;
pub mod domain;
pub mod filters;
pub mod helpers;
pub mod repository;
pub mod store;

pub use board::{BoardError, DraggableLocation, DropResult};
pub use config::BoardConfig;
pub use controller::{Board, DropError, LogNotifier, Notifier};
pub use domain::{DomainError, DomainResult, Issue, IssueStatus, IssueType, IssueUpdate, Project};
pub use filters::FilterConfig;
pub use store::{BoardState, PendingMove, Snapshot};

use repository::{init_db, IssueRepository};

/// Start file logging for the application described by `config`
pub fn init_logging(config: &BoardConfig) -> DomainResult<()> {
    rolling_logger::init_logger(config.log_dir.clone(), &config.app_name)
        .map_err(|e| DomainError::Internal(format!("Failed to init logger: {}", e)))
}

/// Board backed by the local SQLite database from `config`
pub async fn open_local_board(config: &BoardConfig, project_id: &str) -> DomainResult<Board<IssueRepository>> {
    let db = init_db(&config.db_path).await?;
    let mut board = Board::new(project_id, IssueRepository::new(db.connection()));
    board.load().await?;
    let _ = rolling_logger::info(&format!("Opened local board for project {}", project_id));
    Ok(board)
}

/// Board backed by the GraphQL API from `config`
pub async fn open_remote_board(config: &BoardConfig, project_id: &str) -> DomainResult<Board<client::GraphqlClient>> {
    let endpoint = config.graphql_endpoint();
    let mut board = Board::new(project_id, client::GraphqlClient::new(endpoint.clone()));
    if let Err(e) = board.load().await {
        let _ = rolling_logger::error(&format!("Loading board from {} failed: {}", endpoint, e));
        return Err(e);
    }
    Ok(board)
}
