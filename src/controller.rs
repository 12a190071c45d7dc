//! Board Controller
//!
//! Runs a drag end from start to finish: compute the new position, show
//! it immediately, persist it, and undo it if the issue store says no.

use crate::board::{calculate_issue_board_position, BoardError, DropResult};
use crate::domain::{DomainError, DomainResult, Issue, IssueStatus, IssueUpdate};
use crate::filters::{filter_issues, FilterConfig};
use crate::repository::IssueStore;
use crate::store::BoardState;

/// Where user-facing failure messages go (a toast, in a UI)
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Why a drop did not stick
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DropError {
    /// The drop itself was malformed; nothing was applied or sent
    #[error("invalid drop: {0}")]
    Contract(#[from] BoardError),
    /// The issue store rejected the update; the board was rolled back
    #[error("move not saved: {0}")]
    Persistence(#[source] DomainError),
}

/// One project's board
pub struct Board<S, N = LogNotifier> {
    project_id: String,
    state: BoardState,
    store: S,
    notifier: N,
}

impl<S: IssueStore> Board<S, LogNotifier> {
    pub fn new(project_id: impl Into<String>, store: S) -> Self {
        Self::with_notifier(project_id, store, LogNotifier)
    }
}

impl<S: IssueStore, N: Notifier> Board<S, N> {
    pub fn with_notifier(project_id: impl Into<String>, store: S, notifier: N) -> Self {
        Self {
            project_id: project_id.into(),
            state: BoardState::default(),
            store,
            notifier,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn issues(&self) -> &[Issue] {
        self.state.issues()
    }

    /// Fetch the project's issues, replacing whatever the board showed
    pub async fn load(&mut self) -> DomainResult<()> {
        let issues = self.store.list_issues(&self.project_id).await?;
        log::info!("Loaded {} issues for project {}", issues.len(), self.project_id);
        self.state.replace_all(issues);
        Ok(())
    }

    /// Columns in board order, each filtered and sorted
    pub fn columns(&self, filter: &FilterConfig) -> Vec<(IssueStatus, Vec<&Issue>)> {
        IssueStatus::ALL
            .iter()
            .map(|status| (*status, self.state.column(*status, filter)))
            .collect()
    }

    /// Handle the end of a drag.
    ///
    /// `filter` must be the one the columns were rendered with: drop
    /// indices count visible cards only, so neighbors are looked up among
    /// the visible issues too.
    ///
    /// Returns `Ok(None)` when the card was dropped outside the board and
    /// the update that was saved otherwise. A failed save is undone before
    /// this returns and is never retried.
    pub async fn on_drag_end(
        &mut self,
        result: &DropResult,
        filter: &FilterConfig,
    ) -> Result<Option<IssueUpdate>, DropError> {
        let Some(destination) = result.destination else {
            return Ok(None);
        };

        let visible: Vec<Issue> = filter_issues(self.state.issues(), filter).into_iter().cloned().collect();
        let board_position = calculate_issue_board_position(
            &visible,
            &result.draggable_id,
            &result.source,
            &destination,
        )?;
        let update = IssueUpdate {
            id: result.draggable_id.clone(),
            status: destination.droppable_id,
            board_position,
        };

        let pending = self.state.begin_move(update).map_err(DropError::Persistence)?;

        match self.store.update_issue(pending.update()).await {
            Ok(_) => Ok(Some(self.state.commit(pending))),
            Err(e) => {
                let update = self.state.rollback(pending);
                log::warn!("Rolled back move of issue {}: {}", update.id, e);
                self.notifier.notify(&e.to_string());
                Err(DropError::Persistence(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DraggableLocation;
    use crate::domain::Project;
    use crate::repository::{init_db, IssueRepository, ProjectRepository, Repository, IN_MEMORY};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    /// In-memory store that can be told to fail writes
    #[derive(Default)]
    struct FakeStore {
        issues: Vec<Issue>,
        fail_with: Option<DomainError>,
        updates: Mutex<Vec<IssueUpdate>>,
    }

    #[async_trait]
    impl IssueStore for FakeStore {
        async fn list_issues(&self, project_id: &str) -> DomainResult<Vec<Issue>> {
            Ok(self.issues.iter().filter(|i| i.project_id == project_id).cloned().collect())
        }

        async fn update_issue(&self, update: &IssueUpdate) -> DomainResult<Issue> {
            self.updates.lock().unwrap().push(update.clone());
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            let mut issue = self
                .issues
                .iter()
                .find(|i| i.id == update.id)
                .cloned()
                .ok_or_else(|| DomainError::NotFound(update.id.clone()))?;
            issue.status = update.status;
            issue.board_position = update.board_position;
            Ok(issue)
        }
    }

    #[derive(Default, Clone)]
    struct RecordingNotifier {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn issues() -> Vec<Issue> {
        vec![
            Issue::new("A", "BRD-1", "A", "p1").with_position(1.0),
            Issue::new("B", "BRD-2", "B", "p1").with_position(2.0),
            Issue::new("C", "BRD-3", "C", "p1").with_position(3.0),
            Issue::new("X", "BRD-4", "X", "p1").with_status(IssueStatus::Done).with_position(1.0),
        ]
    }

    fn drop_result(id: &str, from: (IssueStatus, usize), to: Option<(IssueStatus, usize)>) -> DropResult {
        DropResult {
            draggable_id: id.to_string(),
            source: DraggableLocation::new(from.0, from.1),
            destination: to.map(|(status, index)| DraggableLocation::new(status, index)),
        }
    }

    async fn loaded_board(store: FakeStore) -> (Board<Arc<FakeStore>, RecordingNotifier>, Arc<FakeStore>, RecordingNotifier) {
        let store = Arc::new(store);
        let notifier = RecordingNotifier::default();
        let mut board = Board::with_notifier("p1", store.clone(), notifier.clone());
        board.load().await.unwrap();
        (board, store, notifier)
    }

    #[tokio::test]
    async fn test_successful_move_is_kept() {
        let (mut board, store, notifier) = loaded_board(FakeStore { issues: issues(), ..Default::default() }).await;

        let saved = board
            .on_drag_end(&drop_result("C", (IssueStatus::Todo, 2), Some((IssueStatus::Todo, 0))), &FilterConfig::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved, IssueUpdate { id: "C".to_string(), status: IssueStatus::Todo, board_position: 0.0 });

        let todo: Vec<&str> = board.state().column(IssueStatus::Todo, &FilterConfig::default())
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(todo, vec!["C", "A", "B"]);
        assert_eq!(store.updates.lock().unwrap().len(), 1);
        assert!(notifier.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back_and_notifies() {
        let store = FakeStore {
            issues: issues(),
            fail_with: Some(DomainError::Rejected("Issue is locked".to_string())),
            ..Default::default()
        };
        let (mut board, store, notifier) = loaded_board(store).await;
        let before = board.state().snapshot();

        let err = board
            .on_drag_end(&drop_result("X", (IssueStatus::Done, 0), Some((IssueStatus::Todo, 1))), &FilterConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err, DropError::Persistence(DomainError::Rejected("Issue is locked".to_string())));
        assert_eq!(board.issues(), before.issues());
        assert_eq!(*notifier.messages.lock().unwrap(), vec!["Issue is locked".to_string()]);
        // one attempt, no retry
        assert_eq!(store.updates.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_drop_outside_board_does_nothing() {
        let (mut board, store, _) = loaded_board(FakeStore { issues: issues(), ..Default::default() }).await;
        let before = board.state().clone();

        let result = board.on_drag_end(&drop_result("A", (IssueStatus::Todo, 0), None), &FilterConfig::default()).await.unwrap();
        assert!(result.is_none());
        assert_eq!(board.state(), &before);
        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_contract_violation_sends_nothing() {
        let (mut board, store, notifier) = loaded_board(FakeStore { issues: issues(), ..Default::default() }).await;
        let before = board.state().clone();

        let err = board
            .on_drag_end(&drop_result("A", (IssueStatus::Todo, 0), Some((IssueStatus::Todo, 7))), &FilterConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err, DropError::Contract(BoardError::IndexOutOfRange { index: 7, len: 3 }));
        assert_eq!(board.state(), &before);
        assert!(store.updates.lock().unwrap().is_empty());
        assert!(notifier.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drop_into_filtered_column_uses_visible_neighbors() {
        let store = FakeStore {
            issues: vec![
                Issue::new("A", "BRD-1", "alpha", "p1").with_position(1.0),
                Issue::new("B", "BRD-2", "hidden", "p1").with_position(2.0),
                Issue::new("C", "BRD-3", "alpha two", "p1").with_position(3.0),
            ],
            ..Default::default()
        };
        let (mut board, _, _) = loaded_board(store).await;
        let filter = FilterConfig::default().with_search("alpha");

        let visible: Vec<&str> = board.state().column(IssueStatus::Todo, &filter)
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(visible, vec!["A", "C"]);

        // A below C in the visible column
        let saved = board
            .on_drag_end(&drop_result("A", (IssueStatus::Todo, 0), Some((IssueStatus::Todo, 1))), &filter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.board_position, 4.0);

        let visible: Vec<&str> = board.state().column(IssueStatus::Todo, &filter)
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(visible, vec!["C", "A"]);
    }

    #[tokio::test]
    async fn test_dragging_a_hidden_issue_is_rejected() {
        let (mut board, store, _) = loaded_board(FakeStore { issues: issues(), ..Default::default() }).await;
        let filter = FilterConfig::default().with_search("BRD-4");

        let err = board
            .on_drag_end(&drop_result("A", (IssueStatus::Todo, 0), Some((IssueStatus::Done, 0))), &filter)
            .await
            .unwrap_err();
        assert_eq!(err, DropError::Contract(BoardError::IssueNotFound("A".to_string())));
        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_columns_in_board_order() {
        let (board, _, _) = loaded_board(FakeStore { issues: issues(), ..Default::default() }).await;

        let columns = board.columns(&FilterConfig::default().with_search("BRD-4"));
        let statuses: Vec<IssueStatus> = columns.iter().map(|(s, _)| *s).collect();
        assert_eq!(statuses, IssueStatus::ALL.to_vec());
        assert!(columns[0].1.is_empty());
        assert_eq!(columns[2].1.len(), 1);
    }

    #[tokio::test]
    async fn test_cross_column_move_against_sqlite() {
        let db = init_db(Path::new(IN_MEMORY)).await.unwrap();
        let projects = ProjectRepository::new(db.connection());
        let repo = IssueRepository::new(db.connection());
        let project = projects.create(&Project::new("", "Board", "BRD")).await.unwrap();

        let a = repo.create_in_column(&Issue::new("", "", "A", project.id.clone()).with_status(IssueStatus::Done)).await.unwrap();
        let b = repo
            .create(&Issue::new("", "", "B", project.id.clone()).with_status(IssueStatus::Done).with_position(3.0))
            .await
            .unwrap();
        let x = repo.create_in_column(&Issue::new("", "", "X", project.id.clone())).await.unwrap();

        let mut board = Board::new(project.id.clone(), repo);
        board.load().await.unwrap();
        let saved = board
            .on_drag_end(&drop_result(&x.id, (IssueStatus::Todo, 0), Some((IssueStatus::Done, 1))), &FilterConfig::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.board_position, 2.0);

        board.load().await.unwrap();
        let done: Vec<&str> = board.state().column(IssueStatus::Done, &FilterConfig::default())
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(done, vec![a.id.as_str(), x.id.as_str(), b.id.as_str()]);
    }
}
