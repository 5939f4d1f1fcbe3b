//! Per-session state of the upload tool.
//!
//! Every page load gets its own session. A session remembers the two
//! spreadsheets produced by its last successful run and the status message
//! shown to the user. Nothing here is shared between sessions.
//!
//! The main components are:
//! - `SessionState`: the state of one session plus the transitions a
//!   processing request goes through.
//! - `SessionsState`: a clonable, thread-safe registry of all sessions. It is
//!   injected into the Actix application state in `main.rs`.

use crate::messages;
use crate::processor::{ProcessError, ProcessOutput};
use cup_common::model::artifact::ArtifactKind;
use cup_common::model::downloads::DownloadsView;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct SessionState {
    tables_path: Option<PathBuf>,
    plan_path: Option<PathBuf>,
    status: String,
}

impl SessionState {
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Forgets the artifacts of the previous run. Called first on every
    /// processing request, so the download buttons disappear until the new
    /// run has finished.
    pub fn begin_request(&mut self) {
        self.tables_path = None;
        self.plan_path = None;
    }

    pub fn warn(&mut self, message: &str) {
        self.status = message.to_string();
    }

    pub fn record_success(&mut self, output: ProcessOutput) {
        self.status = messages::completed(&output.tables_path, &output.plan_path, &output.stats);
        self.tables_path = Some(output.tables_path);
        self.plan_path = Some(output.plan_path);
    }

    pub fn record_failure(&mut self, error: &ProcessError) {
        self.tables_path = None;
        self.plan_path = None;
        self.status = messages::failed(error);
    }

    /// Recorded path for `kind`, if the last run produced one.
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Path> {
        match kind {
            ArtifactKind::Tables => self.tables_path.as_deref(),
            ArtifactKind::Plan => self.plan_path.as_deref(),
        }
    }

    /// Download view for the page.
    ///
    /// Both paths must be recorded and both files must still be on disk.
    /// A file removed behind our back hides the whole section.
    pub fn available_downloads(&self, output_dir: &Path) -> DownloadsView {
        let output_dir = output_dir.to_string_lossy().to_string();
        match (&self.tables_path, &self.plan_path) {
            (Some(tables), Some(plan)) if tables.is_file() && plan.is_file() => DownloadsView {
                available: true,
                tables_file: Some(messages::base_name(tables)),
                plan_file: Some(messages::base_name(plan)),
                output_dir,
            },
            _ => DownloadsView::hidden(output_dir),
        }
    }
}

pub type SharedSession = Arc<Mutex<SessionState>>;

/// Sessions untouched for this long are dropped on the next `create`.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(4 * 60 * 60);

struct SessionEntry {
    session: SharedSession,
    last_seen: Instant,
}

/// Registry of live sessions keyed by session id.
///
/// Each session sits behind its own mutex so requests of one session run one
/// after the other while different sessions never wait on each other. The
/// outer `RwLock` is only held long enough to look up or insert an entry.
///
/// Every page load adds an entry, so idle entries are evicted lazily when a
/// new session is created. A session in the middle of a request is kept.
#[derive(Clone)]
pub struct SessionsState {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    idle_timeout: Duration,
}

impl Default for SessionsState {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionsState {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Registers an empty session and returns its id.
    pub async fn create(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.last_seen.elapsed() < self.idle_timeout || entry.session.try_lock().is_err()
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle sessions", evicted);
        }

        sessions.insert(
            session_id.clone(),
            SessionEntry {
                session: SharedSession::default(),
                last_seen: Instant::now(),
            },
        );
        session_id
    }

    /// Looks up a session and marks it as used.
    pub async fn get(&self, session_id: &str) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(session_id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cup_common::model::stats::ProcessingStats;
    use tempfile::TempDir;

    fn output_in(dir: &Path) -> ProcessOutput {
        ProcessOutput {
            tables_path: dir.join("output_tables.xlsx"),
            plan_path: dir.join("Plan_de_fertilizare.xlsx"),
            stats: ProcessingStats {
                rows_parsed: 120,
                crop_types: 5,
                categories: 3,
            },
        }
    }

    #[test]
    fn downloads_need_both_files_on_disk() {
        let dir = TempDir::new().unwrap();
        let output = output_in(dir.path());
        std::fs::write(&output.tables_path, b"x").unwrap();

        let mut state = SessionState::default();
        state.record_success(output.clone());

        assert!(state.artifact(ArtifactKind::Tables).is_some());
        assert!(state.artifact(ArtifactKind::Plan).is_some());
        assert!(!state.available_downloads(dir.path()).available);

        std::fs::write(&output.plan_path, b"x").unwrap();
        let view = state.available_downloads(dir.path());
        assert!(view.available);
        assert_eq!(view.tables_file.as_deref(), Some("output_tables.xlsx"));
        assert_eq!(view.plan_file.as_deref(), Some("Plan_de_fertilizare.xlsx"));
    }

    #[test]
    fn begin_request_clears_previous_artifacts() {
        let dir = TempDir::new().unwrap();
        let mut state = SessionState::default();
        state.record_success(output_in(dir.path()));

        state.begin_request();

        assert!(state.artifact(ArtifactKind::Tables).is_none());
        assert!(state.artifact(ArtifactKind::Plan).is_none());
        // The message of the last run stays until the new one replaces it.
        assert!(state.status().starts_with("✅"));
    }

    #[test]
    fn failure_hides_downloads() {
        let mut state = SessionState::default();
        state.record_failure(&ProcessError::Failed("pagină lipsă".into()));

        assert_eq!(state.status(), "❌ Eroare la procesare: pagină lipsă");
        assert!(!state.available_downloads(Path::new(".")).available);
    }

    #[actix_web::test]
    async fn sessions_are_independent() {
        let sessions = SessionsState::default();
        let a = sessions.create().await;
        let b = sessions.create().await;
        assert_ne!(a, b);

        sessions.get(&a).await.unwrap().lock().await.warn("a");

        assert_eq!(sessions.get(&a).await.unwrap().lock().await.status(), "a");
        assert_eq!(sessions.get(&b).await.unwrap().lock().await.status(), "");
        assert!(sessions.get("missing").await.is_none());
    }

    #[actix_web::test]
    async fn idle_sessions_are_evicted_on_create() {
        let sessions = SessionsState::new(Duration::ZERO);
        let first = sessions.create().await;
        let second = sessions.create().await;

        assert!(sessions.get(&first).await.is_none());
        assert!(sessions.get(&second).await.is_some());
        assert_eq!(sessions.count().await, 1);
    }

    #[actix_web::test]
    async fn busy_sessions_survive_eviction() {
        let sessions = SessionsState::new(Duration::ZERO);
        let busy = sessions.create().await;
        let handle = sessions.get(&busy).await.unwrap();
        let _guard = handle.lock().await;

        sessions.create().await;

        assert!(sessions.get(&busy).await.is_some());
        assert_eq!(sessions.count().await, 2);
    }

    #[actix_web::test]
    async fn recent_sessions_are_kept() {
        let sessions = SessionsState::default();
        let first = sessions.create().await;
        sessions.create().await;

        assert!(sessions.get(&first).await.is_some());
        assert_eq!(sessions.count().await, 2);
    }
}
