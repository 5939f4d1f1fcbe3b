use crate::processor::Processor;
use crate::session::state::SessionsState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Everything the handlers share, injected as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionsState,
    pub processor: Arc<dyn Processor>,
    /// Root under which each session gets its own directory for the copied
    /// upload and the generated spreadsheets.
    pub output_dir: PathBuf,
}

impl AppState {
    pub fn new(processor: Arc<dyn Processor>, output_dir: PathBuf) -> Self {
        Self {
            sessions: SessionsState::default(),
            processor,
            output_dir,
        }
    }

    pub fn with_session_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.sessions = SessionsState::new(idle_timeout);
        self
    }

    /// Directory holding the files of one session. Session ids are server
    /// generated UUIDs, so they are safe as a path component.
    pub fn session_dir(&self, session_id: &str) -> PathBuf {
        self.output_dir.join(session_id)
    }
}
