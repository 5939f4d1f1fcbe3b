use serde::{Deserialize, Serialize};

/// Returned by `POST /api/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
}

/// Returned by the process endpoint: the status message after the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub message: String,
}
