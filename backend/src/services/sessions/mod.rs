//! Session-scoped API used by the embedded page.
//!
//! The provided routes are:
//! - `POST /api/sessions`: creates a session and returns its id. The page
//!   calls this once on load and uses the id for every other call.
//!
//! - `POST /api/sessions/{session_id}/process`: multipart form with a `file`
//!   part (the IPA-Online PDF) and a `year` part. Copies the PDF into the
//!   output directory, runs the processor and returns the new status message.
//!
//! - `GET /api/sessions/{session_id}/status`: the status message, verbatim.
//!
//! - `GET /api/sessions/{session_id}/downloads`: whether both spreadsheets are
//!   ready, as a `DownloadsView`.
//!
//! - `GET /api/sessions/{session_id}/download/{artifact}`: the `tables` or
//!   `plan` spreadsheet as an attachment.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod create;
mod download;
mod downloads;
mod process;
mod status;


const API_PATH: &str = "/api/sessions";

/// Configures and returns the Actix scope for session routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("/{session_id}/process", post().to(process::process))
        .route("/{session_id}/status", get().to(status::process))
        .route("/{session_id}/downloads", get().to(downloads::process))
        .route("/{session_id}/download/{artifact}", get().to(download::process))
}
