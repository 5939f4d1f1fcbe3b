//! # Processing request
//!
//! Handler for `POST /api/sessions/{session_id}/process`.
//!
//! ## Workflow:
//!
//! 1.  **Upload**: the multipart body is read into an `UploadForm`. The `file`
//!     part is streamed into a temporary file; a part without a file name or
//!     whose name does not end in `.pdf` counts as no upload. The `year` part
//!     is read as text.
//!
//! 2.  **Reset**: the session forgets the artifacts of its previous run, so the
//!     download section is hidden while this one is in progress.
//!
//! 3.  **Validation**: a missing PDF or a blank year sets a warning and stops.
//!     Nothing is copied and the processor is not called.
//!
//! 4.  **Processing**: on the blocking pool, the upload is copied into the
//!     session's own directory under the output directory, keeping its base
//!     file name, and the processor is run on the copy. Outputs land next to
//!     it, so two sessions never overwrite each other's spreadsheets. Success records both spreadsheets and the summary; any error
//!     becomes a single `❌ Eroare la procesare: ...` message.
//!
//! The session lock is held from step 2 to the end, so two requests of the
//! same session never interleave.

use crate::app_state::AppState;
use crate::messages;
use crate::processor::{ProcessError, ProcessOutput, Processor};
use crate::session::state::SharedSession;
use actix_multipart::{Multipart, MultipartError};
use actix_web::{web, HttpResponse, Responder};
use cup_common::responses::StatusView;
use futures_util::StreamExt;
use log::{error, info, warn};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum UploadError {
    #[error("{0}")]
    Multipart(#[from] MultipartError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("The year field is not valid UTF-8")]
    InvalidYear,
}

/// A PDF received from the client, held in a temporary file that is removed
/// once the request is over.
pub(crate) struct UploadedPdf {
    pub(crate) file_name: String,
    pub(crate) temp: NamedTempFile,
}

#[derive(Default)]
pub(crate) struct UploadForm {
    pub(crate) pdf: Option<UploadedPdf>,
    pub(crate) year: String,
}

/// HTTP handler wrapper that converts the outcome to an `HttpResponse`.
///
/// - Processed, warned or failed: `200 OK` with the status message.
/// - Unknown session: `404 Not Found`.
/// - Unreadable multipart body: `400 Bad Request`.
pub(crate) async fn process(
    session_id: web::Path<String>,
    state: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    let Some(session) = state.sessions.get(&session_id).await else {
        return HttpResponse::NotFound().body("Session not found");
    };

    match read_upload(payload).await {
        Ok(form) => {
            let message = run_request(&session_id, &session, form, &state).await;
            HttpResponse::Ok().json(StatusView { message })
        }
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

/// Reads the `file` and `year` parts. Only the first PDF is kept.
async fn read_upload(mut payload: Multipart) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match field_name.as_deref() {
            Some("file") => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(base_file_name))
                    .unwrap_or_default();

                if form.pdf.is_some() || !is_pdf_name(&file_name) {
                    while let Some(chunk) = field.next().await {
                        chunk?;
                    }
                    continue;
                }

                let mut temp = NamedTempFile::new()?;
                while let Some(chunk) = field.next().await {
                    temp.write_all(&chunk?)?;
                }
                temp.flush()?;
                form.pdf = Some(UploadedPdf { file_name, temp });
            }

            Some("year") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    bytes.extend_from_slice(&chunk?);
                }
                form.year = String::from_utf8(bytes).map_err(|_| UploadError::InvalidYear)?;
            }

            _ => {}
        }
    }

    Ok(form)
}

/// Runs one processing request against `session` and returns the resulting
/// status message.
pub(crate) async fn run_request(
    session_id: &str,
    session: &SharedSession,
    form: UploadForm,
    state: &AppState,
) -> String {
    let mut session = session.lock().await;
    session.begin_request();

    let Some(pdf) = form.pdf else {
        warn!("Processing requested without a PDF");
        session.warn(messages::MISSING_PDF);
        return session.status().to_string();
    };

    let year = form.year.trim().to_string();
    if year.is_empty() {
        warn!("Processing requested without a year for {}", pdf.file_name);
        session.warn(messages::MISSING_YEAR);
        return session.status().to_string();
    }

    let processor = state.processor.clone();
    let session_dir = state.session_dir(session_id);
    let file_name = pdf.file_name.clone();
    let result = web::block(move || {
        copy_and_process(&pdf, &year, &session_dir, processor.as_ref())
    })
    .await
    .unwrap_or_else(|e| Err(ProcessError::Failed(e.to_string())));

    match result {
        Ok(output) => {
            info!(
                "Processed {}: {} rows, {} crops, {} categories",
                file_name,
                output.stats.rows_parsed,
                output.stats.crop_types,
                output.stats.categories
            );
            session.record_success(output);
        }
        Err(e) => {
            error!("Processing {} failed: {}", file_name, e);
            session.record_failure(&e);
        }
    }

    session.status().to_string()
}

/// Copies the upload into `session_dir` and hands the copy to the processor.
fn copy_and_process(
    pdf: &UploadedPdf,
    year: &str,
    session_dir: &Path,
    processor: &dyn Processor,
) -> Result<ProcessOutput, ProcessError> {
    fs::create_dir_all(session_dir)?;
    let pdf_path = session_dir.join(&pdf.file_name);
    fs::copy(pdf.temp.path(), &pdf_path)?;
    processor.process(&pdf_path, year)
}

/// Strips any directory part a client may send along with the file name.
fn base_file_name(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or_default().trim().to_string()
}

fn is_pdf_name(name: &str) -> bool {
    name.len() > ".pdf".len() && name.to_ascii_lowercase().ends_with(".pdf")
}
