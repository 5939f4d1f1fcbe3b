use crate::app_state::AppState;
use actix_web::{web, HttpResponse, Responder};

/// Reports whether the download section should be shown. The check against
/// the filesystem happens on every call, not when the run finished.
pub(crate) async fn process(
    session_id: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    match state.sessions.get(&session_id).await {
        Some(session) => {
            let view = session
                .lock()
                .await
                .available_downloads(&state.session_dir(&session_id));
            HttpResponse::Ok().json(view)
        }
        None => HttpResponse::NotFound().body("Session not found"),
    }
}
