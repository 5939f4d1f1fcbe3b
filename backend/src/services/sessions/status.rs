use crate::app_state::AppState;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(
    session_id: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    match state.sessions.get(&session_id).await {
        Some(session) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(session.lock().await.status().to_string()),
        None => HttpResponse::NotFound().body("Session not found"),
    }
}
