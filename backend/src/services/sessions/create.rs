use crate::app_state::AppState;
use actix_web::{web, HttpResponse, Responder};
use cup_common::responses::SessionCreated;
use log::info;

pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    let session_id = state.sessions.create().await;
    info!("Session {} created", session_id);
    HttpResponse::Ok().json(SessionCreated { session_id })
}
