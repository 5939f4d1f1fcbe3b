use crate::app_state::AppState;
use crate::messages;
use actix_files::NamedFile;
use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpRequest, HttpResponse};
use cup_common::model::artifact::ArtifactKind;
use log::warn;
use std::path::PathBuf;

/// Serves one of the two spreadsheets under its own file name.
///
/// Fails closed: an artifact that was never produced by this session, or
/// whose file has since disappeared, is a `404`.
pub(crate) async fn process(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let (session_id, artifact) = path.into_inner();

    let Ok(kind) = artifact.parse::<ArtifactKind>() else {
        return HttpResponse::NotFound().body(messages::ARTIFACT_UNAVAILABLE);
    };
    let Some(session) = state.sessions.get(&session_id).await else {
        return HttpResponse::NotFound().body("Session not found");
    };

    let file_path: Option<PathBuf> = session
        .lock()
        .await
        .artifact(kind)
        .map(|p| p.to_path_buf());

    match file_path.filter(|p| p.is_file()) {
        Some(file_path) => match open_attachment(&file_path) {
            Ok(file) => file.into_response(&req),
            Err(e) => {
                warn!("Cannot open {}: {}", file_path.display(), e);
                HttpResponse::NotFound().body(messages::ARTIFACT_UNAVAILABLE)
            }
        },
        None => {
            warn!("Session {} asked for missing {} artifact", session_id, kind);
            HttpResponse::NotFound().body(messages::ARTIFACT_UNAVAILABLE)
        }
    }
}

fn open_attachment(file_path: &std::path::Path) -> std::io::Result<NamedFile> {
    let file = NamedFile::open(file_path)?;
    Ok(file.set_content_disposition(attachment(messages::base_name(file_path))))
}

/// `attachment` disposition for `file_name`. Names with diacritics also get a
/// UTF-8 `filename*` so browsers keep them intact.
fn attachment(file_name: String) -> ContentDisposition {
    let mut parameters = Vec::with_capacity(2);
    if !file_name.is_ascii() {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext(String::from("UTF-8")),
            language_tag: None,
            value: file_name.clone().into_bytes(),
        }));
    }
    parameters.push(DispositionParam::Filename(file_name));

    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters,
    }
}
