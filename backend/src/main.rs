mod app_state;
mod config;
mod messages;
mod processor;
mod services;
mod session;

use crate::app_state::AppState;
use crate::config::Config;
use crate::processor::command::CommandProcessor;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use clap::Parser;
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::info;
use mime_guess::from_path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::parse();
    let url = config.url();

    std::fs::create_dir_all(&config.output_dir)?;
    info!("Generated files go to {}", config.output_dir.display());

    let processor = CommandProcessor::new(config.processor.clone(), config.processor_args.clone());
    info!(
        "Processor: {} {}",
        config.processor,
        config.processor_args.join(" ")
    );
    let state = AppState::new(Arc::new(processor), config.output_dir.clone())
        .with_session_idle_timeout(Duration::from_secs(config.session_idle_minutes * 60));

    if !config.no_browser {
        let url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url_clone);
        });
    }

    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .service(services::sessions::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_web::test]
    async fn unknown_paths_fall_back_to_the_page() {
        let app =
            test::init_service(App::new().default_service(web::route().to(serve_embedded))).await;

        for uri in ["/", "/anything/else"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let body = test::call_and_read_body(&app, req).await;
            let html = String::from_utf8(body.to_vec()).unwrap();
            assert!(html.contains("Procesează PDF-ul"), "{uri}");
        }
    }
}
