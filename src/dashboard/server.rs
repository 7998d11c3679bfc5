//! HTTP surface of the dashboard (actix-web).
//!
//! The page keeps the stored view and sends it back, so requests share no state.

use crate::config::DashboardSettings;
use crate::dashboard::store::download;
use crate::dashboard::view::{update_dashboard, DashboardInputs};
use actix_web::http::header;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Deserialize;
use tracing::{error, info};

const INDEX_HTML: &str = include_str!("index.html");

/// Largest accepted JSON body; uploads arrive base64-encoded inside it.
pub const JSON_LIMIT: usize = 32 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub store: Option<String>,
}

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

async fn update(inputs: web::Json<DashboardInputs>) -> HttpResponse {
    HttpResponse::Ok().json(update_dashboard(&inputs))
}

async fn download_view(request: web::Json<DownloadRequest>) -> HttpResponse {
    match download(request.store.as_deref()) {
        Ok(file) => HttpResponse::Ok()
            .content_type(file.content_type)
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.bytes),
        Err(e) => {
            error!("Download failed: {}", e);
            HttpResponse::BadRequest().body(e.to_string())
        }
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Routes and body limits, shared by the server and tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT))
        .route("/", web::get().to(index))
        .route("/api/update", web::post().to(update))
        .route("/api/download", web::post().to(download_view))
        .route("/health", web::get().to(health));
}

/// Serve until the process is stopped.
pub async fn run(settings: DashboardSettings) -> std::io::Result<()> {
    info!(
        "Dashboard listening on http://{}:{}",
        settings.host, settings.port
    );
    HttpServer::new(|| App::new().configure(configure))
        .bind(settings.addr())?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use base64::engine::general_purpose::STANDARD as B64;
    use base64::Engine;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_index_and_health() {
        let app = test::init_service(App::new().configure(configure)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("Sales Dashboard"));

        let req = test::TestRequest::get().uri("/health").to_request();
        let health: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(health["status"], "ok");
    }

    #[actix_web::test]
    async fn test_update_reports_missing_column() {
        let app = test::init_service(App::new().configure(configure)).await;
        let contents = format!("data:text/csv;base64,{}", B64.encode("date,sales\n2024-01-01,5\n"));
        let req = test::TestRequest::post()
            .uri("/api/update")
            .set_json(json!({ "contents": contents, "filename": "x.csv" }))
            .to_request();
        let out: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(out["status"], "Error: CSV missing required columns: region");
        assert!(out["chart"].is_null());
    }

    #[actix_web::test]
    async fn test_update_accepts_any_chart_type() {
        let app = test::init_service(App::new().configure(configure)).await;
        let contents = format!(
            "data:text/csv;base64,{}",
            B64.encode("date,region,sales\n2024-01-01,North,5\n")
        );
        for chart_type in [None, Some(Value::Null), Some(json!("scatter")), Some(json!(7))] {
            let mut body = json!({ "contents": contents });
            if let Some(kind) = chart_type {
                body["chart_type"] = kind;
            }
            let req = test::TestRequest::post()
                .uri("/api/update")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
            let out: Value = test::read_body_json(resp).await;
            assert_eq!(out["chart"]["kind"], "bar");
            assert_eq!(out["summary"][0], "Rows: 1");
        }
    }

    #[actix_web::test]
    async fn test_download_placeholder() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/download")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        assert_eq!(
            disposition.as_deref(),
            Some("attachment; filename=\"empty.txt\"")
        );
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"No data to download");
    }
}
