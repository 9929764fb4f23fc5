use std::time::Duration;

use actix_web::{
    get,
    http::header::{CacheControl, CacheDirective},
    web, HttpResponse,
};
use askama::Template;
use tokio::sync::watch;

use crate::{
    poller::Latest,
    source::StatusSource,
    structures::errors::DashboardError,
    view::DashboardView,
};

#[derive(Debug, Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    view: &'a DashboardView,
    refresh_secs: u64,
}

#[derive(Debug, Template)]
#[template(path = "loading.html")]
struct LoadingTemplate {
    refresh_secs: u64,
}

/// How often the browser reloads the dashboard; matches the poll interval.
#[derive(Debug, Clone, Copy)]
pub struct Refresh(pub Duration);

#[get("/api/status")]
pub async fn status_handler(source: web::Data<StatusSource>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(CacheControl(vec![CacheDirective::NoStore]))
        .json(source.load().await)
}

#[get("/")]
pub async fn index_handler(
    latest: web::Data<watch::Receiver<Latest>>,
    refresh: web::Data<Refresh>,
) -> Result<HttpResponse, DashboardError> {
    let refresh_secs = refresh.0.as_secs().max(1);
    let snapshot = latest.borrow().clone();

    let body = match snapshot {
        Some(snapshot) => {
            let view = DashboardView::new(&snapshot);
            IndexTemplate {
                view: &view,
                refresh_secs,
            }
            .render()?
        }
        None => LoadingTemplate { refresh_secs }.render()?,
    };
    Ok(HttpResponse::Ok()
        .insert_header(CacheControl(vec![CacheDirective::NoStore]))
        .content_type("text/html")
        .body(body))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(status_handler).service(index_handler);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode, test, App};
    use std::{io::Write, sync::Arc};
    use tempfile::NamedTempFile;
    use time::OffsetDateTime;

    use crate::structures::model::{HealthSample, Snapshot};

    fn app_data(
        source: StatusSource,
        snapshot: Option<Snapshot>,
    ) -> (
        web::Data<StatusSource>,
        web::Data<watch::Receiver<Latest>>,
        web::Data<Refresh>,
    ) {
        let (_, latest) = watch::channel(snapshot.map(Arc::new));
        (
            web::Data::new(source),
            web::Data::new(latest),
            web::Data::new(Refresh(Duration::from_secs(5))),
        )
    }

    async fn get_body(
        source: StatusSource,
        snapshot: Option<Snapshot>,
        uri: &str,
    ) -> (StatusCode, String) {
        let (source, latest, refresh) = app_data(source, snapshot);
        let app = test::init_service(
            App::new()
                .app_data(source)
                .app_data(latest)
                .app_data(refresh)
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body = to_bytes(resp.into_body()).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[actix_web::test]
    async fn test_status_missing_file_returns_fallback() {
        let source = StatusSource::File("/nonexistent/server_status.json".into());
        let (status, body) = get_body(source, None, "/api/status").await;
        assert_eq!(status, StatusCode::OK);

        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["summary"]["upCount"], 0);
        assert_eq!(value["summary"]["downCount"], 0);
        assert_eq!(value["summary"]["trend"], "flat");
        assert_eq!(value["meta"]["lastChecked"], "N/A");
        assert_eq!(value["downServices"], serde_json::json!([]));
        assert_eq!(value["byService"], serde_json::json!([]));
        assert_eq!(value["topAffected"], serde_json::json!([]));
        assert_eq!(value["healthHistory"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_status_corrupt_file_returns_ok() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();
        let source = StatusSource::File(file.path().to_path_buf());

        let (status, body) = get_body(source, None, "/api/status").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""trend":"flat""#));
    }

    #[actix_web::test]
    async fn test_status_sets_no_store() {
        let (source, latest, refresh) = app_data(StatusSource::Example, None);
        let app = test::init_service(
            App::new()
                .app_data(source)
                .app_data(latest)
                .app_data(refresh)
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/status").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get("cache-control").unwrap(), "no-store");
    }

    #[actix_web::test]
    async fn test_index_loading_before_first_snapshot() {
        let (status, body) = get_body(StatusSource::Example, None, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("loading status…"));
        assert!(body.contains(r#"content="5""#));
        assert!(!body.contains("<svg"));
    }

    #[actix_web::test]
    async fn test_index_renders_alert_dashboard() {
        let snapshot = Snapshot::example(OffsetDateTime::UNIX_EPOCH);
        let (status, body) = get_body(StatusSource::Example, Some(snapshot), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<body class="theme-alert">"#));
        assert!(body.contains("ALERT: SERVICES DOWN"));
        assert!(body.contains("02:05"));
        assert!(body.contains("TMC"));
        assert!(body.contains("<svg"));
        assert!(body.contains("Z\""));
        assert!(!body.contains("accent-cyan\">UP"));
    }

    #[actix_web::test]
    async fn test_index_renders_placeholders() {
        let (_, body) = get_body(StatusSource::Example, Some(Snapshot::fallback()), "/").await;
        assert!(body.contains(r#"<body class="theme-normal">"#));
        assert!(body.contains("ALL SERVICES ONLINE"));
        assert!(body.contains("No data yet..."));
        assert!(body.contains("No active incidents."));
        assert!(body.contains("All systems stable."));
        assert!(body.contains("No services down."));
        assert!(!body.contains("<path"));
    }

    #[actix_web::test]
    async fn test_index_two_samples_no_fill() {
        let mut snapshot = Snapshot::fallback();
        snapshot.health_history = vec![
            HealthSample {
                ts: 1.0,
                up_count: 10,
                total_count: 10,
                avg_ping_ms: 1.0,
            },
            HealthSample {
                ts: 2.0,
                up_count: 5,
                total_count: 10,
                avg_ping_ms: 1.0,
            },
        ];
        let (_, body) = get_body(StatusSource::Example, Some(snapshot), "/").await;
        assert_eq!(body.matches("<path").count(), 1);
        assert!(body.contains(r#"d="M 0.00 2.00 L 100.00 20.00""#));
    }
}
