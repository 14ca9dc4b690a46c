use std::time::Duration;

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    started_at: String,
    version: &'static str,
    work_entries: usize,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now();
    let uptime_secs = now
        .signed_duration_since(state.started_at)
        .num_seconds()
        .max(0) as u64;

    HttpResponse::Ok().json(HealthCheckResponse {
        status: "healthy",
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        timestamp: now.to_rfc3339(),
        started_at: state.started_at.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        work_entries: state.work.len(),
    })
}
