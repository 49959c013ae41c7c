//! Liveness check.

use actix_web::{web, HttpResponse};

/// Configure health check routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}
