//! Public root routes.
//!
//! Mounted at the root so they stay reachable whatever `web.router_prefix` is.

mod health;

use actix_web::web;

/// Configure all public root routes.
#[inline]
pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_health_routes);
}
