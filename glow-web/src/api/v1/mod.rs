//! V1 catalog API routes
mod auth;
mod category;
mod product;
mod user;

use crate::middleware::auth::Authentication;
use actix_web::{guard, web};

/// Configure all v1 routes
pub fn configure_v1_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_public_routes)
        .configure(configure_protected_routes);
}

/// Routes that don't require authentication: catalog reads, login and registration
fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(category::ROUTER_PREFIX)
            .guard(guard::Get())
            .to(category::list),
    )
    .service(
        web::resource(format!("{}/{{id:\\d+}}", category::ROUTER_PREFIX))
            .guard(guard::Get())
            .to(category::get_by_id),
    )
    .service(
        web::resource(product::ROUTER_PREFIX)
            .guard(guard::Get())
            .to(product::list),
    )
    .service(
        web::resource(format!("{}/{{id:\\d+}}", product::ROUTER_PREFIX))
            .guard(guard::Get())
            .to(product::get_by_id),
    )
    .route(
        format!("{}/login", auth::ROUTER_PREFIX).as_str(),
        web::post().to(auth::login),
    )
    .route(
        format!("{}/register", auth::ROUTER_PREFIX).as_str(),
        web::post().to(auth::register),
    );
}

/// Everything else sits behind the bearer token check
fn configure_protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .wrap(Authentication)
            .service(web::scope(auth::ROUTER_PREFIX).configure(auth::configure_routes))
            .service(web::scope(category::ROUTER_PREFIX).configure(category::configure_routes))
            .service(web::scope(product::ROUTER_PREFIX).configure(product::configure_routes))
            .service(web::scope(user::ROUTER_PREFIX).configure(user::configure_routes))
            .route("/current-user", web::get().to(auth::current_user))
            .route("/profile", web::put().to(auth::update_profile))
            .route("/profile", web::patch().to(auth::update_profile)),
    );
}
