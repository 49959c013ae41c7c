use actix_cors::Cors;
use glow_models::settings::{Cors as GlowCors, CorsMode};

pub(crate) fn middleware(cors_config: &GlowCors) -> Cors {
    match cors_config.mode {
        CorsMode::AllowAll => Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(cors_config.max_age),
        CorsMode::Whitelist => {
            let origins = cors_config.origins.clone();
            Cors::default()
                .allowed_origin_fn(move |origin, _| {
                    origin
                        .to_str()
                        .is_ok_and(|origin| origins.iter().any(|allowed| allowed == origin))
                })
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
                .max_age(cors_config.max_age)
        }
    }
}
