use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod work;
mod payload_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .configure(work::config_routes)
    );

    cfg.configure(payload_error::config_routes);
}
