use actix_web::web;

use crate::handlers::work;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/work")
            .service(
                web::resource("")
                    .route(web::get().to(work::list_work))
            )
            .service(
                web::resource("/tags")
                    .route(web::get().to(work::list_tags))
            )
            .service(
                web::resource("/validate")
                    .route(web::post().to(work::validate_work))
            )
            .service(
                web::resource("/{slug}")
                    .route(web::get().to(work::get_work_entry))
            )
    );
}
