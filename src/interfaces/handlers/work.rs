use actix_web::{web, HttpResponse, Responder};
use slug::slugify;
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::{
        work::{validate_work_item, RawRecord},
        work_entry::{WorkEntry, WorkQuery},
    },
    errors::AppError,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_work(
    state: web::Data<AppState>,
    query: web::Query<WorkQuery>,
) -> Result<impl Responder, AppError> {
    let query = query.into_inner();
    query.validate()?;

    let items: Vec<_> = state
        .work
        .list(&query)
        .into_iter()
        .map(WorkEntry::to_summary_response)
        .collect();

    Ok(HttpResponse::Ok().json(items))
}

#[instrument(skip(state))]
pub async fn get_work_entry(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    if slug.is_empty() || slugify(slug.as_str()) != *slug {
        return Err(AppError::BadRequest(format!("'{}' is not a valid work slug", slug)));
    }

    let entry = state
        .work
        .get(&slug)
        .ok_or_else(|| AppError::NotFound(format!("Work entry '{}'", slug)))?;

    Ok(HttpResponse::Ok().json(entry.to_detail_response()))
}

#[instrument(skip(state))]
pub async fn list_tags(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.work.tags())
}

/// Validates a front-matter record without admitting it to the collection.
#[instrument(skip(data))]
pub async fn validate_work(data: web::Json<RawRecord>) -> Result<impl Responder, AppError> {
    let item = validate_work_item(&data)?;
    Ok(HttpResponse::Ok().json(item))
}
