use crate::models::{Deadline, ServiceError};
use crate::routes::AppState;
use crate::services::access_policy_service::{check_visibility, list_visible};
use crate::utils::get_user_id_from_request;
use actix_web::{get, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize, Debug)]
pub struct DeadlineQuery {
    pub project_id: Option<String>,
}

async fn load_deadline(state: &AppState, deadline_id: &str) -> Result<Deadline, ServiceError> {
    match state.deadlines.find_deadline(deadline_id).await? {
        Some(deadline) => Ok(deadline),
        None => {
            error!("❌ Deadline not found: {}", deadline_id);
            Err(ServiceError::NotFound)
        }
    }
}

// List the deadlines visible to the current user
#[get("/deadlines")]
async fn get_visible_deadlines(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<DeadlineQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    info!("📋 Fetching deadlines for user: {}", user_id);

    let mut candidates = state.deadlines.candidates().await?;
    if let Some(project_id) = query.project_id.as_deref() {
        candidates.retain(|d| d.project_id.as_deref() == Some(project_id));
    }

    let visible = list_visible(state.directory.as_ref(), &user_id, candidates).await?;

    Ok(HttpResponse::Ok().json(visible))
}

// Get a single deadline if the current user may see it
#[get("/deadlines/{deadline_id}")]
async fn get_deadline(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let deadline_id = path.into_inner();

    info!("🔍 Fetching deadline: {} for user: {}", deadline_id, user_id);

    let deadline = load_deadline(&state, &deadline_id).await?;

    if check_visibility(state.directory.as_ref(), &user_id, &deadline).await?.is_none() {
        error!("❌ User: {} doesn't have access to deadline: {}", user_id, deadline_id);
        return Err(ServiceError::Forbidden);
    }

    Ok(HttpResponse::Ok().json(deadline))
}

// Explain whether (and why) the current user can see a deadline
#[get("/deadlines/{deadline_id}/access")]
async fn get_deadline_access(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let deadline_id = path.into_inner();

    info!("🔐 Checking access to deadline: {} for user: {}", deadline_id, user_id);

    let deadline = load_deadline(&state, &deadline_id).await?;
    let grant = check_visibility(state.directory.as_ref(), &user_id, &deadline).await?;

    Ok(HttpResponse::Ok().json(json!({
        "deadline_id": deadline.id,
        "visible": grant.is_some(),
        "granted_by": grant
    })))
}

// Register all deadline routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_visible_deadlines)
        .service(get_deadline_access)
        .service(get_deadline);
}
