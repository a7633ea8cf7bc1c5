use crate::models::ServiceError;
use crate::routes::AppState;
use crate::services::directory::Directory;
use crate::utils::get_user_id_from_request;
use actix_web::{post, web, HttpRequest, HttpResponse};
use log::{error, info};

// Reload users, teams and projects from storage (admins only)
#[post("/directory/reload")]
async fn reload_directory(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let directory = state.directory.snapshot().await?;
    let requester = directory.get_user(&user_id).ok_or_else(|| {
        error!("❌ Unknown user: {}", user_id);
        ServiceError::Unauthorized
    })?;

    if !requester.is_admin() {
        error!("❌ User: {} is not allowed to reload the directory", user_id);
        return Err(ServiceError::Forbidden);
    }

    let loader = state.loader.as_ref().ok_or_else(|| {
        error!("❌ Directory reload requested but no loader is configured");
        ServiceError::BadRequest("Directory reload is not available".to_string())
    })?;

    info!("🔄 Reloading directory for user: {}", user_id);
    let counts = loader.reload()?;

    Ok(HttpResponse::Ok().json(counts))
}

// Register directory maintenance routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(reload_directory);
}
