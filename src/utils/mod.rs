use crate::models::{Claims, ServiceError};
use actix_web::http::header;
use actix_web::{dev::ServiceRequest, HttpMessage, HttpRequest};
use jsonwebtoken::{decode, DecodingKey, Validation};
use log::{error, warn};
use std::env;

pub mod deadline_storage;
pub mod directory_storage;

// Runtime configuration, read from the environment (and .env)
pub mod config {
    use super::*;

    const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:9090";
    const DEFAULT_STORAGE_PATH: &str = "./storage";
    const DEV_JWT_SECRET: &str = "deadline_service_dev_secret";

    #[derive(Debug, Clone)]
    pub struct AppConfig {
        pub bind_address: String,
        pub storage_path: String,
        pub jwt_secret: String,
        pub cors_permissive: bool,
    }

    impl AppConfig {
        pub fn from_env() -> Self {
            Self::from_vars(|key| env::var(key).ok())
        }

        pub fn from_vars<F>(lookup: F) -> Self
        where
            F: Fn(&str) -> Option<String>,
        {
            let jwt_secret = match lookup("JWT_SECRET") {
                Some(secret) if !secret.is_empty() => secret,
                _ => {
                    warn!("⚠️ JWT_SECRET not set, using development secret");
                    DEV_JWT_SECRET.to_string()
                }
            };

            let cors_permissive = lookup("CORS_PERMISSIVE")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true);

            Self {
                bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
                storage_path: lookup("STORAGE_PATH").unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string()),
                jwt_secret,
                cors_permissive,
            }
        }
    }
}

// JWT utility functions. Tokens are issued elsewhere; we only verify them.
pub mod jwt {
    use super::*;

    // Validate and decode a JWT token
    pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Unauthorized)
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        if !auth_header.starts_with("Bearer ") {
            return Err(ServiceError::Unauthorized);
        }

        Ok(auth_header.trim_start_matches("Bearer ").to_string())
    }
}

// Requester id placed in the request by the authentication middleware
pub fn get_user_id_from_request(req: &HttpRequest) -> Result<String, ServiceError> {
    match req.extensions().get::<Claims>() {
        Some(claims) => Ok(claims.sub.clone()),
        None => {
            error!("❌ Missing authenticated identity on request: {}", req.path());
            Err(ServiceError::Unauthorized)
        }
    }
}

// Middleware for JWT authentication
pub mod auth_middleware {
    use super::*;
    use actix_web::dev::{forward_ready, Service, Transform};
    use actix_web::{error::ErrorUnauthorized, Error};
    use futures::future::{ok, Ready};
    use std::future::Future;
    use std::pin::Pin;

    pub struct Authentication {
        secret: String,
    }

    impl Authentication {
        pub fn new(secret: impl Into<String>) -> Self {
            Self { secret: secret.into() }
        }
    }

    impl<S, B> Transform<S, ServiceRequest> for Authentication
    where
        S: Service<ServiceRequest, Response = actix_web::dev::ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = actix_web::dev::ServiceResponse<B>;
        type Error = Error;
        type Transform = AuthenticationMiddleware<S>;
        type InitError = ();
        type Future = Ready<Result<Self::Transform, Self::InitError>>;

        fn new_transform(&self, service: S) -> Self::Future {
            ok(AuthenticationMiddleware {
                service,
                secret: self.secret.clone(),
            })
        }
    }

    pub struct AuthenticationMiddleware<S> {
        service: S,
        secret: String,
    }

    impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
    where
        S: Service<ServiceRequest, Response = actix_web::dev::ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = actix_web::dev::ServiceResponse<B>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

        forward_ready!(service);

        fn call(&self, req: ServiceRequest) -> Self::Future {
            // Get Authorization header
            let auth_header = req.headers().get(header::AUTHORIZATION);

            if let Some(auth_header) = auth_header {
                if let Ok(auth_str) = auth_header.to_str() {
                    if let Ok(token) = jwt::extract_token_from_header(auth_str) {
                        if let Ok(claims) = jwt::decode_token(&token, &self.secret) {
                            // Add the claims to the request extensions
                            req.extensions_mut().insert(claims);
                            let fut = self.service.call(req);
                            return Box::pin(async move {
                                fut.await
                            });
                        }
                    }
                }
            }

            warn!("🔒 Rejected unauthenticated request: {}", req.path());
            Box::pin(async move {
                Err(ErrorUnauthorized("Unauthorized"))
            })
        }
    }
}
