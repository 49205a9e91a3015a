//! Token authorization middleware.
//!
//! Reads the `token` request header (`token: Bearer <jwt>`), verifies the
//! JWT against the configured secret and applies an [`AccessPolicy`]. On
//! success the verified claims are stored in request extensions as an
//! [`AuthContext`]; on failure the request is answered with a problem
//! details response and the wrapped service never runs.
//!
//! - no (or blank) header: 401 `UNAUTHENTICATED`
//! - header without a second segment, or a token that fails verification:
//!   403 `INVALID_TOKEN`
//! - valid token that the policy refuses: 403 `FORBIDDEN`
//!
//! Wrap at resource level so path parameters are already matched:
//!
//! ```ignore
//! web::resource("/{id}")
//!     .wrap(TokenAuth::owner_or_admin())
//!     .route(web::get().to(get_user))
//! ```

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::HeaderValue;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{debug, warn};

use crate::auth::claims::{AuthContext, Identity};
use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Name of the request header carrying `Bearer <jwt>`.
pub const TOKEN_HEADER: &str = "token";

/// Who may pass once a token has been verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any holder of a valid token.
    Authenticated,
    /// The user whose id is in path parameter `param`, or an admin.
    OwnerOrAdmin { param: &'static str },
    /// Admins only.
    Admin,
}

impl AccessPolicy {
    /// Decide whether `identity` may proceed. `path_id` is the raw value
    /// of the policy's path parameter, if the route has one.
    pub fn authorize(&self, identity: &Identity, path_id: Option<&str>) -> Result<(), AppError> {
        let allowed = match self {
            AccessPolicy::Authenticated => true,
            AccessPolicy::OwnerOrAdmin { .. } => {
                identity.is_admin || path_id == Some(identity.id.to_string().as_str())
            }
            AccessPolicy::Admin => identity.is_admin,
        };

        if allowed {
            Ok(())
        } else {
            Err(AppError::forbidden())
        }
    }

    fn path_param(&self) -> Option<&'static str> {
        match self {
            AccessPolicy::OwnerOrAdmin { param } => Some(*param),
            _ => None,
        }
    }
}

/// Pull the raw JWT out of the `token` header value.
pub fn extract_token(header: Option<&HeaderValue>) -> Result<&str, AppError> {
    let value = match header {
        Some(value) if !value.as_bytes().iter().all(u8::is_ascii_whitespace) => value,
        _ => return Err(AppError::unauthenticated()),
    };

    value
        .to_str()
        .ok()
        .and_then(|raw| raw.split_whitespace().nth(1))
        .ok_or_else(AppError::invalid_token)
}

pub struct TokenAuth {
    policy: AccessPolicy,
}

impl TokenAuth {
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    pub fn authenticated() -> Self {
        Self::new(AccessPolicy::Authenticated)
    }

    /// Owner check against the `{id}` path parameter.
    pub fn owner_or_admin() -> Self {
        Self::new(AccessPolicy::OwnerOrAdmin { param: "id" })
    }

    pub fn admin() -> Self {
        Self::new(AccessPolicy::Admin)
    }
}

impl<S, B> Transform<S, ServiceRequest> for TokenAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenAuthMiddleware {
            service,
            policy: self.policy,
        }))
    }
}

pub struct TokenAuthMiddleware<S> {
    service: S,
    policy: AccessPolicy,
}

impl<S> TokenAuthMiddleware<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<AuthContext, AppError> {
        let token = extract_token(req.headers().get(TOKEN_HEADER))?;

        let state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| AppError::internal("AppState not available"))?;

        let claims = verify_access_token(token, &state.security)?;

        let path_id = self.policy.path_param().and_then(|p| req.match_info().get(p));
        self.policy.authorize(&claims.identity, path_id)?;

        Ok(AuthContext { claims })
    }
}

impl<S, B> Service<ServiceRequest> for TokenAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authenticate(&req) {
            Ok(ctx) => {
                debug!(user_id = ctx.identity().id, policy = ?self.policy, "token accepted");
                req.extensions_mut().insert(ctx);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                let policy = self.policy;
                // Rendered inside the returned future so the error picks up
                // the request's trace id.
                Box::pin(async move {
                    warn!(code = %err.code(), policy = ?policy, "request rejected by token middleware");
                    Ok(req.error_response(err).map_into_right_body())
                })
            }
        }
    }
}
