use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::identity::{HttpIdentityVerifier, IdentityVerifier};

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The admin who made the request, stored as a request extension once
/// [`require_admin`] has let the request through.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub String);

/// Why a request was refused admin access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No bearer token, or the token could not be verified.
    Unauthenticated,
    /// Valid identity that is not on the allow-list.
    Forbidden,
}

/// Bearer identity check plus the admin e-mail allow-list.
#[derive(Clone)]
pub struct AdminAuth {
    verifier: Option<Arc<dyn IdentityVerifier>>,
    admins: Arc<HashSet<String>>,
}

impl AdminAuth {
    pub fn new(verifier: Option<Arc<dyn IdentityVerifier>>, admins: Vec<String>) -> Self {
        Self {
            verifier,
            admins: Arc::new(admins.into_iter().map(|e| e.to_lowercase()).collect()),
        }
    }

    /// Builds the admin check from `SPASITE_IDENTITY_URL` and
    /// `SPASITE_ADMIN_EMAILS`.
    ///
    /// Outside development both are required. In development a missing
    /// value is allowed, but admin routes then refuse every request.
    pub fn from_config(config: &spasite_core::AppConfig) -> anyhow::Result<Self> {
        if !config.is_development() {
            if config.admin_emails.is_empty() {
                anyhow::bail!("SPASITE_ADMIN_EMAILS is required outside development");
            }
            if config.identity_url.is_none() {
                anyhow::bail!("SPASITE_IDENTITY_URL is required outside development");
            }
        }

        let verifier: Option<Arc<dyn IdentityVerifier>> = match &config.identity_url {
            Some(url) => Some(Arc::new(HttpIdentityVerifier::new(
                url,
                config.upstream_timeout_secs,
            )?)),
            None => {
                tracing::warn!(
                    "SPASITE_IDENTITY_URL not set; admin routes will reject every request"
                );
                None
            }
        };
        if config.admin_emails.is_empty() {
            tracing::warn!("SPASITE_ADMIN_EMAILS is empty; no identity will be authorized");
        }

        Ok(Self::new(verifier, config.admin_emails.clone()))
    }

    /// Resolves the request's bearer token and checks it against the
    /// allow-list.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<AdminIdentity, AuthFailure> {
        let token = extract_bearer_token(headers.get(AUTHORIZATION))
            .ok_or(AuthFailure::Unauthenticated)?;
        let verifier = self.verifier.as_ref().ok_or(AuthFailure::Unauthenticated)?;

        let identity = match verifier.verify(token).await {
            Ok(Some(identity)) => identity,
            Ok(None) => return Err(AuthFailure::Unauthenticated),
            Err(e) => {
                tracing::warn!(error = %e, "identity verification failed");
                return Err(AuthFailure::Unauthenticated);
            }
        };

        if self.admins.contains(&identity.email) {
            Ok(AdminIdentity(identity.email))
        } else {
            tracing::warn!(email = %identity.email, "identity not on admin allow-list");
            Err(AuthFailure::Forbidden)
        }
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Sliding fixed-window limiter for simple API protection.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

fn middleware_error(status: StatusCode, code: &'static str, message: &'static str) -> Response {
    (
        status,
        Json(MiddlewareErrorBody {
            error: MiddlewareError { code, message },
        }),
    )
        .into_response()
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware admitting only allow-listed admins.
pub async fn require_admin(State(auth): State<AdminAuth>, mut req: Request, next: Next) -> Response {
    match auth.authorize(req.headers()).await {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(AuthFailure::Unauthenticated) => middleware_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid bearer token",
        ),
        Err(AuthFailure::Forbidden) => middleware_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "identity is not an administrator",
        ),
    }
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;
    let elapsed = window.started_at.elapsed();

    if elapsed >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        return middleware_error(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded",
        );
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
