//! Access gate: decides, per request path, whether a caller proceeds or is redirected.
//!
//! [`classify`] is the whole policy and is pure. The middleware only resolves the caller,
//! asks [`classify`], and renders the outcome.

use crate::auth::{session_token, Caller};
use crate::error::HttpAppError;
use crate::state::AuthState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use fusion_core::AppError;

pub const LANDING_ROUTE: &str = "/home";
pub const SIGN_IN_ROUTE: &str = "/signin";

const PUBLIC_PAGES: &[&str] = &["/", "/signin", "/signup", "/home"];
/// Pages whose nested paths belong to the same route (hosted sign-in widgets)
const PUBLIC_PAGE_PREFIXES: &[&str] = &["/signin", "/signup"];
const PUBLIC_API_ROUTES: &[&str] = &["/api/videos", "/api/health", "/api/openapi.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    RedirectToLanding,
    RedirectToSignIn,
}

fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// Static assets and framework internals are never classified.
pub fn is_bypassed(path: &str) -> bool {
    if path.starts_with("/_next") {
        return true;
    }
    path.rsplit('/')
        .next()
        .map(|segment| segment.contains('.'))
        .unwrap_or(false)
}

fn is_public_page(path: &str) -> bool {
    PUBLIC_PAGES.contains(&path)
        || PUBLIC_PAGE_PREFIXES.iter().any(|prefix| {
            path.strip_prefix(prefix)
                .map(|rest| rest.starts_with('/'))
                .unwrap_or(false)
        })
}

fn is_public_api(path: &str) -> bool {
    PUBLIC_API_ROUTES.contains(&path)
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Pure routing policy over `(authenticated, path)`.
pub fn classify(authenticated: bool, path: &str) -> GateDecision {
    let path = normalize(path);
    let public_page = is_public_page(path);

    if authenticated {
        if public_page && path != LANDING_ROUTE {
            GateDecision::RedirectToLanding
        } else {
            GateDecision::Proceed
        }
    } else if public_page || is_public_api(path) {
        GateDecision::Proceed
    } else {
        GateDecision::RedirectToSignIn
    }
}

pub async fn access_gate_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_bypassed(&path) {
        return next.run(request).await;
    }

    let caller = match session_token(request.headers()) {
        Some(token) => match auth.identity.verify(&token).await {
            Ok(caller) => Some(caller),
            Err(e) => {
                // An invalid token is the same as no token.
                tracing::debug!(error = %e, path = %path, "Session token rejected");
                None
            }
        },
        None => None,
    };

    match classify(caller.is_some(), &path) {
        GateDecision::Proceed => {
            if let Some(caller) = caller {
                tracing::debug!(user_id = %caller.user_id, "Caller authenticated");
                request.extensions_mut().insert::<Caller>(caller);
            }
            next.run(request).await
        }
        GateDecision::RedirectToLanding => Redirect::to(LANDING_ROUTE).into_response(),
        GateDecision::RedirectToSignIn if is_api_path(&path) => {
            HttpAppError(AppError::Unauthorized("Not authenticated".to_string())).into_response()
        }
        GateDecision::RedirectToSignIn => Redirect::to(SIGN_IN_ROUTE).into_response(),
    }
}
