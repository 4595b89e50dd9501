//! Request authentication.
//!
//! The account gateway authenticates itself with a pre-shared key (constant-time
//! comparison) and forwards the signed-in user in identity headers.

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::models::{to_email_address, Identity, UserProfile, USERS_COLLECTION};
use crate::AppState;

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the signed-in user's email (or bare user name).
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Header flagging the signed-in user as an admin.
pub const USER_ADMIN_HEADER: &str = "x-user-admin";

/// PSK authentication layer function that takes the expected PSK as a parameter.
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    // If no PSK is configured, allow all requests (dev mode)
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        });

    let verdict = match provided {
        Some(key) if constant_time_compare(key, &expected) => Ok(()),
        Some(_) => Err("Invalid API key"),
        None => Err("Missing or invalid API key"),
    };

    match verdict {
        Ok(()) => next.run(request).await,
        Err(message) => unauthorized_response(message),
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}

/// The signed-in user, if the gateway forwarded one.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Identity>);

impl CurrentUser {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(mut identity) = identity_from_headers(&parts.headers) else {
            return Ok(CurrentUser(None));
        };

        // A stored profile outranks whatever the headers claim
        if let Some(doc) = state
            .docs
            .query_by_field(USERS_COLLECTION, "email", &identity.email)
            .await?
        {
            let profile: UserProfile = serde_json::from_value(doc.body)?;
            if let Some(is_admin) = profile.is_admin {
                identity.is_admin = is_admin;
            }
            identity.display_name = profile.display_name;
        }

        Ok(CurrentUser(Some(identity)))
    }
}

/// Read the forwarded identity headers. No email header means no identity.
pub fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let username = headers
        .get(USER_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())?;

    let is_admin = headers
        .get(USER_ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false);

    Some(Identity {
        email: to_email_address(username),
        display_name: None,
        is_admin,
    })
}
