//! Identity cookie handling.
//!
//! Every guarded route passes through [`identity`]: the inbound cookie is
//! resolved to a user (creating and demo-seeding one when needed), the user id
//! is stashed as a request extension, and on the creation paths the cookie is
//! set on the response.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use loreforge_domain::UserId;

use crate::api::http::ApiError;
use crate::app::App;

pub const COOKIE_NAME: &str = "loreforge_user_id";

/// One year, matching the cookie's intended "stable anonymous identity" role.
const COOKIE_MAX_AGE_SECONDS: u64 = 31_536_000;

/// The resolved caller, available to handlers behind the identity middleware.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

pub async fn identity(
    State(app): State<Arc<App>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(token_from_cookie_header);

    let resolution = app.identity.execute(presented).await?;
    request
        .extensions_mut()
        .insert(CurrentUser(resolution.user_id));

    let mut response = next.run(request).await;
    if resolution.issued_cookie {
        response.headers_mut().append(
            header::SET_COOKIE,
            set_cookie_value(resolution.user_id, app.config.cookie_secure)?,
        );
    }
    Ok(response)
}

/// Extract the identity token from a Cookie header. A malformed token is
/// treated as no cookie at all, so the caller just gets a fresh identity.
fn token_from_cookie_header(header: &str) -> Option<UserId> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .and_then(|(_, value)| value.trim().parse().ok())
}

fn set_cookie_value(user_id: UserId, secure: bool) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{COOKIE_NAME}={user_id}; Max-Age={COOKIE_MAX_AGE_SECONDS}; Path=/; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Internal(format!("set-cookie header: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_among_other_cookies() {
        let user_id = UserId::new();
        let header = format!("theme=dark; loreforge_user_id={user_id}; lang=en");
        assert_eq!(token_from_cookie_header(&header), Some(user_id));
    }

    #[test]
    fn missing_cookie_yields_none() {
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header(""), None);
    }

    #[test]
    fn malformed_token_is_treated_as_absent() {
        assert_eq!(
            token_from_cookie_header("loreforge_user_id=not-a-uuid"),
            None
        );
    }

    #[test]
    fn set_cookie_carries_the_attributes() {
        let user_id = UserId::new();
        let value = set_cookie_value(user_id, false).expect("header value");
        let value = value.to_str().expect("ascii");
        assert!(value.starts_with(&format!("loreforge_user_id={user_id}")));
        assert!(value.contains("Max-Age=31536000"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn secure_flag_is_appended_when_configured() {
        let value = set_cookie_value(UserId::new(), true).expect("header value");
        assert!(value.to_str().expect("ascii").ends_with("; Secure"));
    }
}
