//! HTTP Basic authentication extractors.
//!
//! Every protected route resolves the caller from the `Authorization` header
//! on each request; no session or token is issued.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    dao::models::UserRecord,
    error::{AppError, ServiceError},
    services::authz::{self, Principal},
    state::SharedState,
};

/// Authenticated, active caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

impl CurrentUser {
    pub fn principal(&self) -> Principal {
        Principal::from(&self.0)
    }
}

impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        let (email, password) = basic_credentials(&parts.headers)?;
        let user = state
            .users()
            .authenticate(&email, &password)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| AppError::Unauthorized("incorrect email or password".into()))?;

        if !state.users().is_active(&user) {
            return Err(ServiceError::Forbidden("inactive user".into()).into());
        }
        Ok(Self(user))
    }
}

/// Authenticated, active superuser.
#[derive(Debug, Clone)]
pub struct CurrentSuperuser(pub UserRecord);

impl CurrentSuperuser {
    pub fn principal(&self) -> Principal {
        Principal::from(&self.0)
    }
}

impl FromRequestParts<SharedState> for CurrentSuperuser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        authz::ensure_superuser(&Principal::from(&user))?;
        Ok(Self(user))
    }
}

/// Decode `Authorization: Basic base64(email:password)`.
fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing credentials".into()))?;

    let encoded = match value.split_once(' ') {
        Some((scheme, encoded)) if scheme.eq_ignore_ascii_case("basic") => encoded.trim(),
        _ => return Err(AppError::Unauthorized("expected basic credentials".into())),
    };

    let decoded = STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| AppError::Unauthorized("malformed basic credentials".into()))?;

    let (email, password) = decoded
        .split_once(':')
        .ok_or_else(|| AppError::Unauthorized("malformed basic credentials".into()))?;
    Ok((email.to_owned(), password.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_basic_credentials_are_decoded() {
        let encoded = STANDARD.encode("ana@example.com:pa:ss");
        let (email, password) = basic_credentials(&headers(&format!("Basic {encoded}"))).unwrap();
        assert_eq!(email, "ana@example.com");
        assert_eq!(password, "pa:ss");
    }

    #[test]
    fn test_other_schemes_and_garbage_are_rejected() {
        assert!(basic_credentials(&HeaderMap::new()).is_err());
        assert!(basic_credentials(&headers("Bearer abc")).is_err());
        assert!(basic_credentials(&headers("Basic !!!")).is_err());
        let no_colon = STANDARD.encode("ana@example.com");
        assert!(basic_credentials(&headers(&format!("Basic {no_colon}"))).is_err());
    }
}
