//! Basic 认证：单一固定凭据对的校验与中间件。

use axum::body::Body as AxumBody;
use axum::extract::Extension;
use axum::http::{HeaderMap, Request};
use axum::{middleware, response::Response};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::config::{AUTH_PASS, AUTH_USER};
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: AUTH_USER.to_string(),
            password: AUTH_PASS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// 缺少 Authorization 头，或无法按 Basic 解析。
    Malformed,
    /// 用户名或密码不匹配。
    Rejected,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Malformed => f.write_str("authorization header missing or malformed"),
            AuthError::Rejected => f.write_str("credentials rejected"),
        }
    }
}

impl AuthConfig {
    /// 校验请求头中的 Basic 凭据。
    pub fn check(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let Some(basic) = headers.typed_get::<Authorization<Basic>>() else {
            return Err(AuthError::Malformed);
        };
        if basic.username() != self.username || basic.password() != self.password {
            return Err(AuthError::Rejected);
        }
        Ok(())
    }
}

/// 认证中间件：仅挂载在服务根路由上。
pub async fn auth_middleware(
    Extension(auth): Extension<Arc<AuthConfig>>,
    req: Request<AxumBody>,
    next: middleware::Next,
) -> Result<Response, ApiError> {
    if let Err(err) = auth.check(req.headers()) {
        warn!(path = req.uri().path(), error = %err, "authentication failed");
        return Err(err.into());
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    fn basic_header(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn accepts_fixed_credentials() {
        // username2:password2
        let headers = basic_header("Basic dXNlcm5hbWUyOnBhc3N3b3JkMg==");
        assert_eq!(AuthConfig::default().check(&headers), Ok(()));
    }

    #[test]
    fn rejects_wrong_password() {
        // username2:password1
        let headers = basic_header("Basic dXNlcm5hbWUyOnBhc3N3b3JkMQ==");
        assert_eq!(
            AuthConfig::default().check(&headers),
            Err(AuthError::Rejected)
        );
    }

    #[test]
    fn rejects_wrong_username() {
        // username1:password2
        let headers = basic_header("Basic dXNlcm5hbWUxOnBhc3N3b3JkMg==");
        assert_eq!(
            AuthConfig::default().check(&headers),
            Err(AuthError::Rejected)
        );
    }

    #[test]
    fn missing_header_is_malformed() {
        assert_eq!(
            AuthConfig::default().check(&HeaderMap::new()),
            Err(AuthError::Malformed)
        );
    }

    #[test]
    fn non_basic_scheme_is_malformed() {
        let headers = basic_header("Bearer abc.def");
        assert_eq!(
            AuthConfig::default().check(&headers),
            Err(AuthError::Malformed)
        );
    }
}
