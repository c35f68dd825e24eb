use super::jwt::{JwtAuth, JwtClaims};
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

pub const ADMIN_ROLE: &str = "Admin";

/// Bearer header first, then the `access_token` cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        cookie
                            .trim()
                            .split_once('=')
                            .filter(|(name, _)| *name == "access_token")
                            .map(|(_, value)| value.to_string())
                    })
                })
        })
        .filter(|t| !t.is_empty())
}

/// Rejects requests without a valid token, otherwise stores the
/// [`JwtClaims`] in the request extensions.
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers()).ok_or_else(|| {
        tracing::debug!("No JWT in Authorization header or cookie");
        AppError::Unauthorized("No token provided".to_string())
    })?;

    let claims = auth.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "JWT verification failed");
        AppError::Unauthorized("Invalid token".to_string())
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Role gate. Must run after [`jwt_auth_middleware`].
pub async fn require_role(
    State(role): State<&'static str>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = request
        .extensions()
        .get::<JwtClaims>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if !claims.has_role(role) {
        tracing::info!(user_id = %claims.sub, required = role, "Role check failed");
        return Err(AppError::Forbidden(format!("{role} role required")));
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for JwtClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("middleware-test-secret-with-enough-length"))
    }

    async fn whoami(claims: JwtClaims) -> String {
        claims.email
    }

    fn app(auth: JwtAuth) -> Router {
        let admin = Router::new()
            .route("/admin", get(whoami))
            .route_layer(from_fn_with_state(ADMIN_ROLE, require_role));

        Router::new()
            .route("/me", get(whoami))
            .merge(admin)
            .route_layer(from_fn_with_state(auth, jwt_auth_middleware))
    }

    fn token(auth: &JwtAuth, roles: &[&str]) -> String {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        auth.issue("1", "ana@playhub.dev", "Ana", &roles).unwrap().token
    }

    #[test]
    fn test_extract_token_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        headers.insert(header::COOKIE, "access_token=xyz".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "theme=dark; access_token=xyz".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_extract_token_missing() {
        assert!(extract_token(&HeaderMap::new()).is_none());
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app(auth())
            .oneshot(Request::get("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_passes_claims() {
        let auth = auth();
        let response = app(auth.clone())
            .oneshot(
                Request::get("/me")
                    .header("authorization", format!("Bearer {}", token(&auth, &["User"])))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let auth = auth();
        let response = app(auth.clone())
            .oneshot(
                Request::get("/admin")
                    .header("authorization", format!("Bearer {}", token(&auth, &["User"])))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_passes_role_gate() {
        let auth = auth();
        let response = app(auth.clone())
            .oneshot(
                Request::get("/admin")
                    .header("authorization", format!("Bearer {}", token(&auth, &["Admin"])))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let response = app(auth())
            .oneshot(
                Request::get("/me")
                    .header("authorization", "Bearer not.a.jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
