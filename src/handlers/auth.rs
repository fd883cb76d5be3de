use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::{auth_middleware, CurrentAgent};
use crate::middleware::rate_limit::login_rate_limit_middleware;
use crate::models::agent::Agent;
use crate::models::auth::*;
use crate::validation::is_valid_email;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::Json,
    routing::{get, post},
    Router,
};
use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::json;
use std::sync::Arc;

pub fn auth_routes() -> Router {
    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .layer(axum::middleware::from_fn(login_rate_limit_middleware));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .layer(axum::middleware::from_fn(auth_middleware));

    public_routes.merge(protected_routes)
}

async fn login(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(payload) = payload?;

    if !is_valid_email(payload.email.trim()) {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("Password is required".to_string()));
    }

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let agent = state
        .store
        .get_agent_by_email(payload.email.trim())
        .await
        .ok_or_else(invalid)?;

    if !verify(&payload.password, &agent.password_hash)? {
        tracing::warn!(agent_id = agent.id, "login rejected: wrong password");
        return Err(invalid());
    }

    let agent = state
        .store
        .update_agent_status(agent.id, true)
        .await
        .ok_or_else(invalid)?;

    let token = generate_jwt_token(&agent, &state.config)?;
    tracing::info!(agent_id = agent.id, "agent logged in");

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        agent: AgentResponse::from(agent),
    }))
}

async fn logout(
    Extension(state): Extension<Arc<AppState>>,
    current: CurrentAgent,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .store
        .update_agent_status(current.id, false)
        .await
        .ok_or_else(|| ApiError::NotFound("Agent not found".to_string()))?;

    tracing::info!(agent_id = current.id, "agent logged out");

    Ok(Json(json!({
        "success": true,
        "message": "Logged out successfully"
    })))
}

async fn me(
    Extension(state): Extension<Arc<AppState>>,
    current: CurrentAgent,
) -> ApiResult<Json<AgentResponse>> {
    let agent = state
        .store
        .get_agent(current.id)
        .await
        .ok_or_else(|| ApiError::NotFound("Agent not found".to_string()))?;

    Ok(Json(AgentResponse::from(agent)))
}

pub fn generate_jwt_token(agent: &Agent, config: &Config) -> ApiResult<String> {
    let now = Utc::now();
    let out_of_range = || {
        ApiError::Internal(format!(
            "token lifetime of {} hours is out of range",
            config.jwt_ttl_hours
        ))
    };

    let expiration = Duration::try_hours(config.jwt_ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(out_of_range)?;
    let exp = usize::try_from(expiration.timestamp()).map_err(|_| out_of_range())?;
    let iat = usize::try_from(now.timestamp()).map_err(|_| out_of_range())?;

    let claims = Claims {
        sub: agent.id.to_string(),
        email: agent.email.clone(),
        name: agent.name.clone(),
        exp,
        iat,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )?;
    Ok(token)
}

pub fn verify_jwt_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, send, test_app, test_config, OFFLINE_AGENT, ONLINE_AGENT};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_login_success_sets_agent_online() {
        let (app, state) = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": OFFLINE_AGENT, "password": "password123" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["agent"]["email"], OFFLINE_AGENT);
        assert_eq!(body["agent"]["isOnline"], true);
        assert!(body["agent"].get("passwordHash").is_none());
        assert!(state.store.get_agent(2).await.unwrap().is_online);

        let claims = verify_jwt_token(body["token"].as_str().unwrap(), "test-secret").unwrap();
        assert_eq!(claims.sub, "2");
        assert_eq!(claims.name, "Trần Văn Bình");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_401_and_stays_offline() {
        let (app, state) = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": OFFLINE_AGENT, "password": "wrong" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert!(!state.store.get_agent(2).await.unwrap().is_online);
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_401() {
        let (app, _) = test_app().await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@company.com", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_validation_errors_are_400() {
        let (app, _) = test_app().await;

        for body in [
            json!({ "email": "not-an-email", "password": "x" }),
            json!({ "email": ONLINE_AGENT, "password": "" }),
            json!({ "email": ONLINE_AGENT }),
        ] {
            let (status, _) = send(&app, Method::POST, "/api/auth/login", None, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_logout_sets_agent_offline() {
        let (app, state) = test_app().await;
        let token = test_support::login(&app, ONLINE_AGENT).await;

        let (status, body) = send(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(!state.store.get_agent(1).await.unwrap().is_online);
    }

    #[tokio::test]
    async fn test_me_returns_current_agent() {
        let (app, _) = test_app().await;
        let token = test_support::login(&app, ONLINE_AGENT).await;

        let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "Nguyễn Thị An");
        assert_eq!(body["isOnline"], true);
    }

    #[tokio::test]
    async fn test_protected_routes_reject_bad_tokens() {
        let (app, state) = test_app().await;

        let (status, _) = send(&app, Method::GET, "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::GET, "/api/auth/me", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let agent = state.store.get_agent(1).await.unwrap();
        let foreign = generate_jwt_token(
            &agent,
            &Config {
                jwt_secret: "another-secret".to_string(),
                ..test_config()
            },
        )
        .unwrap();
        let (status, _) = send(&app, Method::GET, "/api/auth/me", Some(&foreign), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let (app, state) = test_app().await;
        let agent = state.store.get_agent(1).await.unwrap();

        let expired = generate_jwt_token(
            &agent,
            &Config {
                jwt_ttl_hours: -2,
                ..test_config()
            },
        )
        .unwrap();

        let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&expired), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_is_an_error_not_a_panic() {
        let (_, state) = test_app().await;
        let agent = state.store.get_agent(1).await.unwrap();

        for jwt_ttl_hours in [10_000_000_000_000, i64::MAX, -1_000_000_000, i64::MIN] {
            let result = generate_jwt_token(
                &agent,
                &Config {
                    jwt_ttl_hours,
                    ..test_config()
                },
            );
            assert!(
                matches!(result, Err(ApiError::Internal(_))),
                "ttl {} produced a token",
                jwt_ttl_hours
            );
        }
    }

    #[tokio::test]
    async fn test_login_is_rate_limited() {
        let state = Arc::new(
            AppState::initialize(Config {
                login_rate_limit: 2,
                ..test_config()
            })
            .await
            .unwrap(),
        );
        let app = crate::build_router(state);
        let body = json!({ "email": ONLINE_AGENT, "password": "wrong" });

        for _ in 0..2 {
            let (status, _) = send(&app, Method::POST, "/api/auth/login", None, Some(body.clone())).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
        let (status, _) = send(&app, Method::POST, "/api/auth/login", None, Some(body)).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }
}
