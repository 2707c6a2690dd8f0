mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use portfolio_api_rust::auth::{issue_token, SessionClaims};
use portfolio_api_rust::{app, AppState};

#[tokio::test]
async fn health_is_public() -> Result<()> {
    let (router, _) = common::test_app(None);

    let res = common::send(&router, common::get("/health")).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], json!(true));
    assert_eq!(res.body["data"]["status"], json!("ok"));
    assert_eq!(res.body["data"]["cache_entries"], json!(0));
    Ok(())
}

#[tokio::test]
async fn root_is_public() -> Result<()> {
    let (router, _) = common::test_app(None);

    let res = common::send(&router, common::get("/")).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["name"], json!("Portfolio API (Rust)"));
    Ok(())
}

#[tokio::test]
async fn protected_route_without_credentials_is_401() -> Result<()> {
    let (router, _) = common::test_app(None);

    let res = common::send(&router, common::get("/api/auth/whoami")).await?;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.body,
        json!({"error": true, "message": "Authentication required", "code": "UNAUTHORIZED"})
    );
    Ok(())
}

#[tokio::test]
async fn rejected_and_failing_tokens_are_401() -> Result<()> {
    let (router, _) = common::test_app(None);

    for token in ["unknown-token", common::BROKEN_TOKEN, "   "] {
        let res = common::send(&router, common::get_with_token("/api/auth/whoami", token)).await?;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "token {:?}", token);
    }
    Ok(())
}

#[tokio::test]
async fn valid_token_resolves_identity() -> Result<()> {
    let (router, _) = common::test_app(None);

    let res = common::send(&router, common::get_with_token("/api/auth/whoami", common::ADMIN_TOKEN)).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["scheme"], json!("OAuth2"));
    assert_eq!(res.body["data"]["name"], json!("root"));
    assert_eq!(res.body["data"]["email"], json!("root@example.com"));
    assert_eq!(res.body["data"]["is_admin"], json!(true));
    Ok(())
}

#[tokio::test]
async fn scheme_match_is_case_insensitive() -> Result<()> {
    let (router, _) = common::test_app(None);
    let request = Request::builder()
        .uri("/api/auth/whoami")
        .header("authorization", format!("BEARER   {}  ", common::VALID_TOKEN))
        .body(Body::empty())?;

    let res = common::send(&router, request).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["name"], json!("ada"));
    Ok(())
}

#[tokio::test]
async fn session_jwt_is_accepted_when_configured() -> Result<()> {
    let mut config = common::test_config(None);
    config.auth.jwt_secret = Some("local-signing-key".to_string());
    let state: AppState = common::test_state(&config);
    let router = app(state, &config.security);

    let claims = SessionClaims::new(
        uuid::Uuid::new_v4(),
        "grace@example.com".to_string(),
        "grace".to_string(),
        false,
        chrono::Duration::minutes(10),
    );
    let token = issue_token(&claims, "local-signing-key")?;

    let res = common::send(&router, common::get_with_token("/api/auth/whoami", &token)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["scheme"], json!("Jwt"));
    assert_eq!(res.body["data"]["user_id"], json!(claims.sub.to_string()));

    // Opaque tokens still go through introspection
    let res = common::send(&router, common::get_with_token("/api/auth/whoami", common::VALID_TOKEN)).await?;
    assert_eq!(res.body["data"]["scheme"], json!("OAuth2"));
    Ok(())
}

#[tokio::test]
async fn security_headers_on_every_response() -> Result<()> {
    let (router, _) = common::test_app(None);

    for uri in ["/health", "/api/auth/whoami", "/api/technews"] {
        let res = common::send(&router, common::get(uri)).await?;
        assert_eq!(res.headers["x-content-type-options"], "nosniff", "{}", uri);
        assert_eq!(res.headers["cross-origin-resource-policy"], "same-origin", "{}", uri);
    }
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_authenticate_independently() -> Result<()> {
    let (router, _) = common::test_app(None);

    let requests = (0..16).map(|i| {
        let router = router.clone();
        async move {
            let token = if i % 2 == 0 { common::VALID_TOKEN } else { "nope" };
            common::send(&router, common::get_with_token("/api/auth/whoami", token)).await
        }
    });

    let responses = futures::future::join_all(requests).await;
    for (i, res) in responses.into_iter().enumerate() {
        let expected = if i % 2 == 0 { StatusCode::OK } else { StatusCode::UNAUTHORIZED };
        assert_eq!(res?.status, expected);
    }
    Ok(())
}
