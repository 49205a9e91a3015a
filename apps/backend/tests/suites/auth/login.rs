use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use backend_test_support::unique_helpers::unique_email;
use serde_json::json;
use storefront_backend::verify_access_token;

use crate::common::expect_json;
use crate::support::factory::TEST_PASSWORD;
use crate::support::{build_test_state, create_test_app, seed_user};

#[actix_web::test]
async fn register_then_login_returns_verifiable_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let security = state.security.clone();
    let app = create_test_app(state).with_prod_routes().build().await?;

    let email = unique_email("login");
    let req = test::TestRequest::post()
        .uri("/api/v1/users/create")
        .set_json(json!({
            "email": email,
            "username": "lou",
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let created = expect_json(test::call_service(&app, req).await, 201).await;
    assert!(created.get("password").is_none());
    assert!(created.get("passwordHash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
        .to_request();
    let body = expect_json(test::call_service(&app, req).await, 200).await;

    let token = body["token"].as_str().expect("token should be a string");
    let claims = verify_access_token(token, &security)?;
    assert_eq!(claims.identity.id, created["id"].as_i64().unwrap());
    assert_eq!(claims.identity.email, email);
    assert_eq!(claims.identity.username, "lou");
    assert!(!claims.identity.is_admin);
    assert_eq!(body["user"]["email"], email);
    Ok(())
}

#[actix_web::test]
async fn login_matches_email_case_insensitively() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state, false).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({
            "email": format!("  {}  ", user.email.to_uppercase()),
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let body = expect_json(test::call_service(&app, req).await, 200).await;
    assert_eq!(body["user"]["id"].as_i64(), Some(user.id));
    Ok(())
}

#[actix_web::test]
async fn wrong_password_and_unknown_email_look_the_same() -> Result<(), Box<dyn std::error::Error>>
{
    let state = build_test_state().await?;
    let user = seed_user(&state, false).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({ "email": user.email, "password": "nope" }))
        .to_request();
    let wrong_password = assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
        None,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({ "email": unique_email("ghost"), "password": TEST_PASSWORD }))
        .to_request();
    let unknown = assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
        None,
    )
    .await;

    assert_eq!(wrong_password.detail, unknown.detail);
    Ok(())
}

#[actix_web::test]
async fn login_without_body_is_400() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .insert_header(("content-type", "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, StatusCode::BAD_REQUEST, "BAD_REQUEST", None).await;
    Ok(())
}
