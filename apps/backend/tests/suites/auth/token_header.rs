//! Status rules for the `token` header on a protected route.

use std::time::{Duration, SystemTime};

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use storefront_backend::mint_access_token;
use storefront_backend::state::security_config::SecurityConfig;

use crate::support::{bearer, build_test_state, create_test_app, seed_product, seed_user};

#[actix_web::test]
async fn missing_header_is_401() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let product_id = seed_product(&state, "sneaker").await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/products/{product_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", None).await;
    Ok(())
}

#[actix_web::test]
async fn blank_header_counts_as_missing() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/all")
        .insert_header(("token", "   "))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", None).await;
    Ok(())
}

#[actix_web::test]
async fn single_segment_header_is_403() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state, true).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    // A bare token with no scheme prefix has no second segment.
    let req = test::TestRequest::get()
        .uri("/api/v1/users/all")
        .insert_header(("token", user.token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, StatusCode::FORBIDDEN, "INVALID_TOKEN", None).await;
    Ok(())
}

#[actix_web::test]
async fn garbage_token_is_403() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/all")
        .insert_header(bearer("not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, StatusCode::FORBIDDEN, "INVALID_TOKEN", None).await;
    Ok(())
}

#[actix_web::test]
async fn token_signed_with_another_secret_is_403() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state, true).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let other = SecurityConfig::new("a_completely_different_signing_secret");
    let forged = mint_access_token(&user.identity(), SystemTime::now(), &other)?;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/all")
        .insert_header(bearer(&forged))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, StatusCode::FORBIDDEN, "INVALID_TOKEN", None).await;
    Ok(())
}

#[actix_web::test]
async fn expired_token_is_403() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state, true).await?;
    let issued_at = SystemTime::now() - Duration::from_secs(3 * 24 * 60 * 60);
    let stale = mint_access_token(&user.identity(), issued_at, &state.security)?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/all")
        .insert_header(bearer(&stale))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, StatusCode::FORBIDDEN, "INVALID_TOKEN", None).await;
    Ok(())
}

#[actix_web::test]
async fn scheme_word_is_not_checked() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let product_id = seed_product(&state, "boot").await?;
    let user = seed_user(&state, false).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/products/{product_id}"))
        .insert_header(("token", format!("Token {}", user.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[actix_web::test]
async fn authorization_header_is_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state, true).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/all")
        .insert_header(("Authorization", format!("Bearer {}", user.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", None).await;
    Ok(())
}
