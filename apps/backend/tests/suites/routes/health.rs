use actix_web::http::header;
use actix_web::test;
use storefront_backend::state::security_config::SecurityConfig;
use storefront_backend::AppState;

use crate::common::expect_json;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn root_greets() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"Hello world");
    Ok(())
}

#[actix_web::test]
async fn health_reports_database_and_migrations() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    let body = expect_json(resp, 200).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body["migrations"].is_string());
    assert!(body.get("db_error").is_none());
    Ok(())
}

#[actix_web::test]
async fn health_without_database_still_answers() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(AppState::without_db(SecurityConfig::for_tests()))
        .with_prod_routes()
        .build()
        .await?;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    let body = expect_json(resp, 200).await;
    assert_eq!(body["db"], "unavailable");
    Ok(())
}
