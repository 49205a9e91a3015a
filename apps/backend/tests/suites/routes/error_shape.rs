use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use storefront_backend::middleware::request_trace::REQUEST_ID_HEADER;
use storefront_backend::state::security_config::SecurityConfig;
use storefront_backend::AppState;

use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn auth_errors_carry_trace_ids_and_challenge() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/api/v1/users/all").to_request();
    let resp = test::call_service(&app, req).await;

    let request_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("request id header");
    assert_eq!(
        resp.headers().get(header::WWW_AUTHENTICATE).and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );

    let problem =
        assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", None).await;
    assert_eq!(problem.trace_id, request_id);
    assert_eq!(problem.title, "Unauthenticated");
    Ok(())
}

#[actix_web::test]
async fn malformed_json_is_400() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/v1/users/create")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"email\": ")
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "BAD_REQUEST",
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn missing_database_is_503() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::without_db(SecurityConfig::for_tests());
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/api/v1/products/all").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get(header::RETRY_AFTER).and_then(|v| v.to_str().ok()),
        Some("1")
    );
    assert_problem_details(resp, StatusCode::SERVICE_UNAVAILABLE, "DB_UNAVAILABLE", None).await;
    Ok(())
}
