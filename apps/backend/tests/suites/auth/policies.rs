//! Owner-or-admin and admin policies as seen through real routes.

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use serde_json::json;

use crate::common::expect_json;
use crate::support::{bearer, build_test_state, create_test_app, seed_user};

#[actix_web::test]
async fn owner_can_read_own_profile() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let owner = seed_user(&state, false).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}", owner.id))
        .insert_header(bearer(&owner.token))
        .to_request();
    let body = expect_json(test::call_service(&app, req).await, 200).await;
    assert_eq!(body["id"].as_i64(), Some(owner.id));
    Ok(())
}

#[actix_web::test]
async fn stranger_cannot_touch_another_user() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let owner = seed_user(&state, false).await?;
    let stranger = seed_user(&state, false).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}", owner.id))
        .insert_header(bearer(&stranger.token))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::FORBIDDEN,
        "FORBIDDEN",
        None,
    )
    .await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/users/update/{}", owner.id))
        .insert_header(bearer(&stranger.token))
        .set_json(json!({ "username": "hijacked" }))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::FORBIDDEN,
        "FORBIDDEN",
        None,
    )
    .await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/delete/{}", owner.id))
        .insert_header(bearer(&stranger.token))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::FORBIDDEN,
        "FORBIDDEN",
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn admin_can_act_on_any_user() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let owner = seed_user(&state, false).await?;
    let admin = seed_user(&state, true).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}", owner.id))
        .insert_header(bearer(&admin.token))
        .to_request();
    expect_json(test::call_service(&app, req).await, 200).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/delete/{}", owner.id))
        .insert_header(bearer(&admin.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[actix_web::test]
async fn admin_routes_reject_regular_users() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state, false).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/all")
        .insert_header(bearer(&user.token))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::FORBIDDEN,
        "FORBIDDEN",
        None,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/products/create")
        .insert_header(bearer(&user.token))
        .set_json(json!({ "title": "x" }))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::FORBIDDEN,
        "FORBIDDEN",
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn authorization_uses_token_claims_not_current_rows(
) -> Result<(), Box<dyn std::error::Error>> {
    // A token minted while the user was an admin keeps admin rights until it
    // expires, even after the row changes.
    let state = build_test_state().await?;
    let admin = seed_user(&state, true).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/users/update/{}", admin.id))
        .insert_header(bearer(&admin.token))
        .set_json(json!({ "isAdmin": false }))
        .to_request();
    let body = expect_json(test::call_service(&app, req).await, 200).await;
    assert_eq!(body["isAdmin"], false);

    let req = test::TestRequest::get()
        .uri("/api/v1/users/all")
        .insert_header(bearer(&admin.token))
        .to_request();
    expect_json(test::call_service(&app, req).await, 200).await;
    Ok(())
}
