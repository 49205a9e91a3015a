use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use serde_json::json;

use crate::common::expect_json;
use crate::support::{bearer, build_test_state, create_test_app, seed_product, seed_user};

#[actix_web::test]
async fn catalog_listing_is_public() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    seed_product(&state, "sandal").await?;
    seed_product(&state, "loafer").await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/api/v1/products/all").to_request();
    let body = expect_json(test::call_service(&app, req).await, 200).await;

    let titles: Vec<&str> = body
        .as_array()
        .expect("array of products")
        .iter()
        .filter_map(|p| p["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["sandal", "loafer"]);
    Ok(())
}

#[actix_web::test]
async fn admin_manages_the_catalog() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let admin = seed_user(&state, true).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/v1/products/create")
        .insert_header(bearer(&admin.token))
        .set_json(json!({
            "title": "trail runner",
            "description": "grippy",
            "image": "https://img.example.test/trail.png",
            "category": "shoes",
            "quantity": "12",
        }))
        .to_request();
    let created = expect_json(test::call_service(&app, req).await, 201).await;
    assert_eq!(created["inStock"], false);
    let id = created["id"].as_i64().expect("product id");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/products/update/{id}"))
        .insert_header(bearer(&admin.token))
        .set_json(json!({ "inStock": true, "quantity": "11" }))
        .to_request();
    let updated = expect_json(test::call_service(&app, req).await, 200).await;
    assert_eq!(updated["inStock"], true);
    assert_eq!(updated["quantity"], "11");
    assert_eq!(updated["title"], "trail runner");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/products/{id}"))
        .insert_header(bearer(&admin.token))
        .to_request();
    let fetched = expect_json(test::call_service(&app, req).await, 200).await;
    assert_eq!(fetched["quantity"], "11");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/products/delete/{id}"))
        .insert_header(bearer(&admin.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/products/{id}"))
        .insert_header(bearer(&admin.token))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "PRODUCT_NOT_FOUND",
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn create_requires_fields() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let admin = seed_user(&state, true).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/v1/products/create")
        .insert_header(bearer(&admin.token))
        .set_json(json!({ "title": "half a product" }))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        Some("description"),
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn single_product_needs_any_valid_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let id = seed_product(&state, "clog").await?;
    let shopper = seed_user(&state, false).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/products/{id}"))
        .insert_header(bearer(&shopper.token))
        .to_request();
    let body = expect_json(test::call_service(&app, req).await, 200).await;
    assert_eq!(body["title"], "clog");
    assert_eq!(body["category"], "shoes");
    Ok(())
}

#[actix_web::test]
async fn deleting_a_product_unsaves_it() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let id = seed_product(&state, "mule").await?;
    let admin = seed_user(&state, true).await?;
    let shopper = seed_user(&state, false).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/users/update/{}", shopper.id))
        .insert_header(bearer(&shopper.token))
        .set_json(json!({ "savedProducts": [id] }))
        .to_request();
    expect_json(test::call_service(&app, req).await, 200).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/products/delete/{id}"))
        .insert_header(bearer(&admin.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}", shopper.id))
        .insert_header(bearer(&shopper.token))
        .to_request();
    let profile = expect_json(test::call_service(&app, req).await, 200).await;
    assert_eq!(profile["savedProducts"], json!([]));
    Ok(())
}
