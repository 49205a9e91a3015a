use actix_web::web;

pub mod health;
pub mod products;
pub mod users;

/// Register every route. Access control is attached per resource, so the
/// same configuration serves `main` and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root))
        .configure(health::configure_routes)
        .service(
            web::scope("/api/v1")
                .service(web::scope("/users").configure(users::configure_routes))
                .service(web::scope("/products").configure(products::configure_routes)),
        );
}
