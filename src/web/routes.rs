// storefront/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, expedition_handlers, order_handlers, product_handlers};

// A simple liveness probe. In a real deployment this might also check DB
// connectivity.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Product Routes
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
          .route("/{product_id}/stock", web::put().to(product_handlers::set_stock_handler)),
      )
      // Cart Routes
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::view_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/items/{product_id}", web::delete().to(cart_handlers::remove_cart_item_handler)),
      )
      // Expedition Service Routes
      .service(
        web::scope("/expeditions")
          .route("", web::get().to(expedition_handlers::list_expeditions_handler))
          .route("", web::post().to(expedition_handlers::create_expedition_handler))
          .route("/{expedition_id}", web::get().to(expedition_handlers::get_expedition_handler)),
      )
      // Order (Transaction) Routes
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::create_order_handler))
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/simulate-payment", web::post().to(order_handlers::simulate_payment_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
          .route("/{order_id}/status", web::put().to(order_handlers::update_order_status_handler))
          .route(
            "/{order_id}/expedition",
            web::put().to(order_handlers::reassign_expedition_handler),
          ),
      ),
  );
}
