use axum::routing::get;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/auth", auth_routes())
        .nest("/categories", category_routes())
        .nest("/items", item_routes())
        .nest("/costs", cost_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::category::list_categories,
            handlers::category::create_category
        ))
        .routes(routes!(
            handlers::category::get_category,
            handlers::category::update_category,
            handlers::category::delete_category
        ))
}

fn item_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::item::list_items, handlers::item::create_item))
        // Static segments win over `/{id}` in axum's matcher.
        .routes(routes!(handlers::item::item_stats))
        .routes(routes!(
            handlers::item::get_item,
            handlers::item::update_item,
            handlers::item::delete_item
        ))
}

fn cost_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::cost::create_cost))
        .routes(routes!(handlers::cost::list_costs_for_item))
        .routes(routes!(
            handlers::cost::update_cost,
            handlers::cost::delete_cost
        ))
}
