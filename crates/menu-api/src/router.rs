//! Route table of the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{attachment, dish, health, menu, public};
use crate::middleware::require_auth;
use crate::state::AppState;

/// Multipart overhead allowed on top of the per-file limit.
const FORM_OVERHEAD: usize = 1024 * 1024;

/// Body limit of the upload route: room for a few files at the per-file maximum,
/// so oversized files are rejected by validation rather than by the transport.
fn upload_body_limit(max_upload_size: u64) -> usize {
    usize::try_from(max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_mul(4)
        .saturating_add(FORM_OVERHEAD)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = upload_body_limit(state.attachments.max_upload_size());

    let private = Router::new()
        .route("/menu", get(menu::list_menus).post(menu::create_menu))
        .route(
            "/menu/{id}",
            get(menu::get_menu)
                .patch(menu::update_menu)
                .delete(menu::delete_menu),
        )
        .route("/dish", get(dish::list_dishes).post(dish::create_dish))
        .route(
            "/dish/add-attachment",
            post(attachment::upload_attachments).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/dish/{id}",
            get(dish::get_dish)
                .patch(dish::update_dish)
                .delete(dish::delete_dish),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/public/menu", get(public::list_public_menus))
        .nest("/api/private", private)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
}
