pub mod health;
pub mod view;

use axum::Router;
use utoipa::OpenApi;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(view::router())
        .merge(crate::push::server::router())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        view::view_changed,
        view::current_view,
        crate::push::server::subscribe,
    ),
    components(schemas(
        health::HealthResponse,
        view::AckResponse,
        crate::view::View,
    )),
    tags(
        (name = "Health", description = "Health check"),
        (name = "View", description = "Viewport reports from the browser"),
        (name = "Push", description = "Server-sent map commands"),
    )
)]
pub struct ApiDoc;
