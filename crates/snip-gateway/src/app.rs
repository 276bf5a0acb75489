use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, health_handler,
    list_links_handler, update_link_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/shorts",
                get(list_links_handler).post(create_link_handler),
            )
            .route(
                "/shorts/{key}",
                get(get_link_handler)
                    .put(update_link_handler)
                    .delete(delete_link_handler),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
