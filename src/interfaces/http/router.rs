use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

use super::handlers::{groups, health, students};

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route(
            "/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/students/:id",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route(
            "/groups",
            get(groups::list_groups).post(groups::create_group),
        )
        .route(
            "/groups/:id",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
