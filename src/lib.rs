pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::repository::MovieRepository;

#[derive(Clone)]
pub struct AppState {
    pub movies: MovieRepository,
}

/// Builds the HTTP surface over an already connected and seeded store.
pub fn create_app(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let router = Router::new()
        .route("/", get(routes::index))
        .route("/movies", get(routes::list_movies).post(routes::create_movie))
        .route("/movies/search", get(routes::search_movies))
        .route(
            "/movies/{id}",
            get(routes::get_movie).put(routes::update_movie).delete(routes::delete_movie),
        )
        .with_state(state);

    with_middleware(router, request_timeout)
}

/// Wraps `router` in the timeout, CORS and tracing layers every route is served with.
#[allow(deprecated)]
pub fn with_middleware(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http())
}
