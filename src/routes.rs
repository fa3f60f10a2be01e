use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::info;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Ack, Movie, MovieId, MovieInput, MovieUpdate, SearchQuery},
};

pub const WELCOME: &str = "Welcome to Movie Database Server";

pub async fn index() -> &'static str {
    WELCOME
}

pub async fn list_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Movie>>> {
    Ok(Json(state.movies.list().await?))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    let id: MovieId = id.parse()?;
    let movie = state.movies.find(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(movie))
}

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let term = query.q.unwrap_or_default();
    Ok(Json(state.movies.search(&term).await?))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(input) = payload?;
    let movie = state.movies.insert(input.validate()?).await?;
    info!(id = movie.id, name = %movie.name, "movie created");
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<MovieUpdate>, JsonRejection>,
) -> AppResult<Json<Ack>> {
    let id: MovieId = id.parse()?;
    let Json(update) = payload?;
    let update = update.validate()?;

    if !state.movies.update(id, update).await? {
        return Err(AppError::NotFound);
    }
    info!(%id, "movie updated");
    Ok(Json(Ack::new("Movie updated successfully")))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Ack>> {
    let id: MovieId = id.parse()?;
    if !state.movies.delete(id).await? {
        return Err(AppError::NotFound);
    }
    info!(%id, "movie deleted");
    Ok(Json(Ack::new("Movie deleted successfully")))
}
