use std::future::Future;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::warn;

use crate::{
    entities::movie,
    error::AppResult,
    models::{Movie, MovieId, MovieUpdate, NewMovie},
};

/// Handle on the movie collection. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct MovieRepository {
    db: DatabaseConnection,
}

impl MovieRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<Movie>> {
        let rows = retry_once("list", || {
            movie::Entity::find().order_by_asc(movie::Column::Id).all(&self.db)
        })
        .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn find(&self, id: MovieId) -> AppResult<Option<Movie>> {
        let row = retry_once("find", || movie::Entity::find_by_id(id.get()).one(&self.db)).await?;
        Ok(row.map(Movie::from))
    }

    /// Case-insensitive substring match on `name`, folded with Unicode
    /// lowercasing. An empty term matches all.
    pub async fn search(&self, term: &str) -> AppResult<Vec<Movie>> {
        let needle = term.to_lowercase();
        let mut movies = self.list().await?;
        movies.retain(|m| m.name.to_lowercase().contains(&needle));
        Ok(movies)
    }

    pub async fn insert(&self, new: NewMovie) -> AppResult<Movie> {
        // never retried
        let model = into_active_model(new).insert(&self.db).await?;
        Ok(Movie::from(model))
    }

    pub async fn insert_many(&self, movies: Vec<NewMovie>) -> AppResult<()> {
        if movies.is_empty() {
            return Ok(());
        }
        movie::Entity::insert_many(movies.into_iter().map(into_active_model))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Overwrites the supplied fields. Returns `false` when no movie has `id`.
    pub async fn update(&self, id: MovieId, update: MovieUpdate) -> AppResult<bool> {
        if update.is_empty() {
            return Ok(self.find(id).await?.is_some());
        }

        let mut changes = movie::ActiveModel { ..Default::default() };
        if let Some(name) = update.name {
            changes.name = Set(name);
        }
        if let Some(year) = update.year {
            changes.year = Set(Some(year));
        }
        if let Some(genre) = update.genre {
            changes.genre = Set(genre);
        }
        if let Some(rating) = update.rating {
            changes.rating = Set(rating);
        }
        if let Some(link) = update.streaming_link {
            changes.streaming_link = Set(link);
        }

        let res = retry_once("update", || {
            movie::Entity::update_many()
                .set(changes.clone())
                .filter(movie::Column::Id.eq(id.get()))
                .exec(&self.db)
        })
        .await?;
        Ok(res.rows_affected > 0)
    }

    /// Returns `false` when no movie has `id`.
    pub async fn delete(&self, id: MovieId) -> AppResult<bool> {
        let res =
            retry_once("delete", || movie::Entity::delete_by_id(id.get()).exec(&self.db)).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn count(&self) -> AppResult<u64> {
        Ok(retry_once("count", || movie::Entity::find().count(&self.db)).await?)
    }
}

fn into_active_model(new: NewMovie) -> movie::ActiveModel {
    movie::ActiveModel {
        id: Default::default(),
        name: Set(new.name),
        year: Set(new.year),
        genre: Set(new.genre),
        rating: Set(new.rating),
        streaming_link: Set(new.streaming_link),
    }
}

/// Runs an idempotent store operation, retrying once on a connection failure.
async fn retry_once<T, F, Fut>(op: &'static str, mut run: F) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    match run().await {
        Err(err) if is_transient(&err) => {
            warn!(op, error = %err, "store connection failed, retrying once");
            run().await
        }
        res => res,
    }
}

fn is_transient(err: &DbErr) -> bool {
    matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sea_orm::{ConnAcquireErr, RuntimeErr};

    use super::*;

    #[tokio::test]
    async fn retries_connection_failures_once() {
        let calls = AtomicUsize::new(0);
        let res = retry_once("test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 { Err(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout)) } else { Ok(n) }
            }
        })
        .await;
        assert_eq!(res.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_second_failure() {
        let calls = AtomicUsize::new(0);
        let res: Result<(), DbErr> = retry_once("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbErr::Conn(RuntimeErr::Internal("down".into()))) }
        })
        .await;
        assert!(res.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_other_errors() {
        let calls = AtomicUsize::new(0);
        let res: Result<(), DbErr> = retry_once("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbErr::Custom("bad query".into())) }
        })
        .await;
        assert!(res.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
