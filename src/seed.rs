use tracing::{debug, info};

use crate::{error::AppResult, models::NewMovie, repository::MovieRepository};

const CATALOGUE: &[(&str, Option<i32>, &str, f64, &str)] = &[
    ("The Shawshank Redemption", Some(1994), "Drama", 9.3, "https://www.netflix.com/title/70005379"),
    ("The Godfather", Some(1972), "Crime", 9.2, "https://www.paramountplus.com/movies/the-godfather/"),
    ("The Dark Knight", Some(2008), "Action", 9.0, "https://www.max.com/movies/dark-knight"),
    ("Pulp Fiction", Some(1994), "Crime", 8.9, "https://www.primevideo.com/detail/pulp-fiction"),
    ("Spirited Away", Some(2001), "Animation", 8.6, "https://www.max.com/movies/spirited-away"),
    ("Groundhog Day", Some(1993), "Comedy", 8.0, "https://www.netflix.com/title/359938"),
    ("Parasite", Some(2019), "Thriller", 8.5, "https://www.hulu.com/movie/parasite"),
    ("Amelie", Some(2001), "Romance", 8.3, "https://www.primevideo.com/detail/amelie"),
];

pub fn catalogue() -> Vec<NewMovie> {
    CATALOGUE
        .iter()
        .map(|&(name, year, genre, rating, link)| NewMovie {
            name: name.to_string(),
            year,
            genre: genre.to_string(),
            rating,
            streaming_link: link.to_string(),
        })
        .collect()
}

/// Loads `movies` into the store if, and only if, it is empty.
/// Returns the number of movies inserted.
pub async fn seed_if_empty(repo: &MovieRepository, movies: Vec<NewMovie>) -> AppResult<usize> {
    let existing = repo.count().await?;
    if existing > 0 {
        debug!(existing, "store already populated, skipping seed");
        return Ok(0);
    }

    let inserted = movies.len();
    repo.insert_many(movies).await?;
    info!(inserted, "seeded movie collection");
    Ok(inserted)
}
