use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{entities::movie, error::AppError};

/// Store-generated identifier of a movie, as it appears in request paths.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MovieId(i32);

impl MovieId {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl FromStr for MovieId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::MalformedId);
        }
        match s.parse::<i32>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(AppError::MalformedId),
        }
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub name: String,
    pub year: Option<i32>,
    pub genre: String,
    pub rating: f64,
    pub streaming_link: String,
}

impl From<movie::Model> for Movie {
    fn from(m: movie::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            year: m.year,
            genre: m.genre,
            rating: m.rating,
            streaming_link: m.streaming_link,
        }
    }
}

/// A movie that passed validation and is ready to be stored.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub name: String,
    pub year: Option<i32>,
    pub genre: String,
    pub rating: f64,
    pub streaming_link: String,
}

/// Body of `POST /movies`, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    #[serde(alias = "title")]
    pub name: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub streaming_link: Option<String>,
}

impl MovieInput {
    pub fn validate(self) -> Result<NewMovie, AppError> {
        Ok(NewMovie {
            name: required_text("name", self.name)?,
            year: self.year,
            genre: required_text("genre", self.genre)?,
            rating: valid_rating(self.rating.ok_or_else(|| missing("rating"))?)?,
            streaming_link: required_text("streamingLink", self.streaming_link)?,
        })
    }
}

/// Body of `PUT /movies/{id}`: the subset of fields to overwrite.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieUpdate {
    #[serde(alias = "title")]
    pub name: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub streaming_link: Option<String>,
}

impl MovieUpdate {
    pub fn validate(self) -> Result<Self, AppError> {
        Ok(Self {
            name: self.name.map(|v| required_text("name", Some(v))).transpose()?,
            year: self.year,
            genre: self.genre.map(|v| required_text("genre", Some(v))).transpose()?,
            rating: self.rating.map(valid_rating).transpose()?,
            streaming_link: self
                .streaming_link
                .map(|v| required_text("streamingLink", Some(v)))
                .transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.year.is_none()
            && self.genre.is_none()
            && self.rating.is_none()
            && self.streaming_link.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("{field} is required"))
}

fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    let value = value.ok_or_else(|| missing(field))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}

fn valid_rating(rating: f64) -> Result<f64, AppError> {
    if !rating.is_finite() {
        return Err(AppError::Validation("rating must be a finite number".to_string()));
    }
    Ok(rating)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn input(value: serde_json::Value) -> MovieInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_well_formed_ids() {
        assert_eq!("42".parse::<MovieId>().unwrap().get(), 42);
        assert_eq!("2147483647".parse::<MovieId>().unwrap().get(), i32::MAX);
    }

    #[test]
    fn rejects_malformed_ids() {
        for raw in ["", "0", "-3", "+3", "abc", ":id", "12a", "2147483648", "5eb3e2b091f76a6cae3f4258"] {
            assert!(
                matches!(raw.parse::<MovieId>(), Err(AppError::MalformedId)),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn accepts_complete_movie() {
        let movie = input(json!({
            "name": "  New Movie ",
            "year": 2020,
            "genre": "Comedy",
            "rating": 7,
            "streamingLink": "https://x"
        }))
        .validate()
        .unwrap();

        assert_eq!(movie.name, "New Movie");
        assert_eq!(movie.year, Some(2020));
        assert_eq!(movie.rating, 7.0);
    }

    #[test]
    fn title_is_an_alias_for_name() {
        let movie = input(json!({
            "title": "Old Client",
            "genre": "Drama",
            "rating": 6.5,
            "streamingLink": "https://x"
        }))
        .validate()
        .unwrap();
        assert_eq!(movie.name, "Old Client");
        assert_eq!(movie.year, None);
    }

    #[test]
    fn each_required_field_is_enforced() {
        let full = json!({
            "name": "New Movie",
            "genre": "Comedy",
            "rating": 7.0,
            "streamingLink": "https://x"
        });
        for field in ["name", "genre", "rating", "streamingLink"] {
            let mut body = full.clone();
            body.as_object_mut().unwrap().remove(field);
            let err = input(body).validate().unwrap_err();
            assert!(
                matches!(&err, AppError::Validation(msg) if msg.contains(field)),
                "missing {field} gave {err:?}"
            );
        }
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = input(json!({
            "name": "New Movie",
            "genre": "   ",
            "rating": 7.0,
            "streamingLink": "https://x"
        }))
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn wrongly_typed_fields_do_not_decode() {
        assert!(serde_json::from_value::<MovieInput>(json!({ "year": "invalid" })).is_err());
        assert!(serde_json::from_value::<MovieInput>(json!({ "rating": "high" })).is_err());
    }

    #[test]
    fn update_keeps_only_supplied_fields() {
        let update: MovieUpdate =
            serde_json::from_value(json!({ "year": 2022, "genre": " Drama " })).unwrap();
        let update = update.validate().unwrap();
        assert_eq!(update.year, Some(2022));
        assert_eq!(update.genre.as_deref(), Some("Drama"));
        assert!(update.name.is_none());
        assert!(!update.is_empty());
        assert!(MovieUpdate::default().is_empty());
    }

    #[test]
    fn update_rejects_blank_text() {
        let update: MovieUpdate = serde_json::from_value(json!({ "name": "" })).unwrap();
        assert!(matches!(update.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn movie_serializes_camel_case() {
        let movie = Movie {
            id: 1,
            name: "A".into(),
            year: None,
            genre: "B".into(),
            rating: 5.0,
            streaming_link: "https://x".into(),
        };
        let value = serde_json::to_value(movie).unwrap();
        assert_eq!(value["streamingLink"], "https://x");
        assert!(value["year"].is_null());
    }
}
