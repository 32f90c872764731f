//! Fixtures shared by unit tests
use chrono::Utc;

use crate::models::{MovieDetails, MovieId, MovieSummary, UserListEntry, UserRating, WatchStatus};

pub fn summary(id: MovieId) -> MovieSummary {
    MovieSummary {
        id,
        title: format!("Movie {}", id),
        overview: None,
        release_date: None,
        vote_average: 7.0,
        vote_count: 100,
        genre_ids: vec![],
        poster_path: None,
        backdrop_path: None,
        poster_url: None,
        backdrop_url: None,
        recommendation_score: None,
    }
}

pub fn details(id: MovieId) -> MovieDetails {
    MovieDetails {
        summary: summary(id),
        runtime: Some(100),
        tagline: None,
        genres: vec![],
        cast: vec![],
    }
}

pub fn rated_entry(movie_id: MovieId, score: Option<u8>) -> UserListEntry {
    UserListEntry {
        movie_id,
        movie: None,
        rating: score.map(|s| UserRating {
            status: WatchStatus::Completed,
            score: Some(s),
            note: String::new(),
            date_added: Utc::now(),
        }),
        added_at: Utc::now(),
        version: 0,
    }
}
