//! Movie metadata provider abstraction
//!
//! The recommendation pipeline and the browse endpoints only see this trait,
//! so the TMDB client can be swapped for a fake in tests.
use std::sync::Arc;
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{
        DiscoverFilter, Keyword, MovieDetails, MovieId, MovieList, MoviePage, MovieSummary,
        Person, PersonCredits, PersonDetails, PersonId, Review, Video,
    },
};

pub mod tmdb;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Full details for one movie, genre objects and top-billed cast included
    async fn movie_details(&self, movie_id: MovieId) -> AppResult<MovieDetails>;

    /// First page of movies recommended alongside `movie_id`
    async fn similar_movies(&self, movie_id: MovieId) -> AppResult<Vec<MovieSummary>>;

    /// First page of title search results
    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    async fn movie_list(&self, list: MovieList) -> AppResult<Vec<MovieSummary>>;

    /// One page of a filtered discover listing; `page` must be in `1..=500`
    async fn discover(&self, filter: DiscoverFilter, page: u32) -> AppResult<MoviePage>;

    async fn movie_videos(&self, movie_id: MovieId) -> AppResult<Vec<Video>>;

    async fn movie_reviews(&self, movie_id: MovieId) -> AppResult<Vec<Review>>;

    async fn movie_keywords(&self, movie_id: MovieId) -> AppResult<Vec<Keyword>>;

    /// First page of people search results
    async fn search_people(&self, query: &str) -> AppResult<Vec<Person>>;

    async fn person_details(&self, person_id: PersonId) -> AppResult<PersonDetails>;

    /// Movies a person appeared in or worked on
    async fn person_movie_credits(&self, person_id: PersonId) -> AppResult<PersonCredits>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Looks up details for many movies concurrently
///
/// Results come back in input order. A failed lookup yields `None` in its slot
/// and is logged; it never affects the other lookups.
#[instrument(skip(provider, movie_ids), fields(provider = provider.name(), count = movie_ids.len()))]
pub async fn fetch_details_batch(
    provider: Arc<dyn MetadataProvider>,
    movie_ids: Vec<MovieId>,
) -> Vec<Option<MovieDetails>> {
    let mut tasks = Vec::with_capacity(movie_ids.len());

    for movie_id in movie_ids {
        let provider = provider.clone();
        let task = tokio::spawn(async move { (movie_id, provider.movie_details(movie_id).await) });
        tasks.push(task);
    }

    let mut results = Vec::with_capacity(tasks.len());
    let mut error_count = 0usize;

    for task in tasks {
        match task.await {
            Ok((_, Ok(details))) => results.push(Some(details)),
            Ok((movie_id, Err(e))) => {
                tracing::error!(movie_id, error = %e, "Detail lookup failed");
                error_count += 1;
                results.push(None);
            }
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                error_count += 1;
                results.push(None);
            }
        }
    }

    if error_count > 0 {
        tracing::warn!(
            success_count = results.len() - error_count,
            error_count,
            "Partial detail lookup failure"
        );
    }

    results
}

/// Fetches similar movies for many seeds concurrently and flattens them in seed order
///
/// A failed seed contributes nothing and is logged.
#[instrument(skip(provider, seeds), fields(provider = provider.name(), seeds = seeds.len()))]
pub async fn fetch_similar_batch(
    provider: Arc<dyn MetadataProvider>,
    seeds: Vec<MovieId>,
) -> Vec<MovieSummary> {
    let mut tasks = Vec::with_capacity(seeds.len());

    for seed in seeds {
        let provider = provider.clone();
        let task = tokio::spawn(async move { (seed, provider.similar_movies(seed).await) });
        tasks.push(task);
    }

    let mut movies = Vec::new();
    let mut error_count = 0usize;

    for task in tasks {
        match task.await {
            Ok((_, Ok(similar))) => movies.extend(similar),
            Ok((seed, Err(e))) => {
                tracing::error!(seed, error = %e, "Similar movies fetch failed for seed");
                error_count += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                error_count += 1;
            }
        }
    }

    if error_count > 0 {
        tracing::warn!(
            collected = movies.len(),
            error_count,
            "Partial similar movies fetch failure"
        );
    }

    movies
}
