//! Content-based recommendations from "similar movies" of seed movies.
//!
//! Seeds are the user's highest-rated list entries, or a random sample of
//! their interaction history when nothing is rated. The similar movies of
//! every seed are merged, stripped of anything the user has already seen,
//! deduplicated and randomly sampled.

use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    db::UserStore,
    error::AppResult,
    models::{MovieId, MovieSummary, UserListEntry},
    services::providers::{fetch_similar_batch, MetadataProvider},
};

pub struct ContentRecommender {
    store: Arc<dyn UserStore>,
    metadata: Arc<dyn MetadataProvider>,
    seed_count: usize,
    limit: usize,
}

impl ContentRecommender {
    pub fn new(
        store: Arc<dyn UserStore>,
        metadata: Arc<dyn MetadataProvider>,
        seed_count: usize,
        limit: usize,
    ) -> Self {
        Self {
            store,
            metadata,
            seed_count,
            limit,
        }
    }

    /// Up to `limit` unseen, distinct movies similar to the user's seeds
    pub async fn recommend(
        &self,
        uid: &str,
        interacted: &HashSet<MovieId>,
    ) -> AppResult<Vec<MovieSummary>> {
        let seeds = self.seed_movies(uid, interacted).await?;
        if seeds.is_empty() {
            tracing::info!(uid = %uid, "No seed movies, nothing to recommend");
            return Ok(Vec::new());
        }

        let candidates = fetch_similar_batch(self.metadata.clone(), seeds.clone()).await;
        let candidate_count = candidates.len();

        let unseen = exclude_seen(candidates, interacted);
        let movies = unique_randomized(unseen, self.limit, &mut rand::rng());

        tracing::info!(
            uid = %uid,
            seeds = ?seeds,
            candidates = candidate_count,
            returned = movies.len(),
            "Content-based recommendations built"
        );

        Ok(movies)
    }

    /// Seeds for similarity expansion
    ///
    /// Rated list entries by score, highest first. Falls back to a random
    /// sample of the interaction history when no entry is rated.
    pub async fn seed_movies(
        &self,
        uid: &str,
        interacted: &HashSet<MovieId>,
    ) -> AppResult<Vec<MovieId>> {
        let entries = self.store.list_entries(uid).await?;

        let rated = rated_seeds(entries, self.seed_count);
        if !rated.is_empty() {
            tracing::debug!(uid = %uid, seeds = ?rated, "Seeding from rated list entries");
            return Ok(rated);
        }

        let sampled = sample_ids(interacted, self.seed_count, &mut rand::rng());
        tracing::debug!(uid = %uid, seeds = ?sampled, "Seeding from interaction history");
        Ok(sampled)
    }
}

/// Ids of the `count` highest-scored rated entries; ties keep list order
pub fn rated_seeds(entries: Vec<UserListEntry>, count: usize) -> Vec<MovieId> {
    let mut rated: Vec<(MovieId, u8)> = entries
        .iter()
        .filter_map(|entry| entry.score().map(|score| (entry.movie_id, score)))
        .collect();

    rated.sort_by_key(|(_, score)| Reverse(*score));
    rated.into_iter().take(count).map(|(id, _)| id).collect()
}

/// Up to `count` ids drawn at random from `ids`
pub fn sample_ids<R: Rng + ?Sized>(
    ids: &HashSet<MovieId>,
    count: usize,
    rng: &mut R,
) -> Vec<MovieId> {
    let mut ids: Vec<MovieId> = ids.iter().copied().collect();
    // HashSet order is not stable across runs; sort so a seeded rng is reproducible
    ids.sort_unstable();
    ids.shuffle(rng);
    ids.truncate(count);
    ids
}

/// Drops every movie the user has already interacted with
pub fn exclude_seen(movies: Vec<MovieSummary>, seen: &HashSet<MovieId>) -> Vec<MovieSummary> {
    movies
        .into_iter()
        .filter(|movie| !seen.contains(&movie.id))
        .collect()
}

/// Keeps the first occurrence of each id, shuffles, and truncates to `limit`
pub fn unique_randomized<R: Rng + ?Sized>(
    movies: Vec<MovieSummary>,
    limit: usize,
    rng: &mut R,
) -> Vec<MovieSummary> {
    let mut seen = HashSet::with_capacity(movies.len());
    let mut unique: Vec<MovieSummary> = movies
        .into_iter()
        .filter(|movie| seen.insert(movie.id))
        .collect();

    unique.shuffle(rng);
    unique.truncate(limit);
    unique
}
