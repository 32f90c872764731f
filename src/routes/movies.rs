use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    models::{
        DiscoverFilter, Keyword, MovieDetails, MovieId, MovieList, MoviePage, MovieSummary,
        PersonId, Review, Video,
    },
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    page: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct PeopleQuery {
    /// Comma-separated person ids
    #[serde(default)]
    ids: String,
    #[serde(default = "first_page")]
    page: u32,
}

fn parse_person_ids(raw: &str) -> AppResult<Vec<PersonId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<PersonId>().map_err(|_| {
                AppError::InvalidInput(format!("ids: '{}' is not a person id", part))
            })
        })
        .collect()
}

pub async fn trending(State(state): State<AppState>) -> AppResult<Json<Vec<MovieSummary>>> {
    Ok(Json(state.metadata.movie_list(MovieList::Trending).await?))
}

pub async fn top_rated(State(state): State<AppState>) -> AppResult<Json<Vec<MovieSummary>>> {
    Ok(Json(state.metadata.movie_list(MovieList::TopRated).await?))
}

pub async fn now_playing(State(state): State<AppState>) -> AppResult<Json<Vec<MovieSummary>>> {
    Ok(Json(state.metadata.movie_list(MovieList::NowPlaying).await?))
}

/// Handler for movie title search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let movies = state.metadata.search_movies(&params.q).await?;
    Ok(Json(movies))
}

pub async fn by_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<u32>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<MoviePage>> {
    let listing = state
        .metadata
        .discover(DiscoverFilter::Genre(genre_id), params.page)
        .await?;
    Ok(Json(listing))
}

pub async fn by_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<MoviePage>> {
    let filter = DiscoverFilter::origin_country(&code)?;
    Ok(Json(state.metadata.discover(filter, params.page).await?))
}

/// Movies featuring any of the given people, e.g. `?ids=31,287`
pub async fn by_people(
    State(state): State<AppState>,
    Query(params): Query<PeopleQuery>,
) -> AppResult<Json<MoviePage>> {
    let filter = DiscoverFilter::people(parse_person_ids(&params.ids)?)?;
    Ok(Json(state.metadata.discover(filter, params.page).await?))
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<MovieDetails>> {
    Ok(Json(state.metadata.movie_details(id).await?))
}

pub async fn similar(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    Ok(Json(state.metadata.similar_movies(id).await?))
}

pub async fn videos(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<Vec<Video>>> {
    Ok(Json(state.metadata.movie_videos(id).await?))
}

pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<Vec<Review>>> {
    Ok(Json(state.metadata.movie_reviews(id).await?))
}

pub async fn keywords(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<Vec<Keyword>>> {
    Ok(Json(state.metadata.movie_keywords(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_person_ids() {
        assert_eq!(parse_person_ids("31, 287,").unwrap(), vec![31, 287]);
        assert!(parse_person_ids("").unwrap().is_empty());
        assert!(matches!(
            parse_person_ids("31,tom"),
            Err(AppError::InvalidInput(_))
        ));
    }
}
