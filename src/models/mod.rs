use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub mod interaction;
pub mod person;
pub mod preferences;
pub mod profile;
pub mod user_list;

pub use interaction::UserInteractionRecord;
pub use person::{CreditedMovie, Person, PersonCredits, PersonDetails, PersonId};
pub use preferences::{
    PreferredMovie, SavePreferencesRequest, SavePreferencesResponse, UserPreferences,
};
pub use profile::{RegisterProfileRequest, UpdateProfileRequest, UserProfile};
pub use user_list::{
    AddToListRequest, UpdateRatingRequest, UserListEntry, UserRating, WatchStatus,
};

/// TMDB movie identifier
pub type MovieId = u64;

/// Read-only projection of a movie returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
    /// Score assigned by the remote recommendation model, when it produced this item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_score: Option<f64>,
}

impl MovieSummary {
    /// Fills the full image URLs from the relative paths
    pub fn with_image_urls(mut self, image_base_url: &str) -> Self {
        self.poster_url = image_url(image_base_url, self.poster_path.as_deref());
        self.backdrop_url = image_url(image_base_url, self.backdrop_path.as_deref());
        self
    }
}

/// Joins an image base URL with a TMDB relative path
pub fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

/// A genre as returned inside movie details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A cast member from the credits sub-resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Full movie details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub summary: MovieSummary,
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub genres: Vec<Genre>,
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Keyword {
    pub id: u64,
    pub name: String,
}

/// Highest page number TMDB serves for paged listings
pub const MAX_PAGE: u32 = 500;

/// Rejects page numbers outside `1..=MAX_PAGE`
pub fn validate_page(page: u32) -> AppResult<u32> {
    if (1..=MAX_PAGE).contains(&page) {
        Ok(page)
    } else {
        Err(AppError::InvalidInput(format!(
            "page: must be between 1 and {}",
            MAX_PAGE
        )))
    }
}

/// One page of a browse listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    pub page: u32,
    /// Capped at [`MAX_PAGE`] since TMDB rejects anything past it
    pub total_pages: u32,
    pub total_results: u64,
    pub results: Vec<MovieSummary>,
}

/// What a discover listing is filtered by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoverFilter {
    Genre(u32),
    People(Vec<PersonId>),
    /// ISO 3166-1 alpha-2 code, upper case
    OriginCountry(String),
}

const GENRE_MIN_VOTES: &str = "1000";
const PEOPLE_MIN_VOTES: &str = "100";
const COUNTRY_MIN_VOTES: &str = "1000";

impl DiscoverFilter {
    pub fn people(ids: Vec<PersonId>) -> AppResult<Self> {
        if ids.is_empty() {
            return Err(AppError::InvalidInput(
                "ids: at least one person id is required".to_string(),
            ));
        }
        Ok(DiscoverFilter::People(ids))
    }

    pub fn origin_country(code: &str) -> AppResult<Self> {
        let code = code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::InvalidInput(format!(
                "country: '{}' is not a two-letter country code",
                code
            )));
        }
        Ok(DiscoverFilter::OriginCountry(code.to_ascii_uppercase()))
    }

    /// Stable tag for cache keys
    pub fn cache_tag(&self) -> String {
        match self {
            DiscoverFilter::Genre(id) => format!("genre:{}", id),
            DiscoverFilter::People(ids) => format!("people:{}", join_ids(ids)),
            DiscoverFilter::OriginCountry(code) => format!("country:{}", code),
        }
    }

    /// Query parameters for /discover/movie, page excluded
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            DiscoverFilter::Genre(id) => vec![
                ("sort_by", "vote_average.desc".to_string()),
                ("vote_count.gte", GENRE_MIN_VOTES.to_string()),
                ("with_genres", id.to_string()),
            ],
            DiscoverFilter::People(ids) => vec![
                ("sort_by", "vote_average.desc".to_string()),
                ("vote_count.gte", PEOPLE_MIN_VOTES.to_string()),
                ("include_adult", "false".to_string()),
                ("include_video", "false".to_string()),
                ("with_people", join_ids(ids)),
            ],
            DiscoverFilter::OriginCountry(code) => vec![
                ("vote_count.gte", COUNTRY_MIN_VOTES.to_string()),
                ("include_adult", "false".to_string()),
                ("include_video", "false".to_string()),
                ("with_origin_country", code.clone()),
            ],
        }
    }
}

fn join_ids(ids: &[PersonId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Curated movie lists exposed by the metadata API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieList {
    Trending,
    TopRated,
    NowPlaying,
}

impl MovieList {
    /// Path of the list endpoint relative to the API root
    pub fn path(&self) -> &'static str {
        match self {
            MovieList::Trending => "trending/movie/week",
            MovieList::TopRated => "movie/top_rated",
            MovieList::NowPlaying => "movie/now_playing",
        }
    }
}

// ============================================================================
// Remote Recommendation Endpoint Types
// ============================================================================

/// One `{movie_id, score}` pair from the scoring endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredMovie {
    pub movie_id: MovieId,
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoredMoviesResponse {
    #[serde(default)]
    pub recommendations: Vec<ScoredMovie>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged list response, e.g. /movie/{id}/recommendations or /search/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

fn first_page() -> u32 {
    1
}

/// Response from /movie/{id}/keywords
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbKeywords {
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

/// Movie entry inside a list response. TV entries use `name`/`first_air_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        MovieSummary {
            id: movie.id,
            title: movie.title.or(movie.name).unwrap_or_default(),
            overview: movie.overview.filter(|o| !o.is_empty()),
            release_date: non_empty(movie.release_date.or(movie.first_air_date)),
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            genre_ids: movie.genre_ids,
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            poster_url: None,
            backdrop_url: None,
            recommendation_score: None,
        }
    }
}

/// Response from /movie/{id}?append_to_response=credits
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// Number of cast members kept on the details projection
const TOP_BILLED_CAST: usize = 10;

impl From<TmdbMovieDetails> for MovieDetails {
    fn from(details: TmdbMovieDetails) -> Self {
        let genre_ids = details.genres.iter().map(|g| g.id).collect();
        let cast = details
            .credits
            .map(|c| c.cast.into_iter().take(TOP_BILLED_CAST).collect())
            .unwrap_or_default();

        MovieDetails {
            summary: MovieSummary {
                id: details.id,
                title: details.title,
                overview: details.overview.filter(|o| !o.is_empty()),
                release_date: non_empty(details.release_date),
                vote_average: details.vote_average,
                vote_count: details.vote_count,
                genre_ids,
                poster_path: details.poster_path,
                backdrop_path: details.backdrop_path,
                poster_url: None,
                backdrop_url: None,
                recommendation_score: None,
            },
            runtime: details.runtime.filter(|r| *r > 0),
            tagline: details.tagline.filter(|t| !t.is_empty()),
            genres: details.genres,
            cast,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_joins_paths() {
        assert_eq!(
            image_url("https://image.tmdb.org/t/p/w500", Some("/abc.jpg")),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg".to_string())
        );
        assert_eq!(
            image_url("https://image.tmdb.org/t/p/w500/", Some("abc.jpg")),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg".to_string())
        );
        assert_eq!(image_url("https://image.tmdb.org/t/p/w500", None), None);
        assert_eq!(image_url("https://image.tmdb.org/t/p/w500", Some("")), None);
    }

    #[test]
    fn test_tmdb_movie_deserialization_and_conversion() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "overview": "Cobb, a skilled thief...",
            "release_date": "2010-07-15",
            "vote_average": 8.4,
            "vote_count": 35000,
            "genre_ids": [28, 878, 12],
            "poster_path": "/inception.jpg",
            "backdrop_path": null
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        let summary = MovieSummary::from(movie).with_image_urls("https://img.local/w500");

        assert_eq!(summary.id, 27205);
        assert_eq!(summary.title, "Inception");
        assert_eq!(summary.release_date.as_deref(), Some("2010-07-15"));
        assert_eq!(summary.genre_ids, vec![28, 878, 12]);
        assert_eq!(
            summary.poster_url.as_deref(),
            Some("https://img.local/w500/inception.jpg")
        );
        assert_eq!(summary.backdrop_url, None);
    }

    #[test]
    fn test_tmdb_tv_entry_falls_back_to_name() {
        let json = r#"{"id": 1399, "name": "Game of Thrones", "first_air_date": "2011-04-17"}"#;

        let summary = MovieSummary::from(serde_json::from_str::<TmdbMovie>(json).unwrap());
        assert_eq!(summary.title, "Game of Thrones");
        assert_eq!(summary.release_date.as_deref(), Some("2011-04-17"));
        assert_eq!(summary.vote_average, 0.0);
    }

    #[test]
    fn test_details_derive_genre_ids_from_genre_objects() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "vote_average": 8.2,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "runtime": 136,
            "tagline": "",
            "credits": {"cast": [{"id": 6384, "name": "Keanu Reeves", "character": "Neo"}]}
        }"#;

        let details: MovieDetails = serde_json::from_str::<TmdbMovieDetails>(json)
            .unwrap()
            .into();

        assert_eq!(details.summary.genre_ids, vec![28, 878]);
        assert_eq!(details.runtime, Some(136));
        assert_eq!(details.tagline, None);
        assert_eq!(details.cast.len(), 1);
        assert_eq!(details.cast[0].name, "Keanu Reeves");
    }

    #[test]
    fn test_summary_skips_absent_recommendation_score() {
        let summary = MovieSummary::from(
            serde_json::from_str::<TmdbMovie>(r#"{"id": 1, "title": "A"}"#).unwrap(),
        );
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("recommendation_score").is_none());
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(validate_page(1).unwrap(), 1);
        assert_eq!(validate_page(500).unwrap(), 500);
        assert!(matches!(validate_page(0), Err(AppError::InvalidInput(_))));
        assert!(matches!(validate_page(501), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_origin_country_normalized_and_validated() {
        assert_eq!(
            DiscoverFilter::origin_country(" kr ").unwrap(),
            DiscoverFilter::OriginCountry("KR".to_string())
        );
        assert!(DiscoverFilter::origin_country("KOR").is_err());
        assert!(DiscoverFilter::origin_country("1A").is_err());
    }

    #[test]
    fn test_people_filter_joins_ids() {
        let filter = DiscoverFilter::people(vec![31, 287]).unwrap();
        assert!(filter
            .query_params()
            .contains(&("with_people", "31,287".to_string())));
        assert_eq!(filter.cache_tag(), "people:31,287");
        assert!(DiscoverFilter::people(vec![]).is_err());
    }

    #[test]
    fn test_page_metadata_defaults() {
        let page: TmdbPage<TmdbMovie> = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_scored_movies_response() {
        let json = r#"{"recommendations": [{"movie_id": 1, "score": 0.9}, {"movie_id": 2, "score": 0.4}]}"#;
        let response: ScoredMoviesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.recommendations.len(), 2);
        assert_eq!(response.recommendations[0].movie_id, 1);
    }
}
