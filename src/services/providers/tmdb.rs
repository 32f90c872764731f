//! TMDB metadata provider
//!
//! All requests are GETs against `{api_url}/{path}` with the API key and
//! `language=en-US` as query parameters. Responses are cached in Redis
//! through the [`cached!`] macro; the HTTP client carries a per-request
//! deadline so one slow call cannot stall a recommendation request.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        person::{TmdbPersonCredits, TmdbPersonDetails},
        validate_page, DiscoverFilter, Keyword, MovieDetails, MovieId, MovieList, MoviePage,
        MovieSummary, Person, PersonCredits, PersonDetails, PersonId, Review, TmdbKeywords,
        TmdbMovie, TmdbMovieDetails, TmdbPage, Video, MAX_PAGE,
    },
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const LIST_CACHE_TTL: u64 = 3600; // 1 hour
const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        image_base_url: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base_url,
            cache,
        })
    }

    /// GET `{api_url}/{path}` with the API key, language and `extra` query parameters
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .query(extra)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(AppError::NotFound(format!("TMDB resource {} not found", path)));
            }
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    /// Fetches a paged movie list and converts it to summaries
    async fn get_movie_page(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> AppResult<Vec<MovieSummary>> {
        Ok(self.get_paged(path, extra).await?.results)
    }

    /// Like [`Self::get_movie_page`] but keeps the paging metadata
    async fn get_paged(&self, path: &str, extra: &[(&str, &str)]) -> AppResult<MoviePage> {
        let page: TmdbPage<TmdbMovie> = self.get_json(path, extra).await?;
        Ok(MoviePage {
            page: page.page,
            total_pages: page.total_pages.min(MAX_PAGE),
            total_results: page.total_results,
            results: page
                .results
                .into_iter()
                .map(|movie| MovieSummary::from(movie).with_image_urls(&self.image_base_url))
                .collect(),
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn movie_details(&self, movie_id: MovieId) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let raw: TmdbMovieDetails = self
                    .get_json(
                        &format!("movie/{}", movie_id),
                        &[("append_to_response", "credits")],
                    )
                    .await?;

                let mut details = MovieDetails::from(raw);
                details.summary = details.summary.with_image_urls(&self.image_base_url);

                tracing::debug!(
                    movie_id,
                    genres = details.genres.len(),
                    provider = "tmdb",
                    "Movie details fetched"
                );

                Ok::<_, AppError>(details)
            }
        )
    }

    async fn similar_movies(&self, movie_id: MovieId) -> AppResult<Vec<MovieSummary>> {
        cached!(
            self.cache,
            CacheKey::Similar(movie_id),
            LIST_CACHE_TTL,
            async move {
                let movies = self
                    .get_movie_page(
                        &format!("movie/{}/recommendations", movie_id),
                        &[("page", "1")],
                    )
                    .await?;

                tracing::debug!(
                    movie_id,
                    results = movies.len(),
                    provider = "tmdb",
                    "Similar movies fetched"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Search(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let movies = self
                    .get_movie_page(
                        "search/movie",
                        &[
                            ("query", query.trim()),
                            ("page", "1"),
                            ("include_adult", "false"),
                        ],
                    )
                    .await?;

                tracing::info!(
                    query = %query,
                    results = movies.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn movie_list(&self, list: MovieList) -> AppResult<Vec<MovieSummary>> {
        cached!(
            self.cache,
            CacheKey::Listing(list.path().to_string()),
            LIST_CACHE_TTL,
            async move { self.get_movie_page(list.path(), &[]).await }
        )
    }

    async fn discover(&self, filter: DiscoverFilter, page: u32) -> AppResult<MoviePage> {
        let page = validate_page(page)?;

        cached!(
            self.cache,
            CacheKey::Listing(format!("{}:p{}", filter.cache_tag(), page)),
            LIST_CACHE_TTL,
            async move {
                let mut params = filter.query_params();
                params.push(("page", page.to_string()));
                let query: Vec<(&str, &str)> =
                    params.iter().map(|(k, v)| (*k, v.as_str())).collect();

                let listing = self.get_paged("discover/movie", &query).await?;

                tracing::debug!(
                    filter = %filter.cache_tag(),
                    page,
                    total_pages = listing.total_pages,
                    provider = "tmdb",
                    "Discover page fetched"
                );

                Ok::<_, AppError>(listing)
            }
        )
    }

    async fn movie_videos(&self, movie_id: MovieId) -> AppResult<Vec<Video>> {
        cached!(
            self.cache,
            CacheKey::Videos(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let page: TmdbPage<Video> = self
                    .get_json(&format!("movie/{}/videos", movie_id), &[])
                    .await?;
                Ok::<_, AppError>(page.results)
            }
        )
    }

    async fn movie_reviews(&self, movie_id: MovieId) -> AppResult<Vec<Review>> {
        cached!(
            self.cache,
            CacheKey::Reviews(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let page: TmdbPage<Review> = self
                    .get_json(&format!("movie/{}/reviews", movie_id), &[("page", "1")])
                    .await?;
                Ok::<_, AppError>(page.results)
            }
        )
    }

    async fn movie_keywords(&self, movie_id: MovieId) -> AppResult<Vec<Keyword>> {
        cached!(
            self.cache,
            CacheKey::Keywords(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let raw: TmdbKeywords = self
                    .get_json(&format!("movie/{}/keywords", movie_id), &[])
                    .await?;
                Ok::<_, AppError>(raw.keywords)
            }
        )
    }

    async fn search_people(&self, query: &str) -> AppResult<Vec<Person>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::PeopleSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let page: TmdbPage<Person> = self
                    .get_json(
                        "search/person",
                        &[
                            ("query", query.trim()),
                            ("page", "1"),
                            ("include_adult", "false"),
                        ],
                    )
                    .await?;

                let people: Vec<Person> = page
                    .results
                    .into_iter()
                    .map(|p| p.with_image_url(&self.image_base_url))
                    .collect();

                tracing::info!(
                    query = %query,
                    results = people.len(),
                    provider = "tmdb",
                    "People search completed"
                );

                Ok::<_, AppError>(people)
            }
        )
    }

    async fn person_details(&self, person_id: PersonId) -> AppResult<PersonDetails> {
        cached!(
            self.cache,
            CacheKey::Person(person_id),
            DETAILS_CACHE_TTL,
            async move {
                let raw: TmdbPersonDetails =
                    self.get_json(&format!("person/{}", person_id), &[]).await?;

                let mut details = PersonDetails::from(raw);
                details.person = details.person.with_image_url(&self.image_base_url);

                Ok::<_, AppError>(details)
            }
        )
    }

    async fn person_movie_credits(&self, person_id: PersonId) -> AppResult<PersonCredits> {
        cached!(
            self.cache,
            CacheKey::PersonCredits(person_id),
            DETAILS_CACHE_TTL,
            async move {
                let raw: TmdbPersonCredits = self
                    .get_json(&format!("person/{}/movie_credits", person_id), &[])
                    .await?;

                let credits = raw.into_credits(&self.image_base_url);

                tracing::debug!(
                    person_id,
                    cast = credits.cast.len(),
                    crew = credits.crew.len(),
                    provider = "tmdb",
                    "Person credits fetched"
                );

                Ok::<_, AppError>(credits)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
