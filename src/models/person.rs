use serde::{Deserialize, Serialize};

use super::{image_url, MovieSummary, TmdbMovie};

/// TMDB person identifier
pub type PersonId = u64;

/// A person as returned by people search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
}

impl Person {
    pub fn with_image_url(mut self, image_base_url: &str) -> Self {
        self.profile_url = image_url(image_base_url, self.profile_path.as_deref());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonDetails {
    #[serde(flatten)]
    pub person: Person,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub also_known_as: Vec<String>,
}

/// A movie a person worked on, with their role in it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditedMovie {
    #[serde(flatten)]
    pub movie: MovieSummary,
    /// Character played, for cast credits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    /// Job held, for crew credits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonCredits {
    pub cast: Vec<CreditedMovie>,
    pub crew: Vec<CreditedMovie>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from /person/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPersonDetails {
    #[serde(flatten)]
    pub person: Person,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub also_known_as: Vec<String>,
}

impl From<TmdbPersonDetails> for PersonDetails {
    fn from(details: TmdbPersonDetails) -> Self {
        PersonDetails {
            person: details.person,
            biography: details.biography.filter(|b| !b.is_empty()),
            birthday: details.birthday,
            deathday: details.deathday,
            place_of_birth: details.place_of_birth,
            also_known_as: details.also_known_as,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCreditedMovie {
    #[serde(flatten)]
    pub movie: TmdbMovie,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

/// Response from /person/{id}/movie_credits
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPersonCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCreditedMovie>,
    #[serde(default)]
    pub crew: Vec<TmdbCreditedMovie>,
}

impl TmdbPersonCredits {
    pub fn into_credits(self, image_base_url: &str) -> PersonCredits {
        let convert = |credit: TmdbCreditedMovie| CreditedMovie {
            movie: MovieSummary::from(credit.movie).with_image_urls(image_base_url),
            character: credit.character.filter(|c| !c.is_empty()),
            job: credit.job,
        };

        PersonCredits {
            cast: self.cast.into_iter().map(convert).collect(),
            crew: self.crew.into_iter().map(convert).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_details_conversion() {
        let json = r#"{
            "id": 6384,
            "name": "Keanu Reeves",
            "known_for_department": "Acting",
            "popularity": 45.2,
            "profile_path": "/keanu.jpg",
            "biography": "",
            "birthday": "1964-09-02",
            "deathday": null,
            "place_of_birth": "Beirut, Lebanon",
            "also_known_as": ["Keanu Charles Reeves"]
        }"#;

        let details: PersonDetails = serde_json::from_str::<TmdbPersonDetails>(json)
            .unwrap()
            .into();

        assert_eq!(details.person.name, "Keanu Reeves");
        assert_eq!(details.biography, None);
        assert_eq!(details.birthday.as_deref(), Some("1964-09-02"));
        assert_eq!(details.also_known_as, vec!["Keanu Charles Reeves"]);
    }

    #[test]
    fn test_credits_keep_role_and_image_urls() {
        let json = r#"{
            "cast": [{"id": 603, "title": "The Matrix", "character": "Neo", "poster_path": "/m.jpg"}],
            "crew": [{"id": 1, "title": "Directed", "job": "Director", "character": ""}]
        }"#;

        let credits = serde_json::from_str::<TmdbPersonCredits>(json)
            .unwrap()
            .into_credits("https://img.local/w500");

        assert_eq!(credits.cast[0].character.as_deref(), Some("Neo"));
        assert_eq!(
            credits.cast[0].movie.poster_url.as_deref(),
            Some("https://img.local/w500/m.jpg")
        );
        assert_eq!(credits.crew[0].job.as_deref(), Some("Director"));
        assert_eq!(credits.crew[0].character, None);
    }
}
