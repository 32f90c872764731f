use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::MovieId;

/// Append-only record of the movies a user has viewed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInteractionRecord {
    pub movie_ids: HashSet<MovieId>,
    pub last_updated: DateTime<Utc>,
}

impl UserInteractionRecord {
    pub fn empty(at: DateTime<Utc>) -> Self {
        Self {
            movie_ids: HashSet::new(),
            last_updated: at,
        }
    }

    pub fn len(&self) -> usize {
        self.movie_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movie_ids.is_empty()
    }

    /// Adds a movie id; returns false if it was already present
    pub fn record(&mut self, movie_id: MovieId, at: DateTime<Utc>) -> bool {
        let added = self.movie_ids.insert(movie_id);
        if added {
            self.last_updated = at;
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_record_is_idempotent() {
        let start = Utc::now();
        let mut record = UserInteractionRecord::empty(start);

        assert!(record.record(42, start + Duration::seconds(1)));
        assert!(!record.record(42, start + Duration::seconds(2)));

        assert_eq!(record.len(), 1);
        assert_eq!(record.last_updated, start + Duration::seconds(1));
    }
}
