use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(MovieId);
id_newtype!(PlayerId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub poster_url: Option<Url>,
    pub backdrop_url: Option<Url>,
    pub release_date: NaiveDate,
    pub vote_average: f64,
}

impl Movie {
    /// Rating rendered with one decimal, the way list rows show it.
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.vote_average)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team: String,
    pub stats: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_numbers() {
        let encoded = serde_json::to_string(&PlayerId(42)).expect("encode");
        assert_eq!(encoded, "42");
        assert_eq!(MovieId(7).to_string(), "7");
    }

    #[test]
    fn movie_decodes_optional_urls_and_date() {
        let raw = r#"{
            "id": 1,
            "title": "Sample Movie",
            "overview": "This is a sample movie for preview",
            "poster_url": null,
            "backdrop_url": "https://img.example.com/b.jpg",
            "release_date": "2023-01-01",
            "vote_average": 7.5
        }"#;
        let movie: Movie = serde_json::from_str(raw).expect("decode");
        assert_eq!(movie.id, MovieId(1));
        assert!(movie.poster_url.is_none());
        assert_eq!(
            movie.backdrop_url.as_ref().map(Url::as_str),
            Some("https://img.example.com/b.jpg")
        );
        assert_eq!(
            movie.release_date,
            NaiveDate::from_ymd_opt(2023, 1, 1).expect("date")
        );
        assert_eq!(movie.rating_label(), "7.5");
    }

    #[test]
    fn player_rejects_wrong_field_types() {
        let raw = r#"{"id": 1, "name": "A", "team": "X", "stats": {"ppg": "high"}}"#;
        assert!(serde_json::from_str::<Player>(raw).is_err());
    }
}
