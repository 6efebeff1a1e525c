//! Column mapping between source headers and record fields.
//!
//! Different exports of the same dataset name their columns differently
//! (`names` vs `name`, `budget_x` vs `budget`, `date_x` vs `release_date`).
//! A [`ColumnMapping`] lists the accepted header names per field; resolving it
//! against a concrete header row yields the column index for each field, or
//! `None` when the column is absent and the field falls back to its default.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Logical fields read from the source table.
///
/// `Crew` is never coerced into the record; it only takes part in
/// required-field row cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Genre,
    OriginalLanguage,
    Country,
    ReleaseDate,
    Revenue,
    Budget,
    Score,
    Crew,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Name,
        Field::Genre,
        Field::OriginalLanguage,
        Field::Country,
        Field::ReleaseDate,
        Field::Revenue,
        Field::Budget,
        Field::Score,
        Field::Crew,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Genre => "genre",
            Field::OriginalLanguage => "original_language",
            Field::Country => "country",
            Field::ReleaseDate => "release_date",
            Field::Revenue => "revenue",
            Field::Budget => "budget",
            Field::Score => "score",
            Field::Crew => "crew",
        }
    }
}

/// Accepted header names per field, in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub name: Vec<String>,
    pub genre: Vec<String>,
    pub original_language: Vec<String>,
    pub country: Vec<String>,
    pub release_date: Vec<String>,
    pub revenue: Vec<String>,
    pub budget: Vec<String>,
    pub score: Vec<String>,
    pub crew: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: names(&["names", "name", "title"]),
            genre: names(&["genre", "genres"]),
            original_language: names(&["orig_lang", "original_language", "language"]),
            country: names(&["country"]),
            release_date: names(&["date_x", "release_date", "date"]),
            revenue: names(&["revenue", "gross"]),
            budget: names(&["budget_x", "budget"]),
            score: names(&["score", "rating"]),
            crew: names(&["crew"]),
        }
    }
}

impl ColumnMapping {
    /// Candidate header names for one field.
    pub fn candidates(&self, field: Field) -> &[String] {
        match field {
            Field::Name => &self.name,
            Field::Genre => &self.genre,
            Field::OriginalLanguage => &self.original_language,
            Field::Country => &self.country,
            Field::ReleaseDate => &self.release_date,
            Field::Revenue => &self.revenue,
            Field::Budget => &self.budget,
            Field::Score => &self.score,
            Field::Crew => &self.crew,
        }
    }

    /// Resolve the mapping against a header row.
    ///
    /// The first candidate present in `headers` wins. Missing columns are
    /// logged and left unresolved; they are never an error.
    pub fn resolve(&self, headers: &[String]) -> ResolvedColumns {
        let find = |field: Field| {
            self.candidates(field)
                .iter()
                .find_map(|c| headers.iter().position(|h| h == c))
        };

        let resolved = ResolvedColumns {
            name: find(Field::Name),
            genre: find(Field::Genre),
            original_language: find(Field::OriginalLanguage),
            country: find(Field::Country),
            release_date: find(Field::ReleaseDate),
            revenue: find(Field::Revenue),
            budget: find(Field::Budget),
            score: find(Field::Score),
            crew: find(Field::Crew),
        };

        for field in resolved.missing() {
            warn!(
                field = field.label(),
                candidates = ?self.candidates(field),
                "column not found, using defaults"
            );
        }

        resolved
    }
}

/// Column index per field for one concrete table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub name: Option<usize>,
    pub genre: Option<usize>,
    pub original_language: Option<usize>,
    pub country: Option<usize>,
    pub release_date: Option<usize>,
    pub revenue: Option<usize>,
    pub budget: Option<usize>,
    pub score: Option<usize>,
    pub crew: Option<usize>,
}

impl ResolvedColumns {
    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::Name => self.name,
            Field::Genre => self.genre,
            Field::OriginalLanguage => self.original_language,
            Field::Country => self.country,
            Field::ReleaseDate => self.release_date,
            Field::Revenue => self.revenue,
            Field::Budget => self.budget,
            Field::Score => self.score,
            Field::Crew => self.crew,
        }
    }

    /// Fields with no matching column.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL.into_iter().filter(|f| self.get(*f).is_none()).collect()
    }

    /// Read the cell for `field` out of `row`.
    pub fn cell<'a>(&self, row: &'a [Option<String>], field: Field) -> Option<&'a str> {
        let idx = self.get(field)?;
        row.get(idx)?.as_deref()
    }
}
