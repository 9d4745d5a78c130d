//! Search partitions
//!
//! Each distinct filter combination owns one remote index (Meilisearch) or
//! collection (Typesense). The partition doubles as the relational predicate
//! used to fill that index the first time it is requested.

use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    /// Person segment; part of the key only for the strict search variant.
    pub people: Option<String>,
    pub category: String,
}

impl Partition {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            people: None,
            category: category.into(),
        }
    }

    pub fn people_and_category(people: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            people: Some(people.into()),
            category: category.into(),
        }
    }

    /// Remote index/collection name: lower-cased dimensions joined with `-`.
    ///
    /// Characters outside `[a-z0-9]` inside a dimension become `_`, and the
    /// name then gets a digest of the exact dimensions as a final `-` segment.
    /// Distinct partitions therefore never share an index, e.g. `T Shirt` and
    /// `T-Shirt`, or category `Men Shirt` and people `Men` with category `Shirt`.
    pub fn key(&self) -> String {
        let category = self.category.trim().to_lowercase();
        let people = self.people.as_deref().map(|p| p.trim().to_lowercase());

        let mut dimensions: Vec<&str> = Vec::with_capacity(2);
        if let Some(people) = people.as_deref() {
            dimensions.push(people);
        }
        dimensions.push(&category);

        let lossy = dimensions.iter().any(|d| !is_plain(d));
        let mut key = dimensions
            .iter()
            .map(|d| {
                d.chars()
                    .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("-");

        if lossy {
            let digest = Sha256::digest(dimensions.join("\n").as_bytes());
            key.push('-');
            key.push_str(&hex::encode(&digest[..6]));
        }
        key
    }

    /// `ILIKE` pattern matching categories containing the requested one.
    pub fn category_pattern(&self) -> String {
        format!("%{}%", escape_like(self.category.trim()))
    }

    /// `ILIKE` pattern matching person segments starting with the requested one.
    pub fn people_pattern(&self) -> Option<String> {
        self.people
            .as_deref()
            .map(|p| format!("{}%", escape_like(p.trim())))
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.people {
            Some(people) => write!(f, "people='{}' and category='{}'", people, self.category),
            None => write!(f, "category='{}'", self.category),
        }
    }
}

fn is_plain(dimension: &str) -> bool {
    dimension
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
