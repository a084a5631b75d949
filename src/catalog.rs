//! Word catalog consumed by the session engine.
//!
//! The engine only reads categories and troll words through [`RoleCatalog`].
//! [`StaticCatalog`] is the default adapter: a JSON file loaded once at
//! startup, or a small built-in word list when no file is configured.

use crate::types::CategoryId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Errors that can occur while loading a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// A primary word and its confusable twin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordPair {
    pub word_a: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_b: Option<String>,
}

impl WordPair {
    pub fn new(word_a: impl Into<String>, word_b: impl Into<String>) -> Self {
        Self {
            word_a: word_a.into(),
            word_b: Some(word_b.into()),
        }
    }

    /// The twin word, or the primary word when the pair has no distinct twin
    pub fn confusable(&self) -> &str {
        match self.word_b.as_deref().map(str::trim) {
            Some(b) if !b.is_empty() && b != self.word_a => b,
            _ => &self.word_a,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub word_pairs: Vec<WordPair>,
}

/// Category listing for the category picker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub word_count: usize,
}

impl From<&Category> for CategorySummary {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            word_count: c.word_pairs.len(),
        }
    }
}

/// Read-only source of categories and troll words
pub trait RoleCatalog: Send + Sync {
    fn get_category(&self, id: &str) -> Option<Category>;

    fn troll_words(&self) -> Vec<String>;

    fn categories(&self) -> Vec<CategorySummary>;
}

/// Catalog held fully in memory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaticCatalog {
    pub categories: Vec<Category>,
    #[serde(default)]
    pub troll_words: Vec<String>,
}

impl StaticCatalog {
    pub fn new(categories: Vec<Category>, troll_words: Vec<String>) -> Result<Self, CatalogError> {
        let catalog = Self {
            categories,
            troll_words,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: StaticCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::Invalid(
                "at least one category is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.id.trim().is_empty() {
                return Err(CatalogError::Invalid("category id is empty".to_string()));
            }
            if !seen.insert(category.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate category id '{}'",
                    category.id
                )));
            }
            if category.word_pairs.iter().any(|p| p.word_a.trim().is_empty()) {
                return Err(CatalogError::Invalid(format!(
                    "category '{}' contains an empty word",
                    category.id
                )));
            }
        }

        if self.troll_words.iter().any(|w| w.trim().is_empty()) {
            return Err(CatalogError::Invalid("troll word is empty".to_string()));
        }

        Ok(())
    }

    /// Small default word list used when no catalog file is configured
    pub fn builtin() -> Self {
        fn category(id: &str, name: &str, pairs: &[(&str, &str)]) -> Category {
            Category {
                id: id.to_string(),
                name: name.to_string(),
                word_pairs: pairs.iter().map(|(a, b)| WordPair::new(*a, *b)).collect(),
            }
        }

        Self {
            categories: vec![
                category(
                    "food",
                    "Food",
                    &[
                        ("Pizza", "Calzone"),
                        ("Sushi", "Sashimi"),
                        ("Pancake", "Waffle"),
                        ("Burger", "Sandwich"),
                        ("Ice Cream", "Frozen Yogurt"),
                    ],
                ),
                category(
                    "animals",
                    "Animals",
                    &[
                        ("Lion", "Tiger"),
                        ("Dolphin", "Shark"),
                        ("Owl", "Eagle"),
                        ("Frog", "Toad"),
                        ("Horse", "Donkey"),
                    ],
                ),
                category(
                    "places",
                    "Places",
                    &[
                        ("Beach", "Lake"),
                        ("Library", "Bookstore"),
                        ("Airport", "Train Station"),
                        ("Hospital", "Pharmacy"),
                        ("Cinema", "Theater"),
                    ],
                ),
            ],
            troll_words: vec![
                "Banana".to_string(),
                "Toaster".to_string(),
                "Volcano".to_string(),
                "Umbrella".to_string(),
            ],
        }
    }
}

impl RoleCatalog for StaticCatalog {
    fn get_category(&self, id: &str) -> Option<Category> {
        self.categories.iter().find(|c| c.id == id).cloned()
    }

    fn troll_words(&self) -> Vec<String> {
        self.troll_words.clone()
    }

    fn categories(&self) -> Vec<CategorySummary> {
        self.categories.iter().map(CategorySummary::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_confusable_falls_back_to_primary() {
        assert_eq!(WordPair::new("Lion", "Tiger").confusable(), "Tiger");
        assert_eq!(WordPair::new("Lion", "Lion").confusable(), "Lion");
        assert_eq!(WordPair::new("Lion", "  ").confusable(), "Lion");

        let pair = WordPair {
            word_a: "Lion".to_string(),
            word_b: None,
        };
        assert_eq!(pair.confusable(), "Lion");
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "categories": [
                { "id": "food", "name": "Food",
                  "word_pairs": [ { "word_a": "Pizza", "word_b": "Calzone" }, { "word_a": "Soup" } ] }
            ],
            "troll_words": ["Banana"]
        }"#;

        let catalog = StaticCatalog::from_json_str(json).unwrap();
        let food = catalog.get_category("food").unwrap();
        assert_eq!(food.word_pairs.len(), 2);
        assert_eq!(food.word_pairs[1].confusable(), "Soup");
        assert_eq!(catalog.troll_words(), vec!["Banana".to_string()]);
        assert!(catalog.get_category("missing").is_none());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = r#"{
            "categories": [
                { "id": "a", "name": "A", "word_pairs": [] },
                { "id": "a", "name": "B", "word_pairs": [] }
            ]
        }"#;

        let result = StaticCatalog::from_json_str(json);
        assert!(matches!(result, Err(CatalogError::Invalid(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let result = StaticCatalog::from_json_str(r#"{ "categories": [] }"#);
        assert!(matches!(result, Err(CatalogError::Invalid(_))));

        let result = StaticCatalog::from_json_str("not json");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "categories": [ {{ "id": "x", "name": "X", "word_pairs": [ {{ "word_a": "One" }} ] }} ] }}"#
        )
        .unwrap();

        let catalog = StaticCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.categories().len(), 1);
        assert_eq!(catalog.categories()[0].word_count, 1);
        assert!(catalog.troll_words().is_empty());

        let missing = StaticCatalog::from_path(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_builtin_is_valid() {
        let catalog = StaticCatalog::builtin();
        assert!(catalog.validate().is_ok());
        assert!(!catalog.troll_words().is_empty());
    }
}
