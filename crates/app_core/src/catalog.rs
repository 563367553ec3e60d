//! Image catalog: the static, read-only set of records the gallery shows

use crate::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.json");

/// Image category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Nature,
    City,
    Architecture,
    Animals,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Nature,
        Category::City,
        Category::Architecture,
        Category::Animals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Nature => "nature",
            Category::City => "city",
            Category::Architecture => "architecture",
            Category::Animals => "animals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Nature => "Nature",
            Category::City => "City",
            Category::Architecture => "Architecture",
            Category::Animals => "Animals",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single image in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub url: String,
    pub date: NaiveDate,
    pub popularity: u32,
}

/// Immutable list of image records
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ImageRecord>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(records: Vec<ImageRecord>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(AppError::Catalog(format!("duplicate image id {:?}", record.id)));
            }
        }
        Ok(Self { records })
    }

    /// The catalog bundled with the application
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let records: Vec<ImageRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::info!("Loaded {} images from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a catalog position
    pub fn at(&self, position: usize) -> Option<&ImageRecord> {
        self.records.get(position)
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Catalog position of an id
    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 20);

        let bridge = catalog.get("12").unwrap();
        assert_eq!(bridge.title, "Old Bridge");
        assert_eq!(bridge.category, Category::Architecture);
        assert_eq!(bridge.date, NaiveDate::from_ymd_opt(2021, 5, 18).unwrap());
    }

    #[test]
    fn test_builtin_nature_ids() {
        let catalog = Catalog::builtin().unwrap();
        let nature: Vec<&str> = catalog
            .records()
            .iter()
            .filter(|r| r.category == Category::Nature)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(nature, vec!["1", "5", "10", "14", "19"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id":"1","title":"A","description":"","category":"city","url":"a.jpg","date":"2023-01-01","popularity":1},
            {"id":"1","title":"B","description":"","category":"city","url":"b.jpg","date":"2023-01-02","popularity":2}
        ]"#;
        assert!(matches!(Catalog::from_json(json), Err(AppError::Catalog(_))));
    }

    #[test]
    fn test_bad_date_rejected() {
        let json = r#"[
            {"id":"1","title":"A","description":"","category":"city","url":"a.jpg","date":"yesterday","popularity":1}
        ]"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.position("1"), Some(0));
        assert!(catalog.get("999").is_none());
        assert_eq!(catalog.at(19).map(|r| r.id.as_str()), Some("20"));
    }
}
