//! Filter/sort engine: (catalog, category, search, sort) -> ordered positions

use crate::catalog::{Catalog, Category, ImageRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Category filter, `All` matches everything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.label(),
        }
    }
}

/// Sort mode for the filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    Popular,
    Name,
    /// Catalog order, no reordering
    Catalog,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Newest,
        SortMode::Oldest,
        SortMode::Popular,
        SortMode::Name,
    ];

    /// Parse a sort name; anything unrecognized keeps catalog order
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or(SortMode::Catalog)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Newest => "Newest",
            SortMode::Oldest => "Oldest",
            SortMode::Popular => "Most popular",
            SortMode::Name => "Name",
            SortMode::Catalog => "Default",
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "popular" => Ok(SortMode::Popular),
            "name" => Ok(SortMode::Name),
            other => Err(format!("unknown sort mode {:?}", other)),
        }
    }
}

/// Active filter/search/sort parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub category: CategoryFilter,
    pub search: String,
    pub sort: SortMode,
}

impl Query {
    /// Does a record pass the category and search predicates?
    pub fn matches(&self, record: &ImageRecord) -> bool {
        if !self.category.matches(record.category) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let haystack = format!(
            "{} {} {}",
            record.title, record.description, record.category
        )
        .to_lowercase();
        haystack.contains(&needle)
    }
}

/// Ordered catalog positions matching a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredList {
    positions: Vec<usize>,
}

impl FilteredList {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Catalog position at a filtered index
    pub fn catalog_position(&self, index: usize) -> Option<usize> {
        self.positions.get(index).copied()
    }

    pub fn record<'a>(&self, catalog: &'a Catalog, index: usize) -> Option<&'a ImageRecord> {
        self.catalog_position(index).and_then(|p| catalog.at(p))
    }

    /// Filtered index of an image id
    pub fn index_of(&self, catalog: &Catalog, id: &str) -> Option<usize> {
        self.positions
            .iter()
            .position(|&p| catalog.at(p).map_or(false, |r| r.id == id))
    }

    pub fn records<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a ImageRecord> + 'a {
        self.positions.iter().filter_map(move |&p| catalog.at(p))
    }
}

/// Run the engine
pub fn apply(catalog: &Catalog, query: &Query) -> FilteredList {
    let records = catalog.records();
    let mut positions: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| query.matches(r))
        .map(|(i, _)| i)
        .collect();

    // sort_by is stable, so equal keys keep catalog order
    match query.sort {
        SortMode::Newest => positions.sort_by(|&a, &b| records[b].date.cmp(&records[a].date)),
        SortMode::Oldest => positions.sort_by(|&a, &b| records[a].date.cmp(&records[b].date)),
        SortMode::Popular => {
            positions.sort_by(|&a, &b| records[b].popularity.cmp(&records[a].popularity))
        }
        SortMode::Name => positions.sort_by(|&a, &b| collate(&records[a].title, &records[b].title)),
        SortMode::Catalog => {}
    }

    FilteredList { positions }
}

/// Case-insensitive ordering with a case-sensitive tiebreak
fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: &str, title: &str, category: Category, date: (i32, u32, u32), popularity: u32) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{} description", title),
            category,
            url: format!("https://example.com/{}.jpg", id),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            popularity,
        }
    }

    fn ids(catalog: &Catalog, list: &FilteredList) -> Vec<String> {
        list.records(catalog).map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_every_result_matches_and_no_match_is_dropped() {
        let catalog = Catalog::builtin().unwrap();
        let searches = ["", "a", "the", "NIGHT", "  lake  ", "zzz"];
        let categories = std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.iter().map(|c| CategoryFilter::Only(*c)));

        for category in categories {
            for search in searches {
                for sort in [SortMode::Newest, SortMode::Oldest, SortMode::Popular, SortMode::Name, SortMode::Catalog] {
                    let query = Query { category, search: search.to_string(), sort };
                    let list = apply(&catalog, &query);
                    let result: Vec<String> = ids(&catalog, &list);

                    for r in catalog.records() {
                        assert_eq!(
                            result.contains(&r.id),
                            query.matches(r),
                            "{:?} / {:?} / {:?} / {}",
                            category, search, sort, r.id
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_nature_category() {
        let catalog = Catalog::builtin().unwrap();
        let query = Query {
            category: CategoryFilter::Only(Category::Nature),
            search: String::new(),
            sort: SortMode::Newest,
        };
        let list = apply(&catalog, &query);
        // 2023-06-30, 2023-05-05, 2023-04-12, 2022-10-29, 2021-09-09
        assert_eq!(ids(&catalog, &list), vec!["5", "14", "1", "10", "19"]);
    }

    #[test]
    fn test_search_bridge_any_case() {
        let catalog = Catalog::builtin().unwrap();
        for needle in ["bridge", "BRIDGE", " Bridge "] {
            let query = Query { search: needle.to_string(), ..Query::default() };
            let list = apply(&catalog, &query);
            assert_eq!(ids(&catalog, &list), vec!["12"]);
        }
    }

    #[test]
    fn test_search_matches_category_text() {
        let catalog = Catalog::builtin().unwrap();
        let query = Query {
            search: "animals".to_string(),
            sort: SortMode::Catalog,
            ..Query::default()
        };
        let list = apply(&catalog, &query);
        assert_eq!(ids(&catalog, &list), vec!["4", "8", "9", "13", "17", "18"]);
    }

    #[test]
    fn test_sorts() {
        let catalog = Catalog::new(vec![
            record("a", "banana", Category::City, (2022, 1, 1), 5),
            record("b", "Apple", Category::City, (2023, 1, 1), 9),
            record("c", "cherry", Category::City, (2021, 1, 1), 1),
        ])
        .unwrap();

        let run = |sort| ids(&catalog, &apply(&catalog, &Query { sort, ..Query::default() }));
        assert_eq!(run(SortMode::Newest), vec!["b", "a", "c"]);
        assert_eq!(run(SortMode::Oldest), vec!["c", "a", "b"]);
        assert_eq!(run(SortMode::Popular), vec!["b", "a", "c"]);
        assert_eq!(run(SortMode::Name), vec!["b", "a", "c"]);
        assert_eq!(run(SortMode::Catalog), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let catalog = Catalog::new(vec![
            record("1", "Same", Category::City, (2023, 1, 1), 7),
            record("2", "Same", Category::City, (2023, 1, 1), 7),
            record("3", "Other", Category::City, (2024, 1, 1), 9),
            record("4", "Same", Category::City, (2023, 1, 1), 7),
        ])
        .unwrap();

        for sort in [SortMode::Newest, SortMode::Oldest, SortMode::Popular, SortMode::Name] {
            let list = apply(&catalog, &Query { sort, ..Query::default() });
            let tied: Vec<String> = ids(&catalog, &list)
                .into_iter()
                .filter(|id| id != "3")
                .collect();
            assert_eq!(tied, vec!["1", "2", "4"], "{:?}", sort);
        }
    }

    #[test]
    fn test_unknown_sort_keeps_catalog_order() {
        assert_eq!(SortMode::parse_lossy("shuffle"), SortMode::Catalog);
        assert_eq!(SortMode::parse_lossy("Popular"), SortMode::Popular);

        let catalog = Catalog::builtin().unwrap();
        let query = Query { sort: SortMode::parse_lossy("???"), ..Query::default() };
        let list = apply(&catalog, &query);
        let expected: Vec<String> = catalog.records().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids(&catalog, &list), expected);
    }

    #[test]
    fn test_empty_result() {
        let catalog = Catalog::builtin().unwrap();
        let query = Query { search: "no such image".to_string(), ..Query::default() };
        let list = apply(&catalog, &query);
        assert!(list.is_empty());
        assert_eq!(list.record(&catalog, 0), None);
    }

    #[test]
    fn test_index_of() {
        let catalog = Catalog::builtin().unwrap();
        let query = Query {
            category: CategoryFilter::Only(Category::Nature),
            sort: SortMode::Catalog,
            ..Query::default()
        };
        let list = apply(&catalog, &query);
        assert_eq!(list.index_of(&catalog, "10"), Some(2));
        assert_eq!(list.index_of(&catalog, "2"), None);
    }
}
