//! Recipe query engine.
//!
//! Filters and paginates a recipe collection in memory: ownership first, then a
//! case-insensitive substring match on the name, then a page window over the
//! store's own order. No sorting is applied.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Recipe;

/// Default page size used by the recipe list.
pub const DEFAULT_PAGE_SIZE: i64 = 8;

/// Query parameters for listing recipes.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeQuery {
    pub search_query: Option<String>,
    pub page: i64,
    pub page_size: i64,
    pub filter_owned_recipes: bool,
    /// Email of the caller, required when `filter_owned_recipes` is set.
    pub current_user_email: Option<String>,
}

impl Default for RecipeQuery {
    fn default() -> Self {
        Self {
            search_query: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filter_owned_recipes: false,
            current_user_email: None,
        }
    }
}

/// One page of results plus the size of the filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePage {
    pub data: Vec<Recipe>,
    pub total: usize,
}

/// Apply ownership and name filters, then cut out the requested page.
///
/// `page < 1` or `page_size < 1` yields an empty page; `total` is still reported.
pub fn query(all: &[Recipe], params: &RecipeQuery) -> Result<RecipePage, AppError> {
    let owner = if params.filter_owned_recipes {
        let email = params
            .current_user_email
            .as_deref()
            .filter(|email| !email.is_empty())
            .ok_or_else(|| {
                AppError::Unauthenticated("Sign in to filter your own recipes".to_string())
            })?;
        Some(email)
    } else {
        None
    };

    let needle = params
        .search_query
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let filtered: Vec<&Recipe> = all
        .iter()
        .filter(|recipe| owner.map_or(true, |email| recipe.author() == email))
        .filter(|recipe| {
            needle
                .as_deref()
                .map_or(true, |needle| recipe.name().to_lowercase().contains(needle))
        })
        .collect();

    let total = filtered.len();
    let data = page_window(total, params.page, params.page_size)
        .map(|(start, end)| filtered[start..end].iter().map(|r| (*r).clone()).collect())
        .unwrap_or_default();

    Ok(RecipePage { data, total })
}

/// Index range `[start, end)` of a page, or `None` when the page is empty.
fn page_window(len: usize, page: i64, page_size: i64) -> Option<(usize, usize)> {
    if page < 1 || page_size < 1 {
        return None;
    }
    let start = (page - 1).checked_mul(page_size)?;
    let start = usize::try_from(start).ok()?;
    if start >= len {
        return None;
    }
    let size = usize::try_from(page_size).ok()?;
    Some((start, start.saturating_add(size).min(len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeDocument;
    use std::collections::HashSet;

    fn recipe(id: &str, name: &str, author: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            document: RecipeDocument {
                name: name.to_string(),
                author: author.to_string(),
                ..Default::default()
            },
        }
    }

    fn catalog() -> Vec<Recipe> {
        vec![
            recipe("1", "Greek Salad", "a@mail.com"),
            recipe("2", "Tomato Soup", "b@mail.com"),
            recipe("3", "Pasta Salad", "A@mail.com"),
            recipe("4", "Pancakes", "a@mail.com"),
            recipe("5", "Fruit Salad", "b@mail.com"),
        ]
    }

    fn ids(page: &RecipePage) -> Vec<&str> {
        page.data.iter().map(|r| r.id.as_str()).collect()
    }

    fn params(page: i64, page_size: i64) -> RecipeQuery {
        RecipeQuery {
            page,
            page_size,
            ..Default::default()
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let all = catalog();
        for q in ["greek", "SALAD", "ek sa"] {
            let result = query(
                &all,
                &RecipeQuery {
                    search_query: Some(q.to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
            assert!(ids(&result).contains(&"1"), "query {:?}", q);
        }
    }

    #[test]
    fn test_ownership_filter_is_exact() {
        let all = catalog();
        let result = query(
            &all,
            &RecipeQuery {
                filter_owned_recipes: true,
                current_user_email: Some("a@mail.com".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(ids(&result), vec!["1", "4"]);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_ownership_then_search() {
        let all = catalog();
        let result = query(
            &all,
            &RecipeQuery {
                search_query: Some("salad".to_string()),
                filter_owned_recipes: true,
                current_user_email: Some("b@mail.com".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(ids(&result), vec!["5"]);
    }

    #[test]
    fn test_ownership_filter_requires_user() {
        let all = catalog();
        for email in [None, Some(String::new())] {
            let err = query(
                &all,
                &RecipeQuery {
                    filter_owned_recipes: true,
                    current_user_email: email,
                    ..Default::default()
                },
            )
            .unwrap_err();
            assert!(matches!(err, AppError::Unauthenticated(_)));
        }
    }

    #[test]
    fn test_total_counts_filtered_set() {
        let all = catalog();
        let result = query(
            &all,
            &RecipeQuery {
                search_query: Some("salad".to_string()),
                page: 1,
                page_size: 2,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(result.total, 3);
        assert_eq!(ids(&result), vec!["1", "3"]);
    }

    #[test]
    fn test_pages_cover_the_filtered_set() {
        let all = catalog();
        for page_size in 1..=6 {
            let total = query(&all, &params(1, page_size)).unwrap().total;
            let pages = (total as i64 + page_size - 1) / page_size;

            let mut seen = Vec::new();
            for page in 1..=pages {
                seen.extend(
                    query(&all, &params(page, page_size))
                        .unwrap()
                        .data
                        .into_iter()
                        .map(|r| r.id),
                );
            }

            let unique: HashSet<&String> = seen.iter().collect();
            assert_eq!(seen.len(), all.len(), "page_size {}", page_size);
            assert_eq!(unique.len(), all.len(), "page_size {}", page_size);
        }
    }

    #[test]
    fn test_page_keeps_store_order() {
        let all = catalog();
        assert_eq!(ids(&query(&all, &params(2, 2)).unwrap()), vec!["3", "4"]);
        assert_eq!(ids(&query(&all, &params(3, 2)).unwrap()), vec!["5"]);
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let all = catalog();
        for (page, page_size) in [(0, 2), (-1, 2), (1, 0), (2, -3), (4, 2), (i64::MAX, i64::MAX)] {
            let result = query(&all, &params(page, page_size)).unwrap();
            assert!(result.data.is_empty(), "page {} size {}", page, page_size);
            assert_eq!(result.total, 5);
        }
    }

    #[test]
    fn test_query_is_idempotent() {
        let all = catalog();
        let q = RecipeQuery {
            search_query: Some("a".to_string()),
            page: 2,
            page_size: 2,
            ..Default::default()
        };
        assert_eq!(query(&all, &q).unwrap(), query(&all, &q).unwrap());
    }

    #[test]
    fn test_empty_collection_is_an_empty_page() {
        let result = query(&[], &RecipeQuery::default()).unwrap();
        assert!(result.data.is_empty());
        assert_eq!(result.total, 0);
    }
}
