//! Recipe API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::models::{Identity, RawRecipeFields, Recipe, RecipeAck};
use crate::search::{RecipePage, RecipeQuery, DEFAULT_PAGE_SIZE};
use crate::AppState;

/// Query string of the recipe list. Values arrive as text and are coerced leniently.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecipesParams {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub filter_owned_recipes: Option<String>,
}

impl ListRecipesParams {
    pub fn into_query(self, user: Option<&Identity>) -> RecipeQuery {
        RecipeQuery {
            search_query: self.search_query.filter(|q| !q.is_empty()),
            page: self.page.as_deref().and_then(parse_leading_int).unwrap_or(1),
            page_size: self
                .page_size
                .as_deref()
                .and_then(parse_leading_int)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            filter_owned_recipes: self
                .filter_owned_recipes
                .as_deref()
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
                .unwrap_or(false),
            current_user_email: user.map(|u| u.email.clone()),
        }
    }
}

/// Integer prefix of a string (`"12abc"` is 12, `"2.5"` is 2); `None` without digits.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// GET /api/recipe - List recipes with search, ownership filter and pagination.
pub async fn list_recipes(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ListRecipesParams>,
) -> ApiResult<RecipePage> {
    let query = params.into_query(user.identity());
    Ok(Json(state.recipes.list(&query).await?))
}

/// GET /api/recipe/:id - Get a single recipe.
pub async fn get_recipe(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Recipe> {
    Ok(Json(state.recipes.read(&id).await?))
}

/// POST /api/recipe - Create a new recipe.
pub async fn create_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<RawRecipeFields>, JsonRejection>,
) -> ApiResult<RecipeAck> {
    let Json(fields) = body?;
    Ok(Json(state.recipes.create(fields, user.identity()).await?))
}

/// PUT /api/recipe/:id - Replace a recipe.
pub async fn update_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<RawRecipeFields>, JsonRejection>,
) -> ApiResult<RecipeAck> {
    let Json(fields) = body?;
    Ok(Json(state.recipes.update(&id, fields, user.identity()).await?))
}

/// DELETE /api/recipe/:id - Delete a recipe.
pub async fn delete_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<RecipeAck> {
    Ok(Json(state.recipes.delete(&id, user.identity()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("3"), Some(3));
        assert_eq!(parse_leading_int(" 12abc"), Some(12));
        assert_eq!(parse_leading_int("2.5"), Some(2));
        assert_eq!(parse_leading_int("-1"), Some(-1));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_params_defaults() {
        let query = ListRecipesParams::default().into_query(None);
        assert_eq!(query, RecipeQuery::default());
    }

    #[test]
    fn test_params_coercion() {
        let user = Identity::new("a@mail.com", false);
        let query = ListRecipesParams {
            page: Some("2".to_string()),
            page_size: Some("junk".to_string()),
            search_query: Some(String::new()),
            filter_owned_recipes: Some("true".to_string()),
        }
        .into_query(Some(&user));

        assert_eq!(query.page, 2);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.search_query, None);
        assert!(query.filter_owned_recipes);
        assert_eq!(query.current_user_email.as_deref(), Some("a@mail.com"));
    }
}
