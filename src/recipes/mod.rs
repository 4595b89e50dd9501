//! Recipe lifecycle: create, read, update, delete and list.
//!
//! The service owns no state beyond handles to the document and blob stores.
//! Recipes are keyed by a generated id, so two recipes may share a name.

use std::sync::Arc;

use crate::db::{BlobStore, DocumentStore, StoredDocument};
use crate::errors::AppError;
use crate::ingest::build_recipe;
use crate::models::{Identity, RawRecipeFields, Recipe, RecipeAck, RecipeDocument};
use crate::search::{self, RecipePage, RecipeQuery};

/// Collection holding recipe documents.
pub const RECIPES_COLLECTION: &str = "recipe";

/// Recipe lifecycle controller.
///
/// Stores are injected at construction; the handlers share one instance via `AppState`.
pub struct RecipeService {
    docs: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl RecipeService {
    pub fn new(docs: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { docs, blobs }
    }

    /// Build and store a new recipe. Every failure surfaces as a validation error.
    ///
    /// A signed-in non-admin always becomes the author, whatever the body says.
    pub async fn create(
        &self,
        mut fields: RawRecipeFields,
        actor: Option<&Identity>,
    ) -> Result<RecipeAck, AppError> {
        fields.author = match actor {
            Some(actor) if !actor.is_admin => actor.email.clone(),
            Some(actor) if fields.author.is_empty() => actor.email.clone(),
            _ => fields.author,
        };

        let id = self
            .try_create(fields)
            .await
            .map_err(|e| AppError::Validation(e.message()))?;

        tracing::info!("Created recipe {}", id);
        Ok(RecipeAck {
            id,
            message: "Recipe created successfully".to_string(),
        })
    }

    async fn try_create(&self, fields: RawRecipeFields) -> Result<String, AppError> {
        require_name(&fields)?;
        let document = build_recipe(self.blobs.as_ref(), fields).await?;
        let body = serde_json::to_value(&document)?;
        self.docs.insert(RECIPES_COLLECTION, &body).await
    }

    /// Fetch one recipe. Unreadable documents count as missing.
    pub async fn read(&self, id: &str) -> Result<Recipe, AppError> {
        self.find(id)
            .await?
            .and_then(readable)
            .ok_or_else(|| not_found(id))
    }

    /// Replace a recipe wholesale with freshly built fields.
    ///
    /// Only admins and trusted gateway calls may hand a recipe to another author.
    pub async fn update(
        &self,
        id: &str,
        mut fields: RawRecipeFields,
        actor: Option<&Identity>,
    ) -> Result<RecipeAck, AppError> {
        let existing = self.read(id).await?;
        authorize(&existing, actor)?;

        let may_reassign = actor.map_or(true, |actor| actor.is_admin);
        if fields.author.is_empty() || !may_reassign {
            fields.author = existing.document.author;
        }

        require_name(&fields).map_err(|e| AppError::Validation(e.message()))?;
        let document = build_recipe(self.blobs.as_ref(), fields)
            .await
            .map_err(|e| AppError::Validation(AppError::from(e).message()))?;
        let body = serde_json::to_value(&document)?;

        if !self.docs.update(RECIPES_COLLECTION, id, &body).await? {
            return Err(not_found(id));
        }

        tracing::info!("Updated recipe {}", id);
        Ok(RecipeAck {
            id: id.to_string(),
            message: "Recipe updated successfully".to_string(),
        })
    }

    /// Remove a recipe. Deleting an unknown id succeeds.
    ///
    /// An unreadable document has no known author, so only admins and the gateway may remove it.
    pub async fn delete(&self, id: &str, actor: Option<&Identity>) -> Result<RecipeAck, AppError> {
        if let Some(doc) = self.find(id).await? {
            let existing = readable(doc).unwrap_or_else(|| Recipe {
                id: id.to_string(),
                document: RecipeDocument::default(),
            });
            authorize(&existing, actor)?;
        }

        self.docs.delete(RECIPES_COLLECTION, id).await?;

        tracing::info!("Deleted recipe {}", id);
        Ok(RecipeAck {
            id: id.to_string(),
            message: "Recipe deleted successfully".to_string(),
        })
    }

    /// Load the whole collection and filter it in memory.
    pub async fn list(&self, params: &RecipeQuery) -> Result<RecipePage, AppError> {
        let stored = self.docs.list_all(RECIPES_COLLECTION).await?;
        if stored.is_empty() {
            return Err(AppError::EmptyCollection("No recipes found".to_string()));
        }

        let recipes: Vec<Recipe> = stored.into_iter().filter_map(readable).collect();
        search::query(&recipes, params)
    }

    async fn find(&self, id: &str) -> Result<Option<StoredDocument>, AppError> {
        self.docs.get_by_id(RECIPES_COLLECTION, id).await
    }
}

/// Decode a stored recipe, logging and dropping documents of the wrong shape.
fn readable(doc: StoredDocument) -> Option<Recipe> {
    let id = doc.id.clone();
    match Recipe::from_stored(doc.id, doc.body) {
        Ok(recipe) => Some(recipe),
        Err(e) => {
            tracing::warn!("Skipping unreadable recipe {}: {}", id, e);
            None
        }
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Recipe {} not found", id))
}

fn require_name(fields: &RawRecipeFields) -> Result<(), AppError> {
    if fields.name.trim().is_empty() {
        return Err(AppError::Validation("Recipe name is required".to_string()));
    }
    Ok(())
}

/// Signed-in callers may only change their own recipes unless they are admins.
/// Calls without an identity come straight from the trusted gateway.
fn authorize(recipe: &Recipe, actor: Option<&Identity>) -> Result<(), AppError> {
    match actor {
        Some(actor) if !actor.can_modify(recipe.author()) => Err(AppError::Forbidden(format!(
            "Recipe {} belongs to another user",
            recipe.id
        ))),
        _ => Ok(()),
    }
}
