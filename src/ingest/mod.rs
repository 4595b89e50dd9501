//! Recipe ingestion pipeline.
//!
//! Turns raw form fields into the canonical recipe document: ingredient text is
//! split into entries, inline images are stored as blobs, and the nutritional
//! fields are nested under `nutritionalValues`.

pub mod image;
pub mod ingredients;

use thiserror::Error;

use crate::db::BlobStore;
use crate::models::{Ingredients, NutritionalValues, RawRecipeFields, RecipeDocument};

/// Failures raised while normalizing recipe input.
#[derive(Error, Debug, PartialEq)]
pub enum PipelineError {
    #[error("Invalid ingredients: {0}")]
    InvalidInput(String),

    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    #[error("Image upload failed: {0}")]
    UploadFailure(String),
}

/// Build the document for a recipe from raw request fields.
///
/// The image is ingested before the ingredients are split, so a bad ingredient
/// payload can still leave an uploaded blob behind.
pub async fn build_recipe(
    blobs: &dyn BlobStore,
    fields: RawRecipeFields,
) -> Result<RecipeDocument, PipelineError> {
    let RawRecipeFields {
        name,
        description,
        ingredients,
        image,
        calories,
        fat,
        proteins,
        author,
        preparation,
    } = fields;

    let image = image::ingest(blobs, image.as_deref(), &name).await?;
    let ingredients = ingredients::normalize(&ingredients)?;

    Ok(RecipeDocument {
        author,
        name,
        description,
        ingredients: Ingredients::List(ingredients),
        preparation,
        nutritional_values: NutritionalValues {
            calories: calories.unwrap_or_default(),
            fat: fat.unwrap_or_default(),
            proteins: proteins.unwrap_or_default(),
        },
        image,
    })
}
