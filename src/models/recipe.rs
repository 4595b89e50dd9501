//! Recipe model matching the frontend recipe objects.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A nutritional quantity as entered by the user.
///
/// Values are never coerced: the form sends strings, older records hold numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Number(0.into())
    }
}

/// Nutritional values nested under a recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalValues {
    #[serde(default, deserialize_with = "null_as_default")]
    pub calories: Quantity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fat: Quantity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proteins: Quantity,
}

/// Ingredients as stored: a list for normalized records, a raw string for legacy ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ingredients {
    List(Vec<String>),
    Raw(String),
}

impl Default for Ingredients {
    fn default() -> Self {
        Ingredients::Raw(String::new())
    }
}

/// The persisted body of a recipe document. Missing fields read back as defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Ingredients,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preparation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nutritional_values: NutritionalValues,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
}

/// A recipe together with its document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    #[serde(flatten)]
    pub document: RecipeDocument,
}

impl Recipe {
    /// Rebuild a recipe from a stored document, tolerating legacy shapes.
    pub fn from_stored(id: String, body: Value) -> Result<Self, serde_json::Error> {
        let document = match body {
            Value::Null => RecipeDocument::default(),
            other => serde_json::from_value(other)?,
        };
        Ok(Self { id, document })
    }

    pub fn author(&self) -> &str {
        &self.document.author
    }

    pub fn name(&self) -> &str {
        &self.document.name
    }
}

/// Read an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body for creating or replacing a recipe.
///
/// Only the keys below are read; anything else in the body is dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecipeFields {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Free-form ingredient text; anything but a string is rejected later.
    #[serde(default)]
    pub ingredients: Value,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub calories: Option<Quantity>,
    #[serde(default)]
    pub fat: Option<Quantity>,
    #[serde(default)]
    pub proteins: Option<Quantity>,
    // Pass-through allow-list
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preparation: String,
}

/// Acknowledgement returned by create, update and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeAck {
    pub id: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_document_defaults() {
        let recipe = Recipe::from_stored(
            "r1".to_string(),
            json!({ "name": "Toast", "ingredients": "bread, butter" }),
        )
        .unwrap();

        assert_eq!(recipe.document.author, "");
        assert_eq!(recipe.document.image, "");
        assert_eq!(
            recipe.document.ingredients,
            Ingredients::Raw("bread, butter".to_string())
        );
        assert_eq!(recipe.document.nutritional_values, NutritionalValues::default());
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let recipe = Recipe::from_stored(
            "r2".to_string(),
            json!({
                "name": "Stew",
                "author": null,
                "image": null,
                "nutritionalValues": { "calories": null, "fat": "12" }
            }),
        )
        .unwrap();

        assert_eq!(recipe.document.author, "");
        assert_eq!(recipe.document.image, "");
        assert_eq!(recipe.document.nutritional_values.calories, Quantity::default());
        assert_eq!(
            recipe.document.nutritional_values.fat,
            Quantity::Text("12".to_string())
        );
    }

    #[test]
    fn test_serializes_flat_with_camel_case() {
        let recipe = Recipe {
            id: "abc".to_string(),
            document: RecipeDocument {
                name: "Soup".to_string(),
                ingredients: Ingredients::List(vec!["water".to_string()]),
                nutritional_values: NutritionalValues {
                    calories: Quantity::Text("120".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["ingredients"], json!(["water"]));
        assert_eq!(value["nutritionalValues"]["calories"], "120");
        assert_eq!(value["nutritionalValues"]["fat"], 0);
    }

    #[test]
    fn test_raw_fields_ignore_unlisted_keys() {
        let fields: RawRecipeFields = serde_json::from_value(json!({
            "name": "Pie",
            "ingredients": "flour",
            "calories": 300,
            "isFeatured": true
        }))
        .unwrap();

        assert_eq!(fields.name, "Pie");
        assert_eq!(fields.calories, Some(Quantity::Number(300.into())));
        assert!(fields.fat.is_none());
    }

    #[test]
    fn test_raw_fields_accept_nulls() {
        let fields: RawRecipeFields = serde_json::from_value(json!({
            "name": "Pie",
            "description": null,
            "ingredients": "flour",
            "image": null,
            "fat": null,
            "author": null,
            "preparation": null
        }))
        .unwrap();

        assert_eq!(fields.description, "");
        assert_eq!(fields.author, "");
        assert_eq!(fields.preparation, "");
        assert!(fields.image.is_none());
        assert!(fields.fat.is_none());
    }
}
