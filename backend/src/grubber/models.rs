//! Grubber data models
//!
//! Defines restaurants, Grubber users and the favorite references between them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for any Grubber record
pub type RecordId = String;

/// Generate a new unique record ID (UUID v4)
pub fn generate_id() -> RecordId {
    Uuid::new_v4().to_string()
}

/// A restaurant listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Unique identifier
    pub id: RecordId,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    /// Images as sent by the client (URLs or image objects)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_images: Option<Value>,
    /// Website
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A Grubber user as created through the API
///
/// Favorites are not part of creation; they are only mutated through the
/// favorites endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrubberUser {
    /// Unique identifier
    pub id: RecordId,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Reference from a user to a restaurant, stored in the user's `favorites`
///
/// Only `id` is interpreted, and it is compared as an opaque JSON value. Any
/// other attributes the client sends are kept as-is. The referenced
/// restaurant is not required to exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRef {
    /// ID of the referenced restaurant
    pub id: Value,
    /// Additional client-supplied attributes
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FavoriteRef {
    /// Create a reference with no extra attributes
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }

    /// Convert into the stored list entry
    pub fn into_entry(self) -> Value {
        let mut entry = self.extra;
        entry.insert("id".to_string(), self.id);
        Value::Object(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_id_unique() {
        let id1 = generate_id();
        let id2 = generate_id();
        assert_ne!(id1, id2);
        assert!(!id1.is_empty());
    }

    #[test]
    fn test_restaurant_camel_case_and_omitted_fields() {
        let restaurant = Restaurant {
            id: "r1".to_string(),
            description: None,
            restaurant_name: Some("Noodle Bar".to_string()),
            restaurant_images: Some(json!(["a.png"])),
            url: None,
        };
        let value = serde_json::to_value(&restaurant).unwrap();
        assert_eq!(
            value,
            json!({"id": "r1", "restaurantName": "Noodle Bar", "restaurantImages": ["a.png"]})
        );
    }

    #[test]
    fn test_favorite_ref_keeps_extra_attributes() {
        let favorite: FavoriteRef =
            serde_json::from_value(json!({"id": "r1", "note": "great ramen"})).unwrap();
        assert_eq!(favorite.id, "r1");

        let numeric: FavoriteRef = serde_json::from_value(json!({"id": 7})).unwrap();
        assert_eq!(numeric.into_entry(), json!({"id": 7}));
        assert_eq!(favorite.extra["note"], "great ramen");

        let back = serde_json::to_value(&favorite).unwrap();
        assert_eq!(back, json!({"id": "r1", "note": "great ramen"}));
    }
}
