use serde::{Deserialize, Serialize};

/// One catalog entry, serialized exactly as it sits in the durable slot.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub price: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Encoded image payload (a `data:` URL).
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub file_name: String,
    /// Creation time in epoch milliseconds. Two quick submissions can share one.
    pub id: i64,
}

impl Product {
    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }
}

/// Raw form input, before validation.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// An uploaded image file as received from the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}
