//! View model handed to the frontend in place of server-side templating.

use serde::Serialize;

use super::product::Product;
use super::search::Hit;

const DESCRIPTION_PREVIEW_CHARS: usize = 16;

pub const ADD_LABEL: &str = "Add Product";
pub const UPDATE_LABEL: &str = "Update Product";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductCard {
    /// Position in the full catalog; the handle for edit/delete.
    pub index: usize,
    pub name: String,
    pub price_label: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CatalogView {
    pub cards: Vec<ProductCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
    pub editing: Option<usize>,
    pub submit_label: &'static str,
}

/// Form prefill for the record under edit. The image is never prefilled.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EditForm {
    pub index: usize,
    pub name: String,
    pub price: String,
    pub category: String,
    pub description: String,
    pub submit_label: &'static str,
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn card(index: usize, product: &Product) -> ProductCard {
    ProductCard {
        index,
        name: product.name.clone(),
        price_label: format!("${}", product.price),
        category: product.category.clone(),
        description: product
            .has_description()
            .then(|| truncate_text(&product.description, DESCRIPTION_PREVIEW_CHARS)),
        image: (!product.image.is_empty()).then(|| product.image.clone()),
    }
}

pub fn submit_label(editing: Option<usize>) -> &'static str {
    if editing.is_some() { UPDATE_LABEL } else { ADD_LABEL }
}

/// Build the card grid for a (possibly filtered) result set.
pub fn catalog_view(hits: &[Hit<'_>], query: &str, editing: Option<usize>) -> CatalogView {
    let query = query.trim();
    let empty_message = if !hits.is_empty() {
        None
    } else if query.is_empty() {
        Some("No products found".to_string())
    } else {
        Some(format!("No products found for \"{}\"", query.to_lowercase()))
    };
    CatalogView {
        cards: hits.iter().map(|h| card(h.index, h.product)).collect(),
        empty_message,
        editing,
        submit_label: submit_label(editing),
    }
}

pub fn edit_form(index: usize, product: &Product) -> EditForm {
    EditForm {
        index,
        name: product.name.clone(),
        price: product.price.clone(),
        category: product.category.clone(),
        description: product.description.clone(),
        submit_label: UPDATE_LABEL,
    }
}
