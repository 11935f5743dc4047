//! Field acceptance rules for the product form.
//!
//! Every field is checked in a single pass and all failures are collected,
//! so callers can surface them together.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::product::{ImageUpload, ProductForm};

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\s-]{3,16}$").expect("name regex"));
static PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").expect("price regex"));
static CATEGORY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s]{3,20}$").expect("category regex"));
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^.{0,200}$").expect("description regex"));
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif)$").expect("image regex"));

pub const NAME_MESSAGE: &str =
    "Name must be 3-16 characters (letters, numbers, underscores, hyphens, spaces)";
pub const PRICE_MESSAGE: &str = "Price must be a valid number with up to 2 decimal places";
pub const CATEGORY_MESSAGE: &str = "Category must be 3-20 characters (letters and spaces only)";
pub const IMAGE_MISSING_MESSAGE: &str = "Please select an image file";
pub const IMAGE_TYPE_MESSAGE: &str = "Please select a valid image (JPG, JPEG, PNG, GIF)";
pub const DESCRIPTION_MESSAGE: &str = "Description must be 200 characters or less";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Price,
    Category,
    Image,
    Description,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Every failing field from one validation pass, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: Field) -> bool {
        self.fields.iter().any(|e| e.field == field)
    }

    fn push(&mut self, field: Field, message: &'static str) {
        self.fields.push(FieldError { field, message });
    }

    /// Banner text: all messages joined.
    pub fn summary(&self) -> String {
        self.fields.iter().map(|e| e.message).collect::<Vec<_>>().join("; ")
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

pub fn valid_name(raw: &str) -> bool {
    NAME_RE.is_match(raw.trim())
}

pub fn valid_price(raw: &str) -> bool {
    PRICE_RE.is_match(raw)
}

pub fn valid_category(raw: &str) -> bool {
    CATEGORY_RE.is_match(raw.trim())
}

pub fn valid_description(raw: &str) -> bool {
    DESCRIPTION_RE.is_match(raw)
}

pub fn valid_image_name(file_name: &str) -> bool {
    IMAGE_RE.is_match(file_name)
}

/// Check the whole form. `Ok` means every field passed.
pub fn validate_form(form: &ProductForm, image: Option<&ImageUpload>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if !valid_name(&form.name) {
        errors.push(Field::Name, NAME_MESSAGE);
    }
    if !valid_price(&form.price) {
        errors.push(Field::Price, PRICE_MESSAGE);
    }
    if !valid_category(&form.category) {
        errors.push(Field::Category, CATEGORY_MESSAGE);
    }
    match image {
        None => errors.push(Field::Image, IMAGE_MISSING_MESSAGE),
        Some(upload) if !valid_image_name(&upload.file_name) => {
            errors.push(Field::Image, IMAGE_TYPE_MESSAGE)
        }
        Some(_) => {}
    }
    if !valid_description(&form.description) {
        errors.push(Field::Description, DESCRIPTION_MESSAGE);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
