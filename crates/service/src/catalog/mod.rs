//! Product catalog: the record store, its form validation and the view model.

pub mod image;
pub mod live;
pub mod product;
pub mod search;
pub mod service;
pub mod store;
pub mod validation;
pub mod view;

pub use live::{LiveResult, LiveSearch};
pub use product::{ImageUpload, Product, ProductForm};
pub use service::{CatalogService, Deleted, Outcome, Submitted};
pub use store::RecordStore;
pub use validation::{Field, FieldError, ValidationErrors};
pub use view::{CatalogView, EditForm, ProductCard};
