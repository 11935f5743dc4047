use super::product::Product;

/// An entry matched by a search, with its position in the full catalog.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub index: usize,
    pub product: &'a Product,
}

fn matches(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.category.to_lowercase().contains(needle)
        || (product.has_description() && product.description.to_lowercase().contains(needle))
}

/// Case-insensitive substring filter over name, category and description.
/// A blank query returns every record.
pub fn search<'a>(records: &'a [Product], query: &str) -> Vec<Hit<'a>> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, p)| needle.is_empty() || matches(p, &needle))
        .map(|(index, product)| Hit { index, product })
        .collect()
}
