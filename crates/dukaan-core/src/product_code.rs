//! # Product Code Derivation
//!
//! A product code is the business key that groups batch rows of the same
//! SKU. It is derived from the SKU, never entered directly, and recomputed
//! on every product write so the grouping stays consistent with the SKU.

/// Derives the product code for a SKU.
///
/// ## Rules
/// - Lowercase the SKU
/// - Collapse every run of whitespace into a single `-`
/// - Trim leading/trailing whitespace first (no dangling hyphens)
///
/// Two SKUs that differ only in case or spacing map to the same code, which
/// is what makes successive purchase batches of one SKU share stock.
///
/// ## Example
/// ```rust
/// use dukaan_core::product_code::derive_product_code;
///
/// assert_eq!(derive_product_code("Basmati Rice 5kg"), "basmati-rice-5kg");
/// assert_eq!(derive_product_code("COKE-330"), "coke-330");
/// ```
pub fn derive_product_code(sku: &str) -> String {
    sku.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
