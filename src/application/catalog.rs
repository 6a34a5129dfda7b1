//! Catalog store: product list and detail state mirroring the API.

use crate::domain::{Product, ProductPage};

/// Owns the browsable product list, the currently opened product, and
/// request progress flags. Holds no persistence; the catalog is refetched
/// from the API each session.
#[derive(Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    selected_product: Option<Product>,
    total: u64,
    is_loading: bool,
    error: Option<String>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selected_product.as_ref()
    }

    /// Total number of products the remote catalog reports, which may
    /// exceed the fetched page.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Marks a catalog request as in flight.
    pub fn begin_fetch(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Applies the outcome of a product-list request. Failure records the
    /// message and retains the previously fetched list.
    pub fn set_products_result(&mut self, result: Result<ProductPage, String>) {
        self.is_loading = false;
        match result {
            Ok(page) => {
                self.products = page.products;
                self.total = page.total;
            }
            Err(message) => self.error = Some(message),
        }
    }

    /// Applies the outcome of a product-detail request.
    pub fn set_product_result(&mut self, result: Result<Product, String>) {
        self.is_loading = false;
        match result {
            Ok(product) => self.selected_product = Some(product),
            Err(message) => self.error = Some(message),
        }
    }

    pub fn clear_selected_product(&mut self) {
        self.selected_product = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
