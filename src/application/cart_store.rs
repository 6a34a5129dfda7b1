//! The cart store: in-memory cart state mirrored to durable storage.

use crate::domain::{CartState, DomainResult, Product};
use crate::infrastructure::{KeyValueStorage, StorageWriter};

/// Well-known durable-storage key for the cart snapshot.
pub const CART_STORAGE_KEY: &str = "cart";

/// Owns the cart state and mirrors every items-changing mutation to durable
/// storage.
///
/// Mutations update memory first and return immediately; the storage write
/// is handed to the background writer and its outcome never affects the
/// caller. Reads are side-effect free.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use shopfront::application::CartStore;
/// use shopfront::domain::Product;
/// use shopfront::infrastructure::{MemoryStorage, StorageWriter};
///
/// let writer = StorageWriter::spawn(Arc::new(MemoryStorage::new()));
/// let mut cart = CartStore::new(writer);
/// cart.add_item(Product::new(1, "Mouse", 10.0), 2).unwrap();
///
/// assert_eq!(cart.state().total_amount, 20.0);
/// ```
pub struct CartStore {
    state: CartState,
    writer: StorageWriter,
}

impl CartStore {
    /// Creates an empty cart store.
    pub fn new(writer: StorageWriter) -> Self {
        Self {
            state: CartState::default(),
            writer,
        }
    }

    /// Rehydrates the cart from storage at startup.
    ///
    /// An absent or malformed snapshot degrades to the empty cart; this
    /// never fails the application. Read path only, nothing is written back.
    pub fn restore_from(storage: &dyn KeyValueStorage, writer: StorageWriter) -> Self {
        let snapshot = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<CartState>(&json) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed cart snapshot");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read cart snapshot");
                None
            }
        };

        Self {
            state: CartState::restore(snapshot),
            writer,
        }
    }

    /// Current cart snapshot.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Adds `quantity` units of `product`, then mirrors the cart to storage.
    pub fn add_item(&mut self, product: Product, quantity: u32) -> DomainResult<()> {
        self.state.add_item(product, quantity)?;
        self.persist();
        Ok(())
    }

    /// Removes the line for `product_id`; a no-op removal writes nothing.
    pub fn remove_item(&mut self, product_id: u64) {
        if self.state.remove_item(product_id) {
            self.persist();
        }
    }

    /// Sets the quantity for `product_id` (zero removes the line); a no-op
    /// update writes nothing.
    pub fn update_quantity(&mut self, product_id: u64, quantity: u32) {
        if self.state.update_quantity(product_id, quantity) {
            self.persist();
        }
    }

    /// Empties the cart and erases the durable key itself.
    pub fn clear(&mut self) {
        self.state.clear();
        self.writer.remove(CART_STORAGE_KEY);
    }

    fn persist(&self) {
        match serde_json::to_string(&self.state) {
            Ok(json) => self.writer.set(CART_STORAGE_KEY, json),
            Err(e) => tracing::error!(error = %e, "failed to serialize cart state"),
        }
    }
}
