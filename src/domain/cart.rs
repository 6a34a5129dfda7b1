//! Cart state and its mutation rules.
//!
//! The cart is the one container with real invariants: items are unique by
//! product id, both aggregate totals are recomputed before any mutation
//! returns, and a persisted snapshot restores to an equivalent state with
//! totals recomputed rather than trusted.

use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};
use super::models::Product;

/// One product plus its quantity and derived subtotal within the cart.
///
/// `total_price` is denormalized and recomputed on every mutation; it is
/// never treated as authoritative on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product: Product,
    pub quantity: u32,
    pub total_price: f64,
}

/// The full set of line items plus derived aggregate totals.
///
/// Mutations keep three invariants: at most one line per product id (adding
/// an existing product merges quantities), totals exactly equal the sums
/// over `items` after every operation, and no line with a zero quantity is
/// ever stored (updating a quantity to zero removes the line).
///
/// # Examples
///
/// ```
/// use shopfront::domain::{CartState, Product};
///
/// let mut cart = CartState::default();
/// cart.add_item(Product::new(1, "Mouse", 10.0), 2).unwrap();
/// cart.add_item(Product::new(1, "Mouse", 10.0), 3).unwrap();
///
/// assert_eq!(cart.items.len(), 1);
/// assert_eq!(cart.total_items, 5);
/// assert_eq!(cart.total_amount, 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartState {
    pub items: Vec<LineItem>,
    pub total_items: u32,
    pub total_amount: f64,
}

impl CartState {
    /// Adds `quantity` units of `product` to the cart.
    ///
    /// If a line for the same product id already exists its quantity is
    /// incremented, otherwise a new line is appended at the end. Rejects a
    /// zero quantity and a negative or non-finite unit price without
    /// mutating the cart.
    ///
    /// # Arguments
    ///
    /// * `product` - Product to add; only `id` and `price` are interpreted
    /// * `quantity` - Number of units, at least 1
    pub fn add_item(&mut self, product: Product, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(DomainError::InvalidPrice(product.price));
        }

        match self.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(quantity);
                item.total_price = line_total(&item.product, item.quantity);
            }
            None => {
                let total_price = line_total(&product, quantity);
                self.items.push(LineItem {
                    product,
                    quantity,
                    total_price,
                });
            }
        }

        self.recalculate();
        Ok(())
    }

    /// Removes the line for `product_id`, preserving the order of the rest.
    ///
    /// Removing an absent id is a no-op. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product.id != product_id);
        let removed = self.items.len() != before;
        if removed {
            self.recalculate();
        }
        removed
    }

    /// Sets the quantity of the line for `product_id`.
    ///
    /// A zero quantity removes the line. An absent id is a no-op, so stale
    /// UI state cannot resurrect a removed item. Returns whether the cart
    /// changed.
    pub fn update_quantity(&mut self, product_id: u64, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        match self.items.iter_mut().find(|item| item.product.id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                item.total_price = line_total(&item.product, quantity);
                self.recalculate();
                true
            }
            None => false,
        }
    }

    /// Empties the cart and zeroes both totals.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total_items = 0;
        self.total_amount = 0.0;
    }

    /// Rebuilds a cart from an optional persisted snapshot.
    ///
    /// An absent snapshot yields the empty cart. Snapshot items are
    /// re-normalized on the way in: duplicate product ids are merged, zero
    /// quantities dropped, and every subtotal and both aggregate totals are
    /// recomputed from scratch rather than trusted from storage.
    pub fn restore(snapshot: Option<CartState>) -> CartState {
        let mut state = CartState::default();
        let Some(snapshot) = snapshot else {
            return state;
        };

        for item in snapshot.items {
            if item.quantity == 0 {
                continue;
            }
            match state
                .items
                .iter_mut()
                .find(|line| line.product.id == item.product.id)
            {
                Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                None => state.items.push(item),
            }
        }

        for item in &mut state.items {
            item.total_price = line_total(&item.product, item.quantity);
        }

        state.recalculate();
        state
    }

    /// Returns whether the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn recalculate(&mut self) {
        let (total_items, total_amount) = recompute(&self.items);
        self.total_items = total_items;
        self.total_amount = total_amount;
    }
}

fn line_total(product: &Product, quantity: u32) -> f64 {
    product.price * f64::from(quantity)
}

/// Derives both aggregate totals from a list of line items.
///
/// This is the single source of truth for `total_items` and `total_amount`;
/// every mutating operation calls it as its final step.
pub fn recompute(items: &[LineItem]) -> (u32, f64) {
    let total_items = items.iter().map(|item| item.quantity).sum();
    let total_amount = items
        .iter()
        .map(|item| item.product.price * f64::from(item.quantity))
        .sum();
    (total_items, total_amount)
}
