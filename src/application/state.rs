//! The composition root tying the stores to storage and the remote API.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{Credentials, DomainResult, Product};
use crate::infrastructure::{ApiClient, FileStorage, KeyValueStorage, StorageWriter};

use super::cart_store::CartStore;
use super::catalog::CatalogStore;
use super::search::SearchStore;
use super::session::SessionStore;

/// The storefront client core: four state stores plus their collaborators.
///
/// Construction rehydrates every persisted store from `storage` without
/// writing back. Intent methods run the blocking API call between the
/// owning store's `begin`/`set_result` pair; a UI collaborator that manages
/// its own request scheduling can instead drive those pairs directly
/// through the `_mut` accessors.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use shopfront::application::Storefront;
/// use shopfront::domain::Product;
/// use shopfront::infrastructure::{ApiClient, MemoryStorage};
///
/// let api = ApiClient::new().unwrap();
/// let mut storefront = Storefront::new(api, Arc::new(MemoryStorage::new()));
///
/// storefront.add_to_cart(Product::new(1, "Mouse", 10.0), 2).unwrap();
/// assert_eq!(storefront.cart().state().total_amount, 20.0);
/// ```
pub struct Storefront {
    api: ApiClient,
    writer: StorageWriter,
    session: SessionStore,
    cart: CartStore,
    catalog: CatalogStore,
    search: SearchStore,
}

impl Storefront {
    /// Wires the stores over the given API client and storage backend and
    /// rehydrates session, cart, and search history.
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStorage>) -> Self {
        let writer = StorageWriter::spawn(storage.clone());

        let session = SessionStore::restore_from(storage.as_ref(), writer.clone());
        let cart = CartStore::restore_from(storage.as_ref(), writer.clone());
        let search = SearchStore::restore_from(storage.as_ref(), writer.clone());

        Self {
            api,
            writer,
            session,
            cart,
            catalog: CatalogStore::new(),
            search,
        }
    }

    /// Opens a storefront over file-backed storage rooted at `base_dir`,
    /// against the public demo API.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self, String> {
        let api = ApiClient::new()?;
        Ok(Self::new(api, Arc::new(FileStorage::new(base_dir))))
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut CatalogStore {
        &mut self.catalog
    }

    pub fn search(&self) -> &SearchStore {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchStore {
        &mut self.search
    }

    /// Signs in with the given credentials.
    pub fn login(&mut self, username: &str, password: &str) {
        self.session.begin_login();
        let result = self.api.login(&Credentials::new(username, password));
        self.session.set_login_result(result);
    }

    /// Refetches the signed-in user's profile; a no-op when signed out.
    pub fn refresh_profile(&mut self) {
        let Some(token) = self.session.token().map(str::to_string) else {
            return;
        };
        let result = self.api.get_user_profile(&token);
        self.session.set_profile_result(result);
    }

    /// Signs out and resets the cart, erasing both from durable storage.
    pub fn logout(&mut self) {
        self.session.logout();
        self.cart.clear();
    }

    /// Fetches the product catalog into the catalog store.
    pub fn load_products(&mut self) {
        self.catalog.begin_fetch();
        let result = self.api.get_products();
        self.catalog.set_products_result(result);
    }

    /// Fetches one product into the catalog store's selection.
    pub fn load_product(&mut self, id: u64) {
        self.catalog.begin_fetch();
        let result = self.api.get_product_by_id(id);
        self.catalog.set_product_result(result);
    }

    /// Runs a product search and records the query in the history when the
    /// request succeeds.
    pub fn perform_search(&mut self, query: &str) {
        self.search.begin_search();
        let result = self.api.search_products(query);
        let succeeded = result.is_ok();
        self.search.set_search_result(query, result);
        if succeeded {
            self.search.add_recent(query);
        }
    }

    pub fn add_to_cart(&mut self, product: Product, quantity: u32) -> DomainResult<()> {
        self.cart.add_item(product, quantity)
    }

    pub fn remove_from_cart(&mut self, product_id: u64) {
        self.cart.remove_item(product_id);
    }

    pub fn update_cart_quantity(&mut self, product_id: u64, quantity: u32) {
        self.cart.update_quantity(product_id, quantity);
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Durability barrier: blocks until pending storage writes have been
    /// applied. Hosts may call this at shutdown; mutations never do.
    pub fn flush_storage(&self) {
        self.writer.flush();
    }
}
