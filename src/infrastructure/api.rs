//! Blocking HTTP client for the remote storefront API.
//!
//! Thin request/response plumbing over the public demo REST API. The stores
//! never call this directly; the [`Storefront`](crate::application::Storefront)
//! facade routes results into them. No retry policy and no token refresh.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{Credentials, LoginResponse, Product, ProductPage, UserProfile};

/// Base URL of the public demo REST API.
pub const API_BASE_URL: &str = "https://dummyjson.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for authentication, catalog, and search endpoints.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client against [`API_BASE_URL`].
    pub fn new() -> Result<Self, String> {
        Self::with_base_url(API_BASE_URL)
    }

    /// Creates a client against a custom base URL, e.g. a local stub server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, String> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| e.to_string())?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Exchanges credentials for the user's profile and a bearer token.
    pub fn login(&self, credentials: &Credentials) -> Result<LoginResponse, String> {
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(credentials)
            .send()
            .map_err(|e| e.to_string())?;
        decode(response)
    }

    /// Fetches the profile of the user the token belongs to.
    pub fn get_user_profile(&self, token: &str) -> Result<UserProfile, String> {
        let response = self
            .http
            .get(format!("{}/auth/me", self.base_url))
            .bearer_auth(token)
            .send()
            .map_err(|e| e.to_string())?;
        decode(response)
    }

    /// Fetches the first page of the product catalog.
    pub fn get_products(&self) -> Result<ProductPage, String> {
        let response = self
            .http
            .get(format!("{}/products", self.base_url))
            .send()
            .map_err(|e| e.to_string())?;
        decode(response)
    }

    /// Fetches a single product by id.
    pub fn get_product_by_id(&self, id: u64) -> Result<Product, String> {
        let response = self
            .http
            .get(format!("{}/products/{}", self.base_url, id))
            .send()
            .map_err(|e| e.to_string())?;
        decode(response)
    }

    /// Full-text product search.
    pub fn search_products(&self, query: &str) -> Result<ProductPage, String> {
        let response = self
            .http
            .get(format!("{}/products/search", self.base_url))
            .query(&[("q", query)])
            .send()
            .map_err(|e| e.to_string())?;
        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T, String> {
    if !response.status().is_success() {
        return Err(error_message(response));
    }
    response.json::<T>().map_err(|e| e.to_string())
}

/// Surfaces the server's `message` field when the error body carries one.
fn error_message(response: reqwest::blocking::Response) -> String {
    let status = response.status();

    #[derive(Deserialize)]
    struct ApiMessage {
        message: String,
    }

    match response.json::<ApiMessage>() {
        Ok(body) => body.message,
        Err(_) => format!("HTTP {}", status),
    }
}
