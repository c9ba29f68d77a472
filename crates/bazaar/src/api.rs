//! Backend API client.
//!
//! The shell runs on mock data until a backend exists, but the client
//! already speaks the eventual contract: JSON bodies, bearer-token
//! authorization, and error details surfaced from the response body.

use crate::mock::Product;
use anyhow::{Error, anyhow};
use log::error;
use reqwest::{Client, Method};
use serde_json::{Value, json};
use url::Url;

pub struct ApiClient {
    base: Url,
    http: Client,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            http: Client::new(),
            token: None,
        }
    }

    /// Attach the bearer token used for authenticated endpoints.
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_owned());
        self
    }

    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        requires_auth: bool,
    ) -> Result<Value, Error> {
        let url = self.base.join(endpoint)?;
        let mut request = self.http.request(method, url.clone());
        if requires_auth {
            let Some(token) = self.token.as_deref() else {
                return Err(anyhow!("authentication token not found"));
            };
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|err| anyhow!("request to {url} failed: {err}"))?;
        let status = response.status();
        if !status.is_success() {
            error!("api error from {url}: {status}");
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|payload| {
                    payload
                        .get("detail")
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                });
            return Err(match detail {
                Some(detail) => anyhow!("{detail}"),
                None => anyhow!("api error: {status}"),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetch the public product list.
    ///
    /// # Errors
    ///
    /// Surfaces transport and non-success responses as errors.
    pub async fn products(&self) -> Result<Vec<Product>, Error> {
        let payload = self.request(Method::GET, "products", None, false).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Submit login credentials; resolves with user data and tokens.
    ///
    /// # Errors
    ///
    /// Surfaces transport and non-success responses as errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value, Error> {
        self.request(
            Method::POST,
            "auth/login",
            Some(&json!({"email": email, "password": password})),
            false,
        )
        .await
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Surfaces transport and non-success responses as errors.
    pub async fn register(&self, payload: &Value) -> Result<Value, Error> {
        self.request(Method::POST, "auth/register", Some(payload), false)
            .await
    }

    /// Fetch the signed-in user's profile. Requires a token; failing that
    /// is an error before any network I/O happens.
    ///
    /// # Errors
    ///
    /// Errors without a token, then as the other calls.
    pub async fn profile(&self) -> Result<Value, Error> {
        self.request(Method::GET, "users/me", None, true).await
    }
}
