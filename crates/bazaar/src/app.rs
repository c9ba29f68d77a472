//! Shell wiring: one document, one store, one storage, one router.

use crate::api::ApiClient;
use crate::config::ShellConfig;
use crate::{pages, session};
use anyhow::Error;
use dom::{Document, NodeId};
use log::info;
use router::{
    FragmentSource, HttpSource, NavOutcome, PageContext, Router, internal_link_target,
};
use serde_json::Value;
use std::sync::Arc;
use store::{SessionStorage, Store};

/// Element id of the content region the router owns.
pub const CONTENT_REGION_ID: &str = "app-content";

pub struct App {
    config: ShellConfig,
    document: Document,
    store: Store,
    storage: Box<dyn SessionStorage>,
    router: Router,
    /// Present when a backend base URL is configured; pages fall back to
    /// the mock catalog otherwise.
    api: Option<ApiClient>,
}

impl App {
    /// Wire up the shell against the default HTTP/file fragment source.
    ///
    /// # Errors
    ///
    /// Fails when the route table is malformed.
    pub fn new(
        config: ShellConfig,
        document: Document,
        storage: Box<dyn SessionStorage>,
    ) -> Result<Self, Error> {
        Self::with_source(config, document, storage, Arc::new(HttpSource))
    }

    /// Wire up the shell with an explicit fragment source.
    ///
    /// # Errors
    ///
    /// Fails when the route table is malformed.
    pub fn with_source(
        config: ShellConfig,
        document: Document,
        storage: Box<dyn SessionStorage>,
        source: Arc<dyn FragmentSource>,
    ) -> Result<Self, Error> {
        let table = pages::routes()?;
        let router = Router::new(table, config.pages_base.clone(), source, "/")
            .with_content_region(CONTENT_REGION_ID);
        let api = config.api_base.clone().map(ApiClient::new);
        Ok(Self {
            config,
            document,
            store: Store::new(),
            storage,
            router,
            api,
        })
    }

    /// Seed state from durable storage. Runs once, before the first render.
    ///
    /// # Errors
    ///
    /// Propagates storage write and store subscriber errors.
    pub fn bootstrap(&mut self) -> Result<(), Error> {
        info!("initializing marketplace shell");
        self.store.initialize(self.storage.as_mut())
    }

    /// Initial render of the current location.
    ///
    /// # Errors
    ///
    /// Propagates page initializer errors.
    pub async fn open(&mut self) -> Result<NavOutcome, Error> {
        let Self {
            document,
            store,
            storage,
            router,
            ..
        } = self;
        let mut ctx = PageContext {
            document,
            store,
            storage: storage.as_mut(),
        };
        router.handle_location(&mut ctx).await
    }

    /// Navigate to a path.
    ///
    /// # Errors
    ///
    /// Propagates page initializer errors.
    pub async fn go(&mut self, path: &str) -> Result<NavOutcome, Error> {
        self.go_with_state(path, None).await
    }

    /// Navigate to a path with an associated history state object.
    ///
    /// # Errors
    ///
    /// Propagates page initializer errors.
    pub async fn go_with_state(
        &mut self,
        path: &str,
        state: Option<Value>,
    ) -> Result<NavOutcome, Error> {
        let Self {
            document,
            store,
            storage,
            router,
            ..
        } = self;
        let mut ctx = PageContext {
            document,
            store,
            storage: storage.as_mut(),
        };
        router.navigate_to(&mut ctx, path, state).await
    }

    /// Move back one history entry. `None` at the oldest entry.
    ///
    /// # Errors
    ///
    /// Propagates page initializer errors.
    pub async fn back(&mut self) -> Result<Option<NavOutcome>, Error> {
        let Self {
            document,
            store,
            storage,
            router,
            ..
        } = self;
        let mut ctx = PageContext {
            document,
            store,
            storage: storage.as_mut(),
        };
        router.back(&mut ctx).await
    }

    /// Move forward one history entry. `None` at the newest entry.
    ///
    /// # Errors
    ///
    /// Propagates page initializer errors.
    pub async fn forward(&mut self) -> Result<Option<NavOutcome>, Error> {
        let Self {
            document,
            store,
            storage,
            router,
            ..
        } = self;
        let mut ctx = PageContext {
            document,
            store,
            storage: storage.as_mut(),
        };
        router.forward(&mut ctx).await
    }

    /// Route a click: marked internal anchors navigate client-side; anything
    /// else is left to the host environment (`None`).
    ///
    /// # Errors
    ///
    /// Propagates page initializer errors.
    pub async fn click(&mut self, node: NodeId) -> Result<Option<NavOutcome>, Error> {
        match internal_link_target(&self.document, node) {
            Some(href) => Ok(Some(self.go(&href).await?)),
            None => Ok(None),
        }
    }

    /// Sign in and follow the post-login redirect. `None` when the
    /// credentials were rejected (no navigation happens).
    ///
    /// # Errors
    ///
    /// Propagates storage, store subscriber, and initializer errors.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Option<NavOutcome>, Error> {
        let redirect = {
            let Self {
                document,
                store,
                storage,
                ..
            } = self;
            let mut ctx = PageContext {
                document,
                store,
                storage: storage.as_mut(),
            };
            session::login(&mut ctx, email, password)?
        };
        match redirect {
            Some(path) => {
                // Authenticated API calls from here on carry the token.
                if let Some(token) = self.storage.get_item(session::ACCESS_TOKEN_KEY) {
                    self.api = self.api.take().map(|client| client.with_token(&token));
                }
                Ok(Some(self.go(path).await?))
            }
            None => Ok(None),
        }
    }

    /// Sign out and land on the login page.
    ///
    /// # Errors
    ///
    /// Propagates storage, store subscriber, and initializer errors.
    pub async fn logout(&mut self) -> Result<NavOutcome, Error> {
        let path = {
            let Self {
                document,
                store,
                storage,
                ..
            } = self;
            let mut ctx = PageContext {
                document,
                store,
                storage: storage.as_mut(),
            };
            session::logout(&mut ctx)?
        };
        self.go(path).await
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn api(&self) -> Option<&ApiClient> {
        self.api.as_ref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Text of the content region, for display and assertions.
    pub fn region_text(&self) -> String {
        self.document
            .element_by_id(CONTENT_REGION_ID)
            .map(|region| self.document.text_content(region))
            .unwrap_or_default()
    }
}
