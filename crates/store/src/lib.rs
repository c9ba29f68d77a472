//! Cross-page session and UI state with change subscription.
//!
//! The store is a plain value: the shell constructs one, seeds it from
//! durable session storage, and lends it to page initializers. Subscribers
//! are notified in registration order, only when a key's value actually
//! changes, and a subscriber error aborts the remaining notifications for
//! that call and surfaces to whoever set the value.

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};

use anyhow::Error;
use log::{debug, error};
use serde_json::Value;
use std::collections::HashMap;

/// Well-known state keys seeded at startup.
pub mod keys {
    /// The signed-in user record, absent for visitors.
    pub const USER: &str = "user";
    /// Transient global busy flag.
    pub const IS_LOADING: &str = "isLoading";
    /// Last surfaced error, `null` when clear.
    pub const ERROR: &str = "error";
}

/// Storage key under which the user record persists between sessions.
const PERSISTED_USER_KEY: &str = "user";

/// Callback invoked with the new value after a watched key changes.
pub type Subscriber = Box<dyn FnMut(&Value) -> Result<(), Error>>;

/// Opaque handle identifying one registration. Registering the same
/// callback twice yields two independent handles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Subscription(u64);

#[derive(Default)]
pub struct Store {
    state: HashMap<String, Value>,
    subscribers: HashMap<String, Vec<(Subscription, Subscriber)>>,
    next_token: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct with injected initial state. No subscribers exist yet, so
    /// nothing is notified.
    pub fn with_initial(initial: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            state: initial.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Read a value; missing keys yield `None` with no side effects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Write a value. When it differs from the current one, the change is
    /// logged and every subscriber for `key` runs in registration order.
    ///
    /// # Errors
    ///
    /// Propagates the first subscriber error; later subscribers for this
    /// call are skipped. The new value is already stored at that point.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        if self.state.get(key) == Some(&value) {
            return Ok(());
        }
        debug!("state updated: {key} = {value}");
        self.state.insert(key.to_owned(), value.clone());
        if let Some(list) = self.subscribers.get_mut(key) {
            for (_, callback) in list.iter_mut() {
                callback(&value)?;
            }
        }
        Ok(())
    }

    /// Watch a key. The callback fires with each new value until the
    /// returned handle is passed to [`Store::unsubscribe`].
    pub fn subscribe(
        &mut self,
        key: &str,
        callback: impl FnMut(&Value) -> Result<(), Error> + 'static,
    ) -> Subscription {
        self.next_token += 1;
        let token = Subscription(self.next_token);
        self.subscribers
            .entry(key.to_owned())
            .or_default()
            .push((token, Box::new(callback)));
        token
    }

    /// Remove one registration. Returns whether the handle was still live.
    pub fn unsubscribe(&mut self, token: Subscription) -> bool {
        for list in self.subscribers.values_mut() {
            if let Some(position) = list.iter().position(|(held, _)| *held == token) {
                list.remove(position);
                return true;
            }
        }
        false
    }

    /// Seed session state at startup: restore the persisted user record when
    /// parseable, then set the default transient flags.
    ///
    /// A corrupt record is logged, removed from storage, and otherwise
    /// tolerated; the user stays unset.
    ///
    /// # Errors
    ///
    /// Only subscriber errors raised by the seeding writes propagate.
    pub fn initialize(&mut self, storage: &mut dyn SessionStorage) -> Result<(), Error> {
        if let Some(raw) = storage.get_item(PERSISTED_USER_KEY) {
            match serde_json::from_str::<Value>(&raw) {
                Ok(user) => self.set(keys::USER, user)?,
                Err(err) => {
                    error!("discarding unparseable persisted user record: {err}");
                    storage.remove_item(PERSISTED_USER_KEY)?;
                }
            }
        }
        self.set(keys::IS_LOADING, false)?;
        self.set(keys::ERROR, Value::Null)?;
        Ok(())
    }
}
