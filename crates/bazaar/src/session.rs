//! Sign-in and sign-out against the session storage and state store.
//!
//! These functions never navigate; they hand the redirect target back so
//! the caller drives the router.

use crate::{mock, util};
use anyhow::Error;
use log::info;
use router::PageContext;
use serde_json::Value;
use store::{SessionStorage, keys};

/// Storage key holding the bearer token between sessions.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key holding the serialized user record between sessions.
const PERSISTED_USER_KEY: &str = "user";
/// Where a successful sign-in lands.
pub const DASHBOARD_PATH: &str = "/user/dashboard.html";
/// Where sign-out (and unauthenticated visitors) land.
pub const LOGIN_PATH: &str = "/auth/login.html";

/// Attempt a sign-in. On success the token and user record are persisted,
/// the user lands in the store, and the redirect target is returned.
/// `Ok(None)` means the credentials were rejected.
///
/// # Errors
///
/// Propagates storage write and store subscriber errors.
pub fn login(
    ctx: &mut PageContext<'_>,
    email: &str,
    password: &str,
) -> Result<Option<&'static str>, Error> {
    if !util::is_valid_email(email) {
        return Ok(None);
    }
    let Some((token, user)) = mock::authenticate(email, password) else {
        info!("rejected sign-in for {email}");
        return Ok(None);
    };
    ctx.storage.set_item(ACCESS_TOKEN_KEY, &token)?;
    ctx.storage.set_item(PERSISTED_USER_KEY, &user.to_string())?;
    ctx.store.set(keys::USER, user)?;
    info!("signed in {email}");
    Ok(Some(DASHBOARD_PATH))
}

/// Sign out: clear the persisted token and user record, null the user in
/// the store, and return the path to land on.
///
/// # Errors
///
/// Propagates storage write and store subscriber errors.
pub fn logout(ctx: &mut PageContext<'_>) -> Result<&'static str, Error> {
    ctx.storage.remove_item(ACCESS_TOKEN_KEY)?;
    ctx.storage.remove_item(PERSISTED_USER_KEY)?;
    ctx.store.set(keys::USER, Value::Null)?;
    info!("signed out");
    Ok(LOGIN_PATH)
}

/// The boolean auth flag: a stored access token means signed in.
pub fn is_authenticated(storage: &dyn SessionStorage) -> bool {
    storage.get_item(ACCESS_TOKEN_KEY).is_some()
}
