//! The route table and per-page initializers.

use crate::{mock, session, toast, util};
use anyhow::Error;
use log::debug;
use router::{PageContext, RouteTable};
use serde_json::Value;
use store::keys;

/// Build the application route table. Paths mirror the fragment layout
/// under the pages base.
///
/// # Errors
///
/// Fails only on a malformed table (duplicate paths, missing fallback).
pub fn routes() -> Result<RouteTable, Error> {
    RouteTable::builder()
        .route("/", "index.html", Some(Box::new(init_home)))
        .route(
            session::LOGIN_PATH,
            "auth/login.html",
            Some(Box::new(init_login)),
        )
        .route("/auth/register.html", "auth/register.html", None)
        .route(
            session::DASHBOARD_PATH,
            "user/dashboard.html",
            Some(Box::new(init_dashboard)),
        )
        .fallback("404.html", None)
        .build()
}

/// Home: greet the current user and fill the product grid from the catalog.
fn init_home(ctx: &mut PageContext<'_>) -> Result<(), Error> {
    debug!("initializing home page");
    render_welcome(ctx);
    render_product_grid(ctx);
    Ok(())
}

fn render_welcome(ctx: &mut PageContext<'_>) {
    let Some(welcome) = ctx.document.element_by_id("welcome-message") else {
        return;
    };
    let message = match ctx
        .store
        .get(keys::USER)
        .and_then(|user| user.get("name"))
        .and_then(Value::as_str)
    {
        Some(name) => format!("Welcome, {name}!"),
        None => String::from("Welcome, Guest!"),
    };
    ctx.document.set_text(welcome, &message);
}

fn render_product_grid(ctx: &mut PageContext<'_>) {
    let Some(grid) = ctx.document.element_by_id("product-grid") else {
        return;
    };
    let products = mock::products();
    if products.is_empty() {
        ctx.document.set_inner_html(grid, "<p>No products found.</p>");
        return;
    }
    for child in ctx.document.children(grid) {
        ctx.document.remove(child);
    }
    for product in products {
        let card = ctx.document.create_element("div");
        ctx.document.set_attr(card, "class", "product-card");
        ctx.document.set_attr(card, "data-product-id", &product.id.to_string());
        ctx.document.append(grid, card);

        let name = ctx.document.create_element("h3");
        ctx.document.set_text(name, &product.name);
        ctx.document.append(card, name);

        let description = ctx.document.create_element("p");
        ctx.document.set_text(description, &product.description);
        ctx.document.append(card, description);

        let price = ctx.document.create_element("p");
        ctx.document.set_attr(price, "class", "product-price");
        ctx.document.set_text(
            price,
            &util::format_currency(product.price_cents, &product.currency),
        );
        ctx.document.append(card, price);
    }
}

/// Login: nothing to wire until forms land; nudge users who are already in.
fn init_login(ctx: &mut PageContext<'_>) -> Result<(), Error> {
    if session::is_authenticated(ctx.storage) {
        toast::show(
            ctx.document,
            "You are already signed in.",
            toast::ToastKind::Info,
        );
    }
    Ok(())
}

/// Dashboard: greeting for the signed-in user, sign-in prompt otherwise.
fn init_dashboard(ctx: &mut PageContext<'_>) -> Result<(), Error> {
    let Some(greeting) = ctx.document.element_by_id("dashboard-greeting") else {
        return Ok(());
    };
    let message = match ctx.store.get(keys::USER) {
        Some(user) if !user.is_null() => {
            let name = user.get("name").and_then(Value::as_str).unwrap_or("trader");
            let role = user.get("role").and_then(Value::as_str).unwrap_or("buyer");
            format!(
                "{}, your {role} dashboard is ready.",
                util::capitalize_first_letter(name)
            )
        }
        _ => String::from("Sign in to see your dashboard."),
    };
    ctx.document.set_text(greeting, &message);
    Ok(())
}
