use anyhow::{Context as _, Error};
use bazaar::{App, ShellConfig, mock, util};
use dom::Document;
use log::error;
use router::telemetry::{maybe_emit, nav_counters_json};
use std::fs;
use std::io::{self, BufRead as _, Write as _};
use std::process::ExitCode;
use store::FileStorage;
use tokio::runtime::Runtime;

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("shell terminated: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let config = ShellConfig::from_env()?;
    let runtime = Runtime::new()?;

    let markup = fs::read_to_string(&config.host_page)
        .with_context(|| format!("reading host page {}", config.host_page.display()))?;
    let document = Document::parse(&markup);
    let storage = FileStorage::open(&config.storage_path)?;
    let telemetry_enabled = config.telemetry_enabled;

    let mut app = App::new(config, document, Box::new(storage))?;
    app.bootstrap()?;
    runtime.block_on(app.open())?;
    print_region(&app);

    let stdin = io::stdin();
    let mut out = io::stdout();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["back"] => {
                if runtime.block_on(app.back())?.is_none() {
                    println!("(already at the oldest entry)");
                }
            }
            ["forward"] => {
                if runtime.block_on(app.forward())?.is_none() {
                    println!("(already at the newest entry)");
                }
            }
            ["click", id] => match app.document().element_by_id(id) {
                Some(node) => {
                    if runtime.block_on(app.click(node))?.is_none() {
                        println!("(not an internal link)");
                    }
                }
                None => println!("(no element #{id})"),
            },
            ["login", email, password] => {
                if runtime.block_on(app.login(email, password))?.is_none() {
                    println!("(sign-in rejected)");
                }
            }
            ["logout"] => {
                runtime.block_on(app.logout())?;
            }
            ["state", key] => match app.store().get(key) {
                Some(value) => println!("{value}"),
                None => println!("(unset)"),
            },
            ["products"] => print_products(&runtime, &app),
            ["go", path] => {
                runtime.block_on(app.go(path))?;
            }
            [path] if path.starts_with('/') => {
                runtime.block_on(app.go(path))?;
            }
            _ => println!(
                "commands: go <path> | back | forward | click <id> | \
                 login <email> <password> | logout | state <key> | products | quit"
            ),
        }
        print_region(&app);
        maybe_emit(
            telemetry_enabled,
            &nav_counters_json(&app.router().counters()),
        );
    }
    Ok(())
}

fn print_products(runtime: &Runtime, app: &App) {
    match app.api() {
        Some(client) => match runtime.block_on(client.products()) {
            Ok(products) => {
                for product in products {
                    println!(
                        "{} - {}",
                        product.name,
                        util::format_currency(product.price_cents, &product.currency)
                    );
                }
            }
            Err(err) => println!("(product fetch failed: {err})"),
        },
        None => {
            for product in mock::products() {
                println!(
                    "{} - {}",
                    product.name,
                    util::format_currency(product.price_cents, &product.currency)
                );
            }
        }
    }
}

fn print_region(app: &App) {
    let text = app.region_text();
    let compact = text.split_whitespace().collect::<Vec<_>>().join(" ");
    println!("[{}] {compact}", app.router().history().current_path());
}
