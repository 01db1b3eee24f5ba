//! spendtrack CLI - a command line client for the spendtrack finance tracker.
//!
//! Signs in against the backend, keeps the token pair on disk between
//! runs, and exposes the day-to-day operations (recording transactions,
//! checking budgets and the dashboard) as subcommands.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spendtrack_core::auth::LOGIN_PATH;
use spendtrack_core::models::{NewTransaction, Transaction};
use spendtrack_core::utils::{format_amount, format_optional, truncate_string};
use spendtrack_core::{ApiClient, Config, FileTokenStore, Navigator, Session, TokenWatch};

// ============================================================================
// Constants
// ============================================================================

/// Column width for category names in listings
const CATEGORY_WIDTH: usize = 18;

/// Column width for transaction descriptions in listings
const DESCRIPTION_WIDTH: usize = 32;

/// Navigator for a terminal app. There is no login screen to route to,
/// so landing on the login path becomes a prompt to sign in again.
struct CliNavigator;

impl Navigator for CliNavigator {
    fn go_to(&self, path: &str) {
        if path == LOGIN_PATH {
            eprintln!("Session ended. Run `spendtrack login` to sign in again.");
        } else {
            eprintln!("Continue at {}", path);
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Set up logging with environment-based filter
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("spendtrack starting");

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");

    let mut config = Config::load()?;
    let store = Arc::new(FileTokenStore::open(Config::cache_dir()?));
    let navigator = Arc::new(CliNavigator);
    let session = Session::new(store, navigator);
    let client = ApiClient::new(config.base_url(), session.clone())?;

    match command {
        "login" => login(&client, &mut config).await?,
        "logout" => session.invalidate(),
        "dashboard" => {
            let _watch = open_session(&session)?;
            show_dashboard(&client).await?;
        }
        "transactions" => {
            let _watch = open_session(&session)?;
            list_transactions(&client).await?;
        }
        "add" => {
            let _watch = open_session(&session)?;
            add_transaction(&client, &args[2..]).await?;
        }
        "budgets" => {
            let _watch = open_session(&session)?;
            list_budgets(&client).await?;
        }
        "categories" => {
            let _watch = open_session(&session)?;
            list_categories(&client).await?;
        }
        "annual" => {
            let _watch = open_session(&session)?;
            show_annual_spending(&client).await?;
        }
        "whoami" => {
            let _watch = open_session(&session)?;
            whoami(&client).await?;
        }
        "passwd" => {
            let _watch = open_session(&session)?;
            change_password(&client).await?;
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Arm the token expiry watcher for the duration of a data command.
///
/// A token that is already past its expiry ends the session right here;
/// either way a missing session turns into a friendly error instead of
/// a string of unauthorized responses.
fn open_session(session: &Session) -> Result<TokenWatch> {
    let watch = session.watch();
    if !session.is_active() {
        anyhow::bail!("Not signed in. Run `spendtrack login` first.");
    }
    Ok(watch)
}

// ============================================================================
// Commands
// ============================================================================

async fn login(client: &ApiClient, config: &mut Config) -> Result<()> {
    let email = prompt_email(config.last_email.as_deref())?;
    let password =
        rpassword::prompt_password("Password: ").context("Failed to read password")?;

    client.login(&email, &password).await?;

    config.last_email = Some(email.clone());
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Signed in as {}", email);
    Ok(())
}

async fn show_dashboard(client: &ApiClient) -> Result<()> {
    let summary = client.fetch_dashboard().await?;

    println!(
        "This month: {} spent of {} budgeted ({:.0}%, {})",
        format_amount(summary.monthly_spending),
        format_amount(summary.monthly_budget),
        summary.budget_used_percent(),
        summary.budget_status().label()
    );
    println!(
        "This year:  {} spent",
        format_amount(summary.yearly_spending)
    );

    if !summary.recent_transactions.is_empty() {
        println!();
        println!("Recent transactions:");
        print_transaction_rows(&summary.recent_transactions);
    }

    Ok(())
}

async fn list_transactions(client: &ApiClient) -> Result<()> {
    let transactions = client.fetch_transactions().await?;

    if transactions.is_empty() {
        println!("No transactions yet. Record one with `spendtrack add`.");
        return Ok(());
    }

    println!(
        "{:<12} {:>12}  {:<width$} {}",
        "DATE",
        "AMOUNT",
        "CATEGORY",
        "DESCRIPTION",
        width = CATEGORY_WIDTH
    );
    print_transaction_rows(&transactions);
    Ok(())
}

async fn add_transaction(client: &ApiClient, args: &[String]) -> Result<()> {
    const USAGE: &str = "usage: spendtrack add <amount> <category> [description]";

    let amount: f64 = args
        .first()
        .context(USAGE)?
        .parse()
        .context("Amount must be a number (negative for expenses)")?;
    let category = args.get(1).context(USAGE)?.clone();
    let description = if args.len() > 2 {
        Some(args[2..].join(" "))
    } else {
        None
    };

    let new = NewTransaction {
        date: Local::now().date_naive(),
        description,
        category,
        amount,
    };
    let created = client.create_transaction(&new).await?;

    println!(
        "Recorded {} in {} (transaction {})",
        format_amount(created.amount),
        created.category,
        created.id
    );
    Ok(())
}

async fn list_budgets(client: &ApiClient) -> Result<()> {
    let budgets = client.fetch_budgets().await?;
    let categories = client.fetch_categories().await?;

    if budgets.is_empty() {
        println!("No budgets set.");
        return Ok(());
    }

    let names: HashMap<i64, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    println!(
        "{:<10} {:<width$} {:>12}",
        "MONTH",
        "CATEGORY",
        "AMOUNT",
        width = CATEGORY_WIDTH
    );
    for budget in &budgets {
        let name = names.get(&budget.category).copied().unwrap_or("?");
        println!(
            "{:<10} {:<width$} {:>12}",
            budget.display_month(),
            truncate_string(name, CATEGORY_WIDTH),
            format_amount(budget.amount),
            width = CATEGORY_WIDTH
        );
    }
    Ok(())
}

async fn list_categories(client: &ApiClient) -> Result<()> {
    let categories = client.fetch_categories().await?;

    if categories.is_empty() {
        println!("No categories yet.");
        return Ok(());
    }

    println!(
        "{:<width$} {:<8} {}",
        "NAME",
        "TYPE",
        "COLOR",
        width = CATEGORY_WIDTH
    );
    for category in &categories {
        println!(
            "{:<width$} {:<8} {}",
            truncate_string(&category.name, CATEGORY_WIDTH),
            category.kind.label(),
            category.color,
            width = CATEGORY_WIDTH
        );
    }
    Ok(())
}

async fn show_annual_spending(client: &ApiClient) -> Result<()> {
    let years = client.fetch_annual_spending().await?;

    if years.is_empty() {
        println!("No spending recorded yet.");
        return Ok(());
    }

    println!("{:<6} {:>12}", "YEAR", "SPENT");
    for entry in &years {
        println!("{:<6} {:>12}", entry.year, format_amount(entry.total));
    }
    Ok(())
}

async fn whoami(client: &ApiClient) -> Result<()> {
    let me = client.fetch_me().await?;
    let profile = client.fetch_profile().await?;

    println!("Signed in as {}", me.display_name());
    if !profile.full_name.is_empty() {
        println!("Name:     {}", profile.full_name);
    }
    println!("Currency: {}", profile.currency);
    Ok(())
}

async fn change_password(client: &ApiClient) -> Result<()> {
    let current =
        rpassword::prompt_password("Current password: ").context("Failed to read password")?;
    let new = rpassword::prompt_password("New password: ").context("Failed to read password")?;
    let confirm =
        rpassword::prompt_password("Repeat new password: ").context("Failed to read password")?;

    if new != confirm {
        anyhow::bail!("Passwords do not match");
    }

    client.change_password(&current, &new).await?;
    println!("Password changed.");
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn prompt_email(last: Option<&str>) -> Result<String> {
    match last {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read email")?;
    let input = input.trim();

    if input.is_empty() {
        match last {
            Some(last) => Ok(last.to_string()),
            None => anyhow::bail!("An email address is required"),
        }
    } else {
        Ok(input.to_string())
    }
}

fn print_transaction_rows(transactions: &[Transaction]) {
    for t in transactions {
        println!(
            "{:<12} {:>12}  {:<width$} {}",
            t.date.to_string(),
            format_amount(t.amount),
            truncate_string(&t.category, CATEGORY_WIDTH),
            truncate_string(&format_optional(&t.description, "-"), DESCRIPTION_WIDTH),
            width = CATEGORY_WIDTH
        );
    }
}

fn print_usage() {
    println!("spendtrack - personal finance from the command line");
    println!();
    println!("Usage: spendtrack <command> [args]");
    println!();
    println!("Commands:");
    println!("  login                              Sign in and store a session");
    println!("  logout                             End the session");
    println!("  dashboard                          Monthly summary and recent activity");
    println!("  transactions                       List transactions");
    println!("  add <amount> <category> [note...]  Record a transaction (negative = expense)");
    println!("  budgets                            List monthly budgets");
    println!("  categories                         List categories");
    println!("  annual                             Spending totals by year");
    println!("  whoami                             Show the signed-in account");
    println!("  passwd                             Change the account password");
    println!("  help                               Show this help");
    println!();
    println!("The API base URL comes from the SPENDTRACK_API_URL environment");
    println!("variable, falling back to the configured value.");
}
