use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{AccountSummary, BillingService, Session};
use crate::domain::{BillStatus, Provider, format_amount};

/// Billtrack - utility bills ledger
#[derive(Parser)]
#[command(name = "billtrack")]
#[command(about = "Track water, gas and electricity accounts and what is owed on them")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "BILLTRACK_DATABASE", default_value = "billtrack.db")]
    pub database: String,

    /// Signed-in user; accounts are stored per user
    #[arg(short, long, env = "BILLTRACK_USER", global = true)]
    pub user: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Add a service account with a starter bill schedule
    Add {
        /// Provider code or service: AYSAM|water, ECOGAS_CUYANA|gas, EDEMSA|electricity
        #[arg(short, long)]
        provider: String,

        /// Account number assigned by the utility (letters, digits, hyphens)
        #[arg(short, long)]
        account: String,

        /// Optional label, e.g. "Home" or "Office"
        #[arg(long)]
        alias: Option<String>,

        /// Year of the starter schedule (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Show every account with its active period and debt
    List {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show one account's active period bill by bill
    Show {
        /// Account number
        account: String,
    },

    /// Report inconsistent bill data
    Check,

    /// Load the sample Home Water, Home Gas and Home Electricity accounts
    Seed {
        /// Year of the sample bills (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: accounts, bills, summary, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default level.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default = if verbose {
        "billtrack=debug"
    } else {
        "billtrack=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore a second install from tests or embedding callers
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if matches!(self.command, Commands::Init) {
            BillingService::init(&self.database).await?;
            println!("Database initialized: {}", self.database);
            return Ok(());
        }

        let mut service = BillingService::connect(&self.database).await?;
        let session = service.sign_in(self.user.as_deref()).await?;

        let result = run_session_command(&mut service, &session, self.command).await;
        service.sign_out(&session);
        result
    }
}

async fn run_session_command(
    service: &mut BillingService,
    session: &Session,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Init => anyhow::bail!("init runs without a session"),

        Commands::Add {
            provider,
            account,
            alias,
            year,
        } => {
            let created = service
                .add_account(session, &provider, &account, alias, year)
                .await?;
            println!(
                "Added {} account {} ({})",
                created.provider,
                created.account_number,
                created.label()
            );
        }

        Commands::List { format } => run_list_command(service, session, &format)?,

        Commands::Show { account } => {
            let summary = service.summarize_account(session, &account)?;
            print_account_detail(&summary);
        }

        Commands::Check => run_check_command(service, session).await?,

        Commands::Seed { year } => {
            let accounts = service.seed_demo(session, year).await?;
            for account in &accounts {
                println!(
                    "Added {} account {} ({})",
                    account.provider,
                    account.account_number,
                    account.label()
                );
            }
        }

        Commands::Export {
            export_type,
            output,
        } => run_export_command(service, session, &export_type, output.as_deref())?,
    }

    Ok(())
}

fn run_list_command(service: &BillingService, session: &Session, format: &str) -> Result<()> {
    let summary = service.summarize(session)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "table" => {
            if summary.accounts.is_empty() {
                println!("No service accounts. Add one with `billtrack add`.");
                return Ok(());
            }

            println!(
                "{:<3} {:<14} {:<12} {:<18} {:<6} {:<14} {:>12}",
                "", "PROVIDER", "ACCOUNT", "ALIAS", "YEAR", "BILLS", "DEBT"
            );
            println!("{}", "-".repeat(85));
            for entry in &summary.accounts {
                let account = &entry.account;
                println!(
                    "{:<3} {:<14} {:<12} {:<18} {:<6} {:<14} {:>12}",
                    account.provider.info().symbol,
                    truncate(account.provider.display_name(), 14),
                    truncate(account.account_number.as_str(), 12),
                    truncate(account.alias.as_deref().unwrap_or("-"), 18),
                    entry.active_year,
                    status_strip(entry),
                    format_amount(entry.total_debt)
                );
            }
            println!("{}", "-".repeat(85));
            println!("{:<72} {:>12}", "Total owed", format_amount(summary.total_debt));
        }
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format),
    }

    Ok(())
}

fn print_account_detail(summary: &AccountSummary) {
    let account = &summary.account;
    let provider: &Provider = &account.provider;

    println!(
        "{} {} ({})",
        provider.info().symbol,
        provider.display_name(),
        provider.category()
    );
    println!("  Account:  {}", account.account_number);
    if let Some(alias) = &account.alias {
        println!("  Alias:    {}", alias);
    }
    println!("  ID:       {}", account.id);
    println!();
    println!("  Bill status {}", summary.active_year);
    for bill in &summary.period_bills {
        println!("    {}", bill.label());
    }
    println!();
    println!("  Total debt: {}", format_amount(summary.total_debt));
}

async fn run_check_command(service: &BillingService, session: &Session) -> Result<()> {
    println!("Checking bill data...\n");

    let stats = service.storage_stats().await?;
    println!("Accounts: {}", stats.account_count);
    println!("Bills:    {}", stats.bill_count);
    println!();

    let report = service.check(session)?;
    if report.is_empty() && stats.orphan_bills == 0 {
        println!("All bills are consistent.");
        return Ok(());
    }

    println!("Issues found:");
    if stats.orphan_bills > 0 {
        println!("  - {} bill(s) reference a missing account", stats.orphan_bills);
    }
    for entry in &report {
        println!("  {} ({}):", entry.account.account_number, entry.account.label());
        for issue in &entry.issues {
            println!("    - {}", issue);
        }
    }
    anyhow::bail!("Bill data check failed");
}

fn run_export_command(
    service: &BillingService,
    session: &Session,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service, session);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let described = match export_type {
        "accounts" => format!("{} accounts", exporter.export_accounts_csv(writer)?),
        "bills" => format!("{} bills", exporter.export_bills_csv(writer)?),
        "summary" => format!("{} account summaries", exporter.export_summary_csv(writer)?),
        "full" => {
            let snapshot = exporter.export_full_json(writer)?;
            format!("{} accounts with summaries", snapshot.accounts.len())
        }
        _ => anyhow::bail!(
            "Invalid export type '{}'. Valid types: accounts, bills, summary, full",
            export_type
        ),
    };

    if output.is_some() {
        eprintln!("Exported {}", described);
    }
    Ok(())
}

/// One character per bill in the active period: P paid, ! pending, . future.
fn status_strip(summary: &AccountSummary) -> String {
    summary
        .period_bills
        .iter()
        .map(|bill| match bill.status {
            BillStatus::Paid => 'P',
            BillStatus::Pending => '!',
            BillStatus::Future => '.',
        })
        .collect()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
