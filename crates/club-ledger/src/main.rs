//! Club Ledger CLI
//!
//! Records member dues, donations and club expenses in a local SQLite
//! database and produces the yearly coverage reports.

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

use club_ledger::config::{Config, FileConfig, Overrides};
use club_ledger::coverage;
use club_ledger::expenses;
use club_ledger::model::{Member, Owner};
use club_ledger::month::{self, YearMonth};
use club_ledger::remote::{self, RemoteStore};
use club_ledger::reports::{self, truncate};
use club_ledger::rollups;
use club_ledger::store::{ExpenseInput, Ledger, PaymentInput, Settings};
use club_ledger::{LedgerError, constants};

/// Load config file or exit with helpful message.
///
/// The file is optional when the owner id comes from the command line.
fn load_config_file(path: &Path, owner_given: bool) -> Result<FileConfig> {
    if !path.exists() {
        if owner_given {
            return Ok(FileConfig::default());
        }
        anyhow::bail!(
            "Config file '{}' not found.\n\n\
            To get started:\n\
            1. Copy club-ledger.toml.example to club-ledger.toml\n\
            2. Set club.owner_id (and [remote] if you sync from a hosted store)\n\n\
            Or pass --owner <id> to run without a config file.",
            path.display()
        );
    }

    FileConfig::load(path)
}

#[derive(Parser, Debug)]
#[command(name = "club-ledger")]
#[command(about = "Dues, donations and expense bookkeeping for a membership club")]
struct Args {
    /// Config file
    #[arg(short, long, default_value = constants::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Owner id (overrides club.owner_id)
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Data directory for the database (overrides paths.data_dir)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output directory for generated CSV reports (overrides paths.output_dir)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Report year (default: current year)
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the owner record for this club
    Init {
        /// Administrator name
        #[arg(long)]
        name: String,

        /// Administrator email
        #[arg(long)]
        email: Option<String>,

        /// Club name
        #[arg(long)]
        club_name: Option<String>,
    },

    /// Show or change club settings
    Settings {
        /// Administrator name
        #[arg(long)]
        name: Option<String>,

        /// Club name
        #[arg(long)]
        club_name: Option<String>,

        /// Default monthly fee
        #[arg(long)]
        fee: Option<f64>,
    },

    /// Manage members
    Member {
        #[command(subcommand)]
        action: MemberCommand,
    },

    /// Manage member payments
    Payment {
        #[command(subcommand)]
        action: PaymentCommand,
    },

    /// Manage club expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseCommand,
    },

    /// Coverage, summary and monthly series reports
    Report {
        #[command(subcommand)]
        action: ReportCommand,
    },

    /// Headline figures and recent activity
    Dashboard,

    /// Import or export the whole owner document as JSON
    Document {
        #[command(subcommand)]
        action: DocumentCommand,
    },

    /// Mirror data from the hosted realtime store
    Sync {
        #[command(subcommand)]
        action: SyncCommand,
    },
}

#[derive(Subcommand, Debug)]
enum MemberCommand {
    /// Add a member
    Add {
        /// Member name (must be unique)
        name: String,

        /// Phone number
        #[arg(long)]
        phone: String,
    },

    /// List members with payment totals
    List {
        /// Filter by name (case-insensitive) or phone
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one member's coverage and payment history
    Show {
        /// Member name
        name: String,

        /// Only payments entered in this month or on this day (YYYY-MM or YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a member and all of its payments
    Delete {
        /// Member name
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum PaymentCommand {
    /// Record a payment
    Add {
        /// Member name
        member: String,

        /// Amount per month (default: club monthly fee)
        #[arg(long)]
        rate: Option<f64>,

        /// First covered month, YYYY-MM (default: current month)
        #[arg(long)]
        start: Option<YearMonth>,

        /// Number of covered months
        #[arg(long, default_value_t = 1)]
        months: u32,

        /// Extra amount (donation) on top of the monthly fee
        #[arg(long)]
        extra: Option<f64>,
    },

    /// Change a payment; omitted values stay as they are
    Edit {
        /// Member name
        member: String,

        /// Payment key
        key: String,

        #[arg(long)]
        rate: Option<f64>,

        #[arg(long)]
        start: Option<YearMonth>,

        #[arg(long)]
        months: Option<u32>,

        #[arg(long)]
        extra: Option<f64>,
    },

    /// Delete a payment
    Delete {
        /// Member name
        member: String,

        /// Payment key
        key: String,
    },

    /// List recent payments across all members
    List {
        /// Maximum number of payments
        #[arg(long, default_value_t = constants::RECENT_LIMIT)]
        limit: usize,
    },

    /// Export a member's payment history to CSV
    Export {
        /// Member name
        member: String,

        /// Only payments entered in this month or on this day (YYYY-MM or YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    /// Add an expense
    Add {
        /// Category (e.g. Hall, Tea, Equipment)
        #[arg(long)]
        category: String,

        /// Amount
        #[arg(long)]
        amount: f64,

        /// Description
        #[arg(long)]
        description: Option<String>,
    },

    /// Change an expense
    Edit {
        /// Expense key
        key: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        amount: Option<f64>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete an expense by key
    Delete {
        /// Expense key
        key: String,
    },

    /// List expenses, newest first, with running totals
    List {
        /// Only expenses entered in this month or on this day (YYYY-MM or YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Import expenses from CSV file
    Import {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Export expenses to CSV file
    Export {
        /// Path to output CSV file
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Yearly coverage table (one column per month) and CSV
    Coverage {
        /// Filter members by name or phone
        #[arg(long)]
        search: Option<String>,
    },

    /// Financial summary plus all CSV reports
    Summary,

    /// Collections and expenses per entry month
    Series,
}

#[derive(Subcommand, Debug)]
enum DocumentCommand {
    /// Replace local data with a JSON owner document
    Import {
        /// Path to JSON file
        file: PathBuf,
    },

    /// Write the owner document as JSON
    Export {
        /// Path to output JSON file
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum SyncCommand {
    /// Replace local data with the hosted owner document
    Pull,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    // Load config file and initialize runtime configuration
    let file_config = load_config_file(&args.config, args.owner.is_some())?;
    let config = Config::from_file(
        &file_config,
        Overrides {
            owner_id: args.owner,
            data_dir: args.data_dir,
            output_dir: args.output_dir,
        },
    )?;

    // Create directories
    std::fs::create_dir_all(&config.data_dir)?;
    std::fs::create_dir_all(&config.output_dir)?;

    let ledger = Ledger::open(&config.database_path())
        .await
        .context("Failed to open ledger database")?;

    let year = args.year.unwrap_or_else(|| month::now().year());

    match args.command {
        Command::Init { name, email, club_name } => {
            ledger
                .create_owner(&config.session, &name, email.as_deref(), club_name.as_deref())
                .await?;
            println!(
                "Created owner '{}' for {}",
                config.session,
                club_name.as_deref().unwrap_or(constants::DEFAULT_CLUB_NAME)
            );
            println!(
                "Database: {} ({})",
                config.database_path().display(),
                ledger.stats().await?
            );
            Ok(())
        }
        Command::Settings { name, club_name, fee } => {
            handle_settings_command(name, club_name, fee, &ledger, &config).await
        }
        Command::Member { action } => handle_member_command(action, &ledger, &config, year).await,
        Command::Payment { action } => handle_payment_command(action, &ledger, &config).await,
        Command::Expense { action } => handle_expense_command(action, &ledger, &config).await,
        Command::Report { action } => {
            handle_report_command(action, &ledger, &config, year, args.year).await
        }
        Command::Dashboard => show_dashboard(&ledger, &config).await,
        Command::Document { action } => handle_document_command(action, &ledger, &config).await,
        Command::Sync { action } => handle_sync_command(action, &ledger, &config).await,
    }
}

/// Log to stderr so tables and CSV on stdout stay clean
fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "club_ledger=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

/// Show or update owner settings
async fn handle_settings_command(
    name: Option<String>,
    club_name: Option<String>,
    fee: Option<f64>,
    ledger: &Ledger,
    config: &Config,
) -> Result<()> {
    let owner = ledger.load_owner(&config.session).await?;

    if name.is_some() || club_name.is_some() || fee.is_some() {
        let settings = Settings {
            name: name.unwrap_or_else(|| owner.display_name().to_string()),
            club_name: club_name.unwrap_or_else(|| owner.display_club_name().to_string()),
            monthly_fee: fee,
        };
        ledger.save_settings(&config.session, &settings).await?;
        println!("Settings saved.");
        return Ok(());
    }

    println!("Owner:       {}", owner.display_name());
    println!("Email:       {}", owner.email.as_deref().unwrap_or("-"));
    println!("Club:        {}", owner.display_club_name());
    match owner.monthly_fee {
        Some(fee) => println!("Monthly fee: {:.2} {}", fee, config.currency_unit),
        None => println!("Monthly fee: not set (use 'club-ledger settings --fee <amount>')"),
    }
    println!("Members:     {}", owner.members.len());
    Ok(())
}

// =============================================================================
// Members
// =============================================================================

#[derive(Tabled)]
struct MemberListRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Payments")]
    payments: usize,
    #[tabled(rename = "Months")]
    months: u64,
    #[tabled(rename = "Total Paid")]
    total: String,
    #[tabled(rename = "Last Payment")]
    last_payment: String,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Months")]
    months: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Extra")]
    extra: String,
    #[tabled(rename = "Running Total")]
    running: String,
}

async fn handle_member_command(
    action: MemberCommand,
    ledger: &Ledger,
    config: &Config,
    year: i32,
) -> Result<()> {
    match action {
        MemberCommand::Add { name, phone } => {
            let key = ledger.create_member(&config.session, &name, &phone).await?;
            println!("Added member '{}'", key);
            Ok(())
        }

        MemberCommand::List { search } => {
            let owner = ledger.load_owner(&config.session).await?;
            let keys = rollups::search_members(&owner, search.as_deref().unwrap_or(""));
            if keys.is_empty() {
                println!("No members found.");
                println!("\nUse 'club-ledger member add <name> --phone <phone>' to add members");
                return Ok(());
            }

            let summaries = rollups::member_summaries(&owner);
            let rows: Vec<MemberListRow> = summaries
                .iter()
                .filter(|s| keys.contains(&s.key.as_str()))
                .filter_map(|s| {
                    let member = owner.members.get(&s.key)?;
                    Some(MemberListRow {
                        name: s.name.clone(),
                        phone: member.phone.clone(),
                        payments: s.payment_count,
                        months: s.total_months,
                        total: format!("{:.2}", s.total_amount),
                        last_payment: rollups::last_payment_at(member)
                            .map(|dt| dt.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    })
                })
                .collect();

            println!("{}", Table::new(&rows).with(Style::psql()));
            println!("\n{} member(s)", rows.len());
            Ok(())
        }

        MemberCommand::Show { name, date } => {
            let owner = ledger.load_owner(&config.session).await?;
            let member = find_member(&owner, &name)?;
            print_member(member, year, date.as_deref(), &config.currency_unit);
            Ok(())
        }

        MemberCommand::Delete { name } => {
            ledger.delete_member(&config.session, name.trim()).await?;
            println!("Deleted member '{}' and all of its payments", name.trim());
            Ok(())
        }
    }
}

fn find_member<'a>(owner: &'a Owner, name: &str) -> Result<&'a Member> {
    owner
        .members
        .get(name.trim())
        .ok_or_else(|| LedgerError::MemberNotFound(name.trim().to_string()).into())
}

fn print_member(member: &Member, year: i32, date_prefix: Option<&str>, unit: &str) {
    println!("{} ({})", member.name, member.phone);

    let row = coverage::member_year(member, year);
    let mut builder = Builder::default();
    builder.push_record(constants::MONTH_LABELS.iter().map(|m| m.to_string()));
    builder.push_record(row.monthly.iter().map(|amount| {
        if *amount > 0.0 {
            format!("{:.0}", amount)
        } else {
            "-".to_string()
        }
    }));
    println!("\nCoverage {}:", year);
    println!("{}", builder.build().with(Style::psql()));
    println!(
        "Fees: {:.2} {unit}   Extra: {:.2} {unit}   Total: {:.2} {unit}",
        row.base_total, row.extra, row.total
    );

    let history = rollups::payment_history(member, date_prefix);
    if history.is_empty() {
        println!("\nNo payments recorded.");
        return;
    }

    let rows: Vec<HistoryRow> = history
        .iter()
        .map(|entry| {
            let p = entry.payment;
            HistoryRow {
                key: entry.key.to_string(),
                date: p
                    .entered_at()
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                rate: format!("{:.2}", coverage::resolved_rate(p)),
                months: match p.start() {
                    Some(start) if p.months() > 0 => {
                        format!("{} x {}", start.label(), p.months())
                    }
                    _ => "-".to_string(),
                },
                paid: format!("{:.2}", coverage::base_total(p)),
                extra: format!("{:.2}", p.extra()),
                running: format!("{:.2}", entry.running_amount),
            }
        })
        .collect();

    println!("\nPayments:");
    println!("{}", Table::new(&rows).with(Style::psql()));
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Tabled)]
struct RecentPaymentRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Covers")]
    covers: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Extra")]
    extra: String,
}

async fn handle_payment_command(
    action: PaymentCommand,
    ledger: &Ledger,
    config: &Config,
) -> Result<()> {
    match action {
        PaymentCommand::Add {
            member,
            rate,
            start,
            months,
            extra,
        } => {
            let owner = ledger.load_owner(&config.session).await?;
            let amount_per_month = rate.or(owner.monthly_fee).context(
                "No rate given and no monthly fee set. Pass --rate or run 'club-ledger settings --fee <amount>'",
            )?;
            let input = PaymentInput {
                amount_per_month,
                start_month: start.unwrap_or_else(|| YearMonth::from_date(month::now().date())),
                num_months: months,
                extra_amount: extra,
            };

            let key = ledger.record_payment(&config.session, member.trim(), &input).await?;
            println!(
                "Recorded payment {} for '{}': {:.2} x {} from {} = {:.2} {}{}",
                key,
                member.trim(),
                input.amount_per_month,
                input.num_months,
                input.start_month.label(),
                input.amount_per_month * f64::from(input.num_months),
                config.currency_unit,
                input
                    .extra_amount
                    .filter(|e| *e > 0.0)
                    .map(|e| format!(" (+{:.2} extra)", e))
                    .unwrap_or_default()
            );
            Ok(())
        }

        PaymentCommand::Edit {
            member,
            key,
            rate,
            start,
            months,
            extra,
        } => {
            let owner = ledger.load_owner(&config.session).await?;
            let existing = find_member(&owner, &member)?
                .payments
                .get(&key)
                .ok_or_else(|| LedgerError::PaymentNotFound(key.clone()))?;

            let input = PaymentInput {
                amount_per_month: rate.unwrap_or_else(|| coverage::resolved_rate(existing)),
                start_month: match start.or_else(|| existing.start()) {
                    Some(start) => start,
                    None => {
                        anyhow::bail!("Payment {} has no readable start month; pass --start", key)
                    }
                },
                num_months: months.unwrap_or_else(|| existing.months()),
                extra_amount: extra.or(existing.extra_amount),
            };

            ledger
                .edit_payment(&config.session, member.trim(), &key, &input)
                .await?;
            println!("Updated payment {}", key);
            Ok(())
        }

        PaymentCommand::Delete { member, key } => {
            ledger.delete_payment(&config.session, member.trim(), &key).await?;
            println!("Deleted payment {}", key);
            Ok(())
        }

        PaymentCommand::List { limit } => {
            let owner = ledger.load_owner(&config.session).await?;
            let recent = rollups::recent_payments(&owner, limit);
            if recent.is_empty() {
                println!("No payments recorded.");
                return Ok(());
            }

            let rows: Vec<RecentPaymentRow> = recent
                .iter()
                .map(|r| RecentPaymentRow {
                    date: r
                        .payment
                        .entered_at()
                        .map(|dt| dt.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    member: truncate(&r.member.name, 20),
                    key: r.key.to_string(),
                    covers: covered_range(r.payment),
                    paid: format!("{:.2}", coverage::base_total(r.payment)),
                    extra: format!("{:.2}", r.payment.extra()),
                })
                .collect();

            println!("{}", Table::new(&rows).with(Style::psql()));
            Ok(())
        }

        PaymentCommand::Export { member, date } => {
            let owner = ledger.load_owner(&config.session).await?;
            let member = find_member(&owner, &member)?;
            reports::generate_payment_history(&config.output_dir, member, date.as_deref())?;
            Ok(())
        }
    }
}

/// "Jan 2024 - Mar 2024" style label for a payment's covered span
fn covered_range(payment: &club_ledger::Payment) -> String {
    match coverage::covered_span(payment) {
        Some((first, last)) if first == last => first.label(),
        Some((first, last)) => format!("{} - {}", first.label(), last.label()),
        None => "-".to_string(),
    }
}

// =============================================================================
// Expenses
// =============================================================================

#[derive(Tabled)]
struct ExpenseListRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Running")]
    running: String,
}

async fn handle_expense_command(
    action: ExpenseCommand,
    ledger: &Ledger,
    config: &Config,
) -> Result<()> {
    match action {
        ExpenseCommand::Add {
            category,
            amount,
            description,
        } => {
            let input = ExpenseInput {
                category,
                description,
                amount,
            };
            let key = ledger.add_expense(&config.session, &input).await?;
            println!(
                "Added expense {}: {} - {:.2} {}",
                key,
                input.category.trim(),
                input.amount,
                config.currency_unit
            );
            Ok(())
        }

        ExpenseCommand::Edit {
            key,
            category,
            amount,
            description,
        } => {
            let owner = ledger.load_owner(&config.session).await?;
            let existing = owner
                .expenses
                .get(&key)
                .ok_or_else(|| LedgerError::ExpenseNotFound(key.clone()))?;

            let input = ExpenseInput {
                category: category.unwrap_or_else(|| existing.category.clone()),
                description: description.or_else(|| existing.description.clone()),
                amount: amount.unwrap_or_else(|| existing.amount()),
            };
            ledger.edit_expense(&config.session, &key, &input).await?;
            println!("Updated expense {}", key);
            Ok(())
        }

        ExpenseCommand::Delete { key } => {
            ledger.delete_expense(&config.session, &key).await?;
            println!("Deleted expense {}", key);
            Ok(())
        }

        ExpenseCommand::List { date } => {
            let owner = ledger.load_owner(&config.session).await?;
            let listed = expenses::with_running_totals(&owner.expenses, date.as_deref());
            if listed.is_empty() {
                println!("No expenses recorded.");
                println!("\nUse 'club-ledger expense add' to add expenses");
                println!("Or 'club-ledger expense import <file.csv>' to import from CSV");
                return Ok(());
            }

            let rows: Vec<ExpenseListRow> = listed
                .iter()
                .map(|e| ExpenseListRow {
                    date: e
                        .expense
                        .entered_at()
                        .map(|dt| dt.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    key: e.key.to_string(),
                    category: truncate(e.expense.category_label(), 16),
                    description: truncate(e.expense.description.as_deref().unwrap_or(""), 30),
                    amount: format!("{:.2}", e.expense.amount()),
                    running: format!("{:.2}", e.running_total),
                })
                .collect();

            println!("{}", Table::new(&rows).with(Style::psql()));

            let total = listed.last().map(|e| e.running_total).unwrap_or(0.0);
            println!("\nTotal: {:.2} {} in {} expense(s)", total, config.currency_unit, rows.len());
            let by_category = expenses::expenses_by_category(listed.iter().map(|e| e.expense));
            for (category, amount) in by_category {
                println!("  {:<20}{:>12.2}", truncate(&category, 19), amount);
            }
            Ok(())
        }

        ExpenseCommand::Import { file } => {
            let imported = expenses::load_from_csv(&file)?;
            let count = ledger.import_expenses(&config.session, &imported).await?;
            println!("Imported {} expenses from {}", count, file.display());
            Ok(())
        }

        ExpenseCommand::Export { file } => {
            let owner = ledger.load_owner(&config.session).await?;
            let count = expenses::export_to_csv(&owner.expenses, &file)?;
            println!("Exported {} expenses to {}", count, file.display());
            Ok(())
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Collection")]
    collection: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Net")]
    net: String,
}

async fn handle_report_command(
    action: ReportCommand,
    ledger: &Ledger,
    config: &Config,
    year: i32,
    year_filter: Option<i32>,
) -> Result<()> {
    let owner = ledger.load_owner(&config.session).await?;

    match action {
        ReportCommand::Coverage { search } => {
            let rows = reports::coverage_rows(&owner, year, search.as_deref());

            let mut builder = Builder::default();
            let mut header = vec!["Member".to_string()];
            header.extend(constants::MONTH_LABELS.iter().map(|m| m.to_string()));
            header.push("Extra".to_string());
            header.push("Total".to_string());
            builder.push_record(header);

            let mut column_totals = [0.0; 12];
            let mut grand_total = 0.0;
            for row in &rows {
                let mut record = vec![truncate(&row.name, 20)];
                for (slot, amount) in row.monthly.iter().enumerate() {
                    column_totals[slot] += amount;
                    record.push(reports::blank_if_zero(*amount));
                }
                record.push(reports::blank_if_zero(row.extra));
                record.push(format!("{:.0}", row.total));
                grand_total += row.total;
                builder.push_record(record);
            }

            let mut footer = vec!["TOTAL".to_string()];
            footer.extend(column_totals.iter().map(|t| format!("{:.0}", t)));
            footer.push(format!("{:.0}", rows.iter().map(|r| r.extra).sum::<f64>()));
            footer.push(format!("{:.0}", grand_total));
            builder.push_record(footer);

            println!(
                "{} - coverage {} ({})\n",
                owner.display_club_name(),
                year,
                config.currency_unit
            );
            println!("{}", builder.build().with(Style::psql()));
            println!();

            reports::generate_coverage_report(
                &config.output_dir,
                &owner,
                year,
                &config.currency_unit,
                search.as_deref(),
            )?;
            Ok(())
        }

        ReportCommand::Summary => {
            reports::print_summary(&owner, year, &config.currency_unit);
            println!("\nGenerating reports in {}...", config.output_dir.display());
            let written = reports::generate_all_reports(
                &config.output_dir,
                &owner,
                year,
                &config.currency_unit,
            )?;
            println!("\n{} report(s) written.", written.len());
            Ok(())
        }

        ReportCommand::Series => {
            let rows: Vec<SeriesRow> = rollups::monthly_series(&owner)
                .into_iter()
                .filter(|p| year_filter.is_none_or(|y| p.month.year() == y))
                .map(|p| SeriesRow {
                    month: p.month.label(),
                    collection: format!("{:.2}", p.collection),
                    expense: format!("{:.2}", p.expense),
                    net: format!("{:.2}", p.net()),
                })
                .collect();

            if rows.is_empty() {
                println!("No dated payments or expenses.");
                return Ok(());
            }
            println!("{}", Table::new(&rows).with(Style::psql()));
            Ok(())
        }
    }
}

async fn show_dashboard(ledger: &Ledger, config: &Config) -> Result<()> {
    let owner = ledger.load_owner(&config.session).await?;
    let totals = rollups::dashboard_totals(&owner);
    let unit = &config.currency_unit;
    let today = month::now().date();

    println!("{} ({})", owner.display_club_name(), owner.display_name());
    println!("{}", "=".repeat(50));
    println!("  Total Collected:   {:>14.2} {unit}", totals.total_collected);
    println!("    of which extra:  {:>14.2} {unit}", totals.extra_collected);
    println!("  Total Spent:       {:>14.2} {unit}", totals.total_spent);
    println!("  Balance:           {:>14.2} {unit}", totals.balance);
    println!("  Members:           {:>14}", owner.members.len());
    println!("  Payments today:    {:>14}", rollups::payments_on(&owner, today));
    println!("{}", "=".repeat(50));

    let recent = rollups::recent_payments(&owner, constants::RECENT_LIMIT);
    if !recent.is_empty() {
        println!("\nRecent payments:");
        for r in &recent {
            println!(
                "  {:<12} {:<20} {:>10.2}  {}",
                r.payment
                    .entry_date()
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                truncate(&r.member.name, 20),
                coverage::base_total(r.payment) + r.payment.extra(),
                covered_range(r.payment)
            );
        }
    }

    let recent = rollups::recent_expenses(&owner, constants::RECENT_LIMIT);
    if !recent.is_empty() {
        println!("\nRecent expenses:");
        for (_, expense) in &recent {
            println!(
                "  {:<12} {:<20} {:>10.2}  {}",
                expense
                    .entry_date()
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                truncate(expense.category_label(), 20),
                expense.amount(),
                truncate(expense.description.as_deref().unwrap_or(""), 30)
            );
        }
    }
    Ok(())
}

// =============================================================================
// Documents and sync
// =============================================================================

async fn handle_document_command(
    action: DocumentCommand,
    ledger: &Ledger,
    config: &Config,
) -> Result<()> {
    match action {
        DocumentCommand::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let body: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let owner = remote::parse_owner_document(body)?
                .with_context(|| format!("{} holds a null document", file.display()))?;

            ledger.replace_owner(&config.session, &owner).await?;
            println!(
                "Imported {} members and {} expenses from {}",
                owner.members.len(),
                owner.expenses.len(),
                file.display()
            );
            Ok(())
        }

        DocumentCommand::Export { file } => {
            let owner = ledger.load_owner(&config.session).await?;
            let json = serde_json::to_string_pretty(&owner)?;
            std::fs::write(&file, json)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            println!("Exported owner '{}' to {}", config.session, file.display());
            Ok(())
        }
    }
}

async fn handle_sync_command(
    action: SyncCommand,
    ledger: &Ledger,
    config: &Config,
) -> Result<()> {
    match action {
        SyncCommand::Pull => {
            let remote_config = config
                .remote
                .as_ref()
                .context("No [remote] section in club-ledger.toml; set remote.database_url to sync")?;
            let store = RemoteStore::new(remote_config)?;

            println!("Pulling owner '{}' from {}...", config.session, remote_config.database_url);
            let owner = store.fetch_owner(&config.session).await?;
            ledger.replace_owner(&config.session, &owner).await?;

            let payments: usize = owner.members.values().map(|m| m.payments.len()).sum();
            println!(
                "Synced {} members, {} payments, {} expenses",
                owner.members.len(),
                payments,
                owner.expenses.len()
            );
            Ok(())
        }
    }
}
