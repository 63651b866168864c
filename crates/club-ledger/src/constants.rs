//! Centralized constants for the club ledger
//!
//! Club-specific settings (names, fees, remote store URL) are loaded from
//! club-ledger.toml or stored on the owner record.

// =============================================================================
// Display
// =============================================================================

/// Currency unit label appended to amounts
pub const DEFAULT_CURRENCY_UNIT: &str = "Tk";

/// Club name used when the owner record has none
pub const DEFAULT_CLUB_NAME: &str = "Independent Club";

/// Owner display name used when the owner record has none
pub const DEFAULT_OWNER_NAME: &str = "Admin";

/// Category label for expenses recorded without one
pub const UNCATEGORIZED: &str = "Uncategorized";

/// How many entries the "recent activity" lists show
pub const RECENT_LIMIT: usize = 20;

/// Longest span the payment history lists month by month; longer spans
/// print as a first-to-last range
pub const MAX_LISTED_MONTHS: u32 = 24;

/// Short month labels, January first
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// =============================================================================
// Remote realtime store
// =============================================================================

/// Path under the database root where owner documents live
pub const REMOTE_OWNERS_PATH: &str = "owners";

/// Timeout for remote store requests
pub const REMOTE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// File Names
// =============================================================================

/// Default config file path
pub const CONFIG_FILENAME: &str = "club-ledger.toml";

/// Default directory for the database
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default directory for generated reports
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// SQLite database filename (in data directory)
pub const DATABASE_FILENAME: &str = "ledger.db";

/// Ledger summary CSV filename
pub const SUMMARY_FILENAME: &str = "summary.csv";

/// Expense ledger CSV filename
pub const EXPENSE_LEDGER_FILENAME: &str = "expense_ledger.csv";
