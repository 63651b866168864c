//! SQLite storage for owners, members, payments and expenses
//!
//! Every call takes an explicit [`Session`] naming the owner it acts for.
//! Mutations are followed by a fresh snapshot on the owner's feed when anyone
//! is subscribed.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::LedgerError;
use crate::expenses::Expense;
use crate::feed::{SnapshotFeed, Subscription};
use crate::model::{Member, Owner, Payment};
use crate::month::{self, YearMonth};
use crate::session::Session;

type Result<T> = std::result::Result<T, LedgerError>;

/// Owner store backed by SQLite
pub struct Ledger {
    pool: SqlitePool,
    feed: SnapshotFeed,
    /// Held across reload and send so snapshots reach the feed in commit order
    publish_lock: Mutex<()>,
}

/// Row type for owners query
#[derive(FromRow)]
struct OwnerRow {
    name: String,
    email: Option<String>,
    club_name: Option<String>,
    monthly_fee: Option<f64>,
}

/// Row type for members query
#[derive(FromRow)]
struct MemberRow {
    key: String,
    name: String,
    phone: String,
}

/// Row type for payments query
#[derive(FromRow)]
struct PaymentRow {
    member_key: String,
    key: String,
    amount_per_month: Option<f64>,
    total_amount: Option<f64>,
    amount: Option<f64>,
    extra_amount: Option<f64>,
    start_month: Option<String>,
    num_months: Option<f64>,
    date: Option<String>,
}

/// Row type for expenses query
#[derive(FromRow)]
struct ExpenseRow {
    key: String,
    category: String,
    description: Option<String>,
    amount: Option<f64>,
    date: Option<String>,
}

/// Owner-level settings; a `None` fee leaves the stored one untouched
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub name: String,
    pub club_name: String,
    pub monthly_fee: Option<f64>,
}

/// A payment as entered: base rate, covered span and optional extra
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInput {
    pub amount_per_month: f64,
    pub start_month: YearMonth,
    pub num_months: u32,
    pub extra_amount: Option<f64>,
}

impl PaymentInput {
    fn validate(&self) -> Result<()> {
        if !(self.amount_per_month.is_finite() && self.amount_per_month > 0.0) {
            return Err(LedgerError::invalid("amount per month must be greater than zero"));
        }
        if self.num_months == 0 {
            return Err(LedgerError::invalid("number of months must be at least one"));
        }
        if let Some(extra) = self.extra_amount
            && !(extra.is_finite() && extra >= 0.0)
        {
            return Err(LedgerError::invalid("extra amount must not be negative"));
        }
        Ok(())
    }

    /// Extra amount as stored: zero is the same as none
    fn stored_extra(&self) -> Option<f64> {
        self.extra_amount.filter(|extra| *extra > 0.0)
    }
}

/// An expense as entered
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    pub category: String,
    pub description: Option<String>,
    pub amount: f64,
}

impl ExpenseInput {
    fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() {
            return Err(LedgerError::invalid("category must not be empty"));
        }
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(LedgerError::invalid("expense amount must be greater than zero"));
        }
        Ok(())
    }

    fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

impl Ledger {
    /// Open or create the ledger database
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // SQLx requires the file to exist for SQLite
        if !path.exists() {
            std::fs::File::create(path)?;
        }

        let url = format!("sqlite:{}", path.display());
        let pool = SqlitePool::connect(&url).await?;

        // WAL plus a busy timeout lets a second CLI process wait instead of failing
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA busy_timeout=5000")
            .execute(&pool)
            .await?;

        debug!("Opened ledger database at {}", path.display());
        Self::with_pool(pool).await
    }

    /// Private in-memory ledger (tests and dry runs)
    pub async fn open_in_memory() -> Result<Self> {
        // One long-lived connection: each new connection would get its own empty database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let ledger = Self {
            pool,
            feed: SnapshotFeed::new(),
            publish_lock: Mutex::new(()),
        };
        ledger.init_schema().await?;
        Ok(ledger)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "
            -- One row per administrator account (club)
            CREATE TABLE IF NOT EXISTS owners (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT,
                club_name TEXT,
                monthly_fee REAL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "
            -- Members, keyed by trimmed name within an owner
            CREATE TABLE IF NOT EXISTS members (
                owner_id TEXT NOT NULL,
                key TEXT NOT NULL,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                PRIMARY KEY (owner_id, key)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "
            -- Payments; every numeric column is nullable so imported legacy shapes survive
            CREATE TABLE IF NOT EXISTS payments (
                owner_id TEXT NOT NULL,
                member_key TEXT NOT NULL,
                key TEXT NOT NULL,
                amount_per_month REAL,
                total_amount REAL,
                amount REAL,
                extra_amount REAL,
                start_month TEXT,
                num_months REAL,
                date TEXT,
                PRIMARY KEY (owner_id, member_key, key)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "
            -- Club expenses
            CREATE TABLE IF NOT EXISTS expenses (
                owner_id TEXT NOT NULL,
                key TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT,
                amount REAL,
                date TEXT,
                PRIMARY KEY (owner_id, key)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Owners
    // =========================================================================

    /// Create the owner record for a new club
    pub async fn create_owner(
        &self,
        session: &Session,
        name: &str,
        email: Option<&str>,
        club_name: Option<&str>,
    ) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::invalid("owner name must not be empty"));
        }

        let result = sqlx::query(
            "INSERT INTO owners (id, name, email, club_name)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(session.owner_id())
        .bind(name)
        .bind(email.map(str::trim).filter(|e| !e.is_empty()))
        .bind(club_name.map(str::trim).filter(|c| !c.is_empty()))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::OwnerExists(session.owner_id().to_string()));
        }

        info!("Created owner '{}'", session.owner_id());
        self.publish(session).await;
        Ok(())
    }

    /// Load the full owner document
    pub async fn load_owner(&self, session: &Session) -> Result<Owner> {
        let owner_id = session.owner_id();

        let row: Option<OwnerRow> = sqlx::query_as(
            "SELECT name, email, club_name, monthly_fee FROM owners WHERE id = ?",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        let row = row.ok_or_else(|| LedgerError::OwnerNotFound(owner_id.to_string()))?;

        let member_rows: Vec<MemberRow> =
            sqlx::query_as("SELECT key, name, phone FROM members WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?;

        let payment_rows: Vec<PaymentRow> = sqlx::query_as(
            "SELECT member_key, key, amount_per_month, total_amount, amount, extra_amount,
                    start_month, num_months, date
             FROM payments
             WHERE owner_id = ?",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let expense_rows: Vec<ExpenseRow> = sqlx::query_as(
            "SELECT key, category, description, amount, date FROM expenses WHERE owner_id = ?",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut members: BTreeMap<String, Member> = member_rows
            .into_iter()
            .map(|r| {
                let member = Member {
                    name: r.name,
                    phone: r.phone,
                    payments: BTreeMap::new(),
                };
                (r.key, member)
            })
            .collect();

        for r in payment_rows {
            // Payments are only reachable through their member
            if let Some(member) = members.get_mut(&r.member_key) {
                member.payments.insert(r.key.clone(), row_to_payment(r));
            }
        }

        let expenses = expense_rows
            .into_iter()
            .map(|r| {
                let expense = Expense {
                    category: r.category,
                    description: r.description,
                    amount: r.amount,
                    date: r.date,
                };
                (r.key, expense)
            })
            .collect();

        Ok(Owner {
            name: row.name,
            email: row.email,
            club_name: row.club_name,
            monthly_fee: row.monthly_fee,
            members,
            expenses,
        })
    }

    /// Update owner name, club name and default monthly fee
    pub async fn save_settings(&self, session: &Session, settings: &Settings) -> Result<()> {
        let name = settings.name.trim();
        let club_name = settings.club_name.trim();
        if name.is_empty() || club_name.is_empty() {
            return Err(LedgerError::invalid("name and club name must not be empty"));
        }
        if settings
            .monthly_fee
            .is_some_and(|fee| !(fee.is_finite() && fee > 0.0))
        {
            return Err(LedgerError::invalid("monthly fee must be greater than zero"));
        }

        let result = sqlx::query(
            "UPDATE owners SET name = ?, club_name = ?, monthly_fee = COALESCE(?, monthly_fee)
             WHERE id = ?",
        )
        .bind(name)
        .bind(club_name)
        .bind(settings.monthly_fee)
        .bind(session.owner_id())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::OwnerNotFound(session.owner_id().to_string()));
        }

        info!("Saved settings for owner '{}'", session.owner_id());
        self.publish(session).await;
        Ok(())
    }

    /// Replace everything stored for the owner with `owner` (document import)
    pub async fn replace_owner(&self, session: &Session, owner: &Owner) -> Result<()> {
        let owner_id = session.owner_id();
        let mut tx = self.pool.begin().await?;

        for table in ["payments", "members", "expenses"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE owner_id = ?"))
                .bind(owner_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            "INSERT INTO owners (id, name, email, club_name, monthly_fee)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                club_name = excluded.club_name,
                monthly_fee = excluded.monthly_fee",
        )
        .bind(owner_id)
        .bind(&owner.name)
        .bind(&owner.email)
        .bind(&owner.club_name)
        .bind(owner.monthly_fee)
        .execute(&mut *tx)
        .await?;

        let mut payment_count = 0;
        for (member_key, member) in &owner.members {
            sqlx::query("INSERT INTO members (owner_id, key, name, phone) VALUES (?, ?, ?, ?)")
                .bind(owner_id)
                .bind(member_key)
                .bind(&member.name)
                .bind(&member.phone)
                .execute(&mut *tx)
                .await?;

            for (key, payment) in &member.payments {
                insert_payment(&mut tx, owner_id, member_key, key, payment).await?;
                payment_count += 1;
            }
        }

        for (key, expense) in &owner.expenses {
            insert_expense(&mut tx, owner_id, key, expense).await?;
        }

        tx.commit().await?;

        info!(
            "Replaced owner '{}': {} members, {} payments, {} expenses",
            owner_id,
            owner.members.len(),
            payment_count,
            owner.expenses.len()
        );
        self.publish(session).await;
        Ok(())
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Add a member; the trimmed name becomes its key
    pub async fn create_member(
        &self,
        session: &Session,
        name: &str,
        phone: &str,
    ) -> Result<String> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() || phone.is_empty() {
            return Err(LedgerError::invalid("member name and phone must not be empty"));
        }
        self.ensure_owner(session).await?;

        let result = sqlx::query(
            "INSERT INTO members (owner_id, key, name, phone)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (owner_id, key) DO NOTHING",
        )
        .bind(session.owner_id())
        .bind(name)
        .bind(name)
        .bind(phone)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::MemberExists(name.to_string()));
        }

        info!("Added member '{}'", name);
        self.publish(session).await;
        Ok(name.to_string())
    }

    /// Delete a member together with all of its payments
    pub async fn delete_member(&self, session: &Session, member_key: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let payments = sqlx::query("DELETE FROM payments WHERE owner_id = ? AND member_key = ?")
            .bind(session.owner_id())
            .bind(member_key)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM members WHERE owner_id = ? AND key = ?")
            .bind(session.owner_id())
            .bind(member_key)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(LedgerError::MemberNotFound(member_key.to_string()));
        }
        tx.commit().await?;

        info!(
            "Deleted member '{}' and {} payments",
            member_key,
            payments.rows_affected()
        );
        self.publish(session).await;
        Ok(())
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Record a payment entered now; returns its key
    pub async fn record_payment(
        &self,
        session: &Session,
        member_key: &str,
        input: &PaymentInput,
    ) -> Result<String> {
        input.validate()?;
        self.ensure_member(session, member_key).await?;

        let payment = Payment::new(
            input.amount_per_month,
            input.start_month,
            input.num_months,
            input.stored_extra(),
            month::now(),
        );
        let key = self.new_key().await?;

        let mut tx = self.pool.begin().await?;
        insert_payment(&mut tx, session.owner_id(), member_key, &key, &payment).await?;
        tx.commit().await?;

        info!(
            "Recorded payment for '{}': {} x {} from {}",
            member_key, input.amount_per_month, input.num_months, input.start_month
        );
        self.publish(session).await;
        Ok(key)
    }

    /// Change an existing payment; its entry date is kept
    pub async fn edit_payment(
        &self,
        session: &Session,
        member_key: &str,
        payment_key: &str,
        input: &PaymentInput,
    ) -> Result<()> {
        input.validate()?;

        let result = sqlx::query(
            "UPDATE payments
             SET amount_per_month = ?, total_amount = ?, amount = NULL, extra_amount = ?,
                 start_month = ?, num_months = ?
             WHERE owner_id = ? AND member_key = ? AND key = ?",
        )
        .bind(input.amount_per_month)
        .bind(input.amount_per_month * f64::from(input.num_months))
        .bind(input.stored_extra())
        .bind(input.start_month.to_string())
        .bind(f64::from(input.num_months))
        .bind(session.owner_id())
        .bind(member_key)
        .bind(payment_key)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::PaymentNotFound(payment_key.to_string()));
        }

        info!("Edited payment '{}' of '{}'", payment_key, member_key);
        self.publish(session).await;
        Ok(())
    }

    pub async fn delete_payment(
        &self,
        session: &Session,
        member_key: &str,
        payment_key: &str,
    ) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM payments WHERE owner_id = ? AND member_key = ? AND key = ?")
                .bind(session.owner_id())
                .bind(member_key)
                .bind(payment_key)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::PaymentNotFound(payment_key.to_string()));
        }

        info!("Deleted payment '{}' of '{}'", payment_key, member_key);
        self.publish(session).await;
        Ok(())
    }

    // =========================================================================
    // Expenses
    // =========================================================================

    /// Add an expense entered now; returns its key
    pub async fn add_expense(&self, session: &Session, input: &ExpenseInput) -> Result<String> {
        input.validate()?;
        self.ensure_owner(session).await?;

        let expense = Expense {
            category: input.category.trim().to_string(),
            description: input.description().map(str::to_string),
            amount: Some(input.amount),
            date: Some(month::format_timestamp(month::now())),
        };
        let key = self.new_key().await?;

        let mut tx = self.pool.begin().await?;
        insert_expense(&mut tx, session.owner_id(), &key, &expense).await?;
        tx.commit().await?;

        info!("Added expense '{}': {}", expense.category, input.amount);
        self.publish(session).await;
        Ok(key)
    }

    /// Change an existing expense; its entry date is kept
    pub async fn edit_expense(
        &self,
        session: &Session,
        expense_key: &str,
        input: &ExpenseInput,
    ) -> Result<()> {
        input.validate()?;

        let result = sqlx::query(
            "UPDATE expenses SET category = ?, description = ?, amount = ?
             WHERE owner_id = ? AND key = ?",
        )
        .bind(input.category.trim())
        .bind(input.description())
        .bind(input.amount)
        .bind(session.owner_id())
        .bind(expense_key)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::ExpenseNotFound(expense_key.to_string()));
        }

        info!("Edited expense '{}'", expense_key);
        self.publish(session).await;
        Ok(())
    }

    pub async fn delete_expense(&self, session: &Session, expense_key: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE owner_id = ? AND key = ?")
            .bind(session.owner_id())
            .bind(expense_key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::ExpenseNotFound(expense_key.to_string()));
        }

        info!("Deleted expense '{}'", expense_key);
        self.publish(session).await;
        Ok(())
    }

    /// Import multiple expenses (bulk import from CSV), keeping their dates
    pub async fn import_expenses(&self, session: &Session, expenses: &[Expense]) -> Result<usize> {
        self.ensure_owner(session).await?;

        let mut tx = self.pool.begin().await?;
        let mut count = 0;
        for expense in expenses {
            let key = new_key_in(&mut tx).await?;
            let mut expense = expense.clone();
            if expense.date.is_none() {
                expense.date = Some(month::format_timestamp(month::now()));
            }
            insert_expense(&mut tx, session.owner_id(), &key, &expense).await?;
            count += 1;
        }
        tx.commit().await?;

        info!("Imported {} expenses", count);
        self.publish(session).await;
        Ok(count)
    }

    // =========================================================================
    // Live snapshots
    // =========================================================================

    /// Subscribe to the owner's data: the current snapshot now, a fresh one
    /// after every later mutation
    pub async fn subscribe(&self, session: &Session) -> Result<Subscription> {
        let current = self.load_owner(session).await?;
        Ok(self.feed.subscribe(session.owner_id(), current))
    }

    async fn publish(&self, session: &Session) {
        let _guard = self.publish_lock.lock().await;
        if !self.feed.has_subscribers(session.owner_id()) {
            return;
        }
        match self.load_owner(session).await {
            Ok(snapshot) => {
                self.feed.publish(session.owner_id(), snapshot);
            }
            Err(e) => warn!("Failed to reload owner '{}' for subscribers: {}", session, e),
        }
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    async fn ensure_owner(&self, session: &Session) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM owners WHERE id = ?)")
            .bind(session.owner_id())
            .fetch_one(&self.pool)
            .await?;
        if exists {
            Ok(())
        } else {
            Err(LedgerError::OwnerNotFound(session.owner_id().to_string()))
        }
    }

    async fn ensure_member(&self, session: &Session, member_key: &str) -> Result<()> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM members WHERE owner_id = ? AND key = ?)",
        )
        .bind(session.owner_id())
        .bind(member_key)
        .fetch_one(&self.pool)
        .await?;
        if exists {
            Ok(())
        } else {
            Err(LedgerError::MemberNotFound(member_key.to_string()))
        }
    }

    async fn new_key(&self) -> Result<String> {
        Ok(sqlx::query_scalar(NEW_KEY_SQL).fetch_one(&self.pool).await?)
    }

    /// Get ledger statistics
    pub async fn stats(&self) -> Result<LedgerStats> {
        let owners: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM owners")
            .fetch_one(&self.pool)
            .await?;
        let members: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        let payments: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payments")
            .fetch_one(&self.pool)
            .await?;
        let expenses: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM expenses")
            .fetch_one(&self.pool)
            .await?;

        Ok(LedgerStats {
            owners: owners.0 as u64,
            members: members.0 as u64,
            payments: payments.0 as u64,
            expenses: expenses.0 as u64,
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Random 16-hex-digit record key
const NEW_KEY_SQL: &str = "SELECT lower(hex(randomblob(8)))";

async fn new_key_in(tx: &mut Transaction<'_, Sqlite>) -> Result<String> {
    Ok(sqlx::query_scalar(NEW_KEY_SQL).fetch_one(&mut **tx).await?)
}

async fn insert_payment(
    tx: &mut Transaction<'_, Sqlite>,
    owner_id: &str,
    member_key: &str,
    key: &str,
    payment: &Payment,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO payments
         (owner_id, member_key, key, amount_per_month, total_amount, amount, extra_amount,
          start_month, num_months, date)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(owner_id)
    .bind(member_key)
    .bind(key)
    .bind(payment.amount_per_month)
    .bind(payment.total_amount)
    .bind(payment.amount)
    .bind(payment.extra_amount)
    .bind(&payment.start_month)
    .bind(payment.num_months)
    .bind(&payment.date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_expense(
    tx: &mut Transaction<'_, Sqlite>,
    owner_id: &str,
    key: &str,
    expense: &Expense,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO expenses (owner_id, key, category, description, amount, date)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(owner_id)
    .bind(key)
    .bind(&expense.category)
    .bind(&expense.description)
    .bind(expense.amount)
    .bind(&expense.date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Convert a PaymentRow to a Payment
fn row_to_payment(r: PaymentRow) -> Payment {
    Payment {
        amount_per_month: r.amount_per_month,
        total_amount: r.total_amount,
        amount: r.amount,
        extra_amount: r.extra_amount,
        start_month: r.start_month,
        num_months: r.num_months,
        date: r.date,
    }
}

/// Ledger statistics
#[derive(Debug)]
pub struct LedgerStats {
    pub owners: u64,
    pub members: u64,
    pub payments: u64,
    pub expenses: u64,
}

impl fmt::Display for LedgerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} owners, {} members, {} payments, {} expenses",
            self.owners, self.members, self.payments, self.expenses
        )
    }
}
