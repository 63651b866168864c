//! Club Ledger
//!
//! Bookkeeping for a membership club: members pay dues that cover a run of
//! calendar months, sometimes with an extra donation on top, and the club
//! records its expenses. The [`coverage`] module turns payments into
//! per-month, per-year and all-time figures; everything else stores, feeds
//! and reports on that data.

pub mod config;
pub mod constants;
pub mod coverage;
pub mod error;
pub mod expenses;
pub mod feed;
pub mod lenient;
pub mod model;
pub mod month;
pub mod remote;
pub mod reports;
pub mod rollups;
pub mod session;
pub mod store;

pub use error::LedgerError;
pub use model::{Member, Owner, Payment};
pub use month::YearMonth;
pub use session::Session;
pub use store::Ledger;
