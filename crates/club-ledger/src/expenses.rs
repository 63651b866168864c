//! Club expense tracking: records, reducers, and CSV import/export

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::Path;

use crate::constants;
use crate::lenient;
use crate::month::{self, YearMonth};

/// Expense entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Entry timestamp
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Expense {
    pub fn amount(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    /// Category label, with blank categories grouped as uncategorized
    pub fn category_label(&self) -> &str {
        match self.category.trim() {
            "" => constants::UNCATEGORIZED,
            category => category,
        }
    }

    pub fn entered_at(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(month::parse_timestamp)
    }

    pub fn entry_date(&self) -> Option<NaiveDate> {
        self.entered_at().map(|dt| dt.date())
    }
}

/// Flat CSV row for expense backup and import
#[derive(Debug, Serialize, Deserialize)]
struct ExpenseRecord {
    #[serde(rename = "Key", default)]
    key: String,
    #[serde(rename = "Date", default)]
    date: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Amount")]
    amount: f64,
}

/// Load expenses from a CSV file (for importing/migration).
///
/// Keys in the file are ignored; the store assigns new ones.
pub fn load_from_csv(path: &Path) -> Result<Vec<Expense>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut expenses = Vec::new();
    for result in rdr.deserialize() {
        let record: ExpenseRecord = result?;
        expenses.push(Expense {
            category: record.category,
            description: Some(record.description).filter(|d| !d.trim().is_empty()),
            amount: Some(record.amount),
            date: Some(record.date).filter(|d| !d.trim().is_empty()),
        });
    }
    Ok(expenses)
}

/// Export keyed expenses to CSV (for backup)
pub fn export_to_csv<'a>(
    expenses: impl IntoIterator<Item = (&'a String, &'a Expense)>,
    path: &Path,
) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    write_csv(expenses, file)
}

/// Write keyed expenses as CSV rows, oldest first
pub fn write_csv<'a, W: io::Write>(
    expenses: impl IntoIterator<Item = (&'a String, &'a Expense)>,
    out: W,
) -> Result<usize> {
    let mut rows: Vec<_> = expenses.into_iter().collect();
    rows.sort_by_key(|(_, e)| e.entered_at());

    let mut wtr = csv::Writer::from_writer(out);
    for (key, expense) in &rows {
        wtr.serialize(ExpenseRecord {
            key: (*key).clone(),
            date: expense.date.clone().unwrap_or_default(),
            category: expense.category.clone(),
            description: expense.description.clone().unwrap_or_default(),
            amount: expense.amount(),
        })?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Calculate total expenses by category, largest first
pub fn expenses_by_category<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> Vec<(String, f64)> {
    let mut totals: HashMap<String, f64> = HashMap::new();

    for expense in expenses {
        *totals.entry(expense.category_label().to_string()).or_insert(0.0) += expense.amount();
    }

    let mut result: Vec<_> = totals.into_iter().collect();
    result.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    result
}

/// Calculate total expenses by entry month, oldest first
pub fn expenses_by_month<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> Vec<(YearMonth, f64)> {
    let mut totals: HashMap<YearMonth, f64> = HashMap::new();

    for expense in expenses {
        if let Some(date) = expense.entry_date() {
            *totals.entry(YearMonth::from_date(date)).or_insert(0.0) += expense.amount();
        }
    }

    let mut result: Vec<_> = totals.into_iter().collect();
    result.sort_by_key(|(month, _)| *month);
    result
}

/// Get total expenses
pub fn total_expenses<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> f64 {
    expenses.into_iter().map(Expense::amount).sum()
}

/// Expense with the running total of everything listed before it
#[derive(Debug, Clone)]
pub struct RunningExpense<'a> {
    pub key: &'a str,
    pub expense: &'a Expense,
    pub running_total: f64,
}

/// Newest-first expense listing, optionally limited to entries whose date
/// starts with `date_prefix` (e.g. `2024-03` or `2024-03-15`)
pub fn with_running_totals<'a>(
    expenses: impl IntoIterator<Item = (&'a String, &'a Expense)>,
    date_prefix: Option<&str>,
) -> Vec<RunningExpense<'a>> {
    let mut listed: Vec<_> = expenses
        .into_iter()
        .filter(|(_, e)| match date_prefix {
            Some(prefix) => e.date.as_deref().is_some_and(|d| d.starts_with(prefix)),
            None => true,
        })
        .collect();
    listed.sort_by(|a, b| b.1.entered_at().cmp(&a.1.entered_at()));

    let mut running = 0.0;
    listed
        .into_iter()
        .map(|(key, expense)| {
            running += expense.amount();
            RunningExpense {
                key: key.as_str(),
                expense,
                running_total: running,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn expense(category: &str, amount: f64, date: &str) -> Expense {
        Expense {
            category: category.to_string(),
            description: None,
            amount: Some(amount),
            date: Some(date.to_string()),
        }
    }

    fn sample() -> BTreeMap<String, Expense> {
        BTreeMap::from([
            ("a".to_string(), expense("Rent", 1000.0, "2024-01-10T10:00:00.000Z")),
            ("b".to_string(), expense("Tea", 150.0, "2024-01-20T10:00:00.000Z")),
            ("c".to_string(), expense("Rent", 1000.0, "2024-02-10T10:00:00.000Z")),
            ("d".to_string(), expense("  ", 40.0, "2024-02-11T10:00:00.000Z")),
            ("e".to_string(), expense("Tea", 60.0, "garbage")),
        ])
    }

    #[test]
    fn test_total_expenses() {
        assert_eq!(total_expenses(sample().values()), 2250.0);
        assert_eq!(total_expenses(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_expenses_by_category() {
        let by_category = expenses_by_category(sample().values());
        assert_eq!(
            by_category,
            vec![
                ("Rent".to_string(), 2000.0),
                ("Tea".to_string(), 210.0),
                (constants::UNCATEGORIZED.to_string(), 40.0),
            ]
        );
    }

    #[test]
    fn test_expenses_by_month_skips_bad_dates() {
        let by_month = expenses_by_month(sample().values());
        assert_eq!(
            by_month,
            vec![
                (YearMonth::new(2024, 1).unwrap(), 1150.0),
                (YearMonth::new(2024, 2).unwrap(), 1040.0),
            ]
        );
    }

    #[test]
    fn test_running_totals_newest_first_with_filter() {
        let expenses = sample();
        let listed = with_running_totals(&expenses, Some("2024-01"));
        let keys: Vec<_> = listed.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(listed[0].running_total, 150.0);
        assert_eq!(listed[1].running_total, 1150.0);
    }

    #[test]
    fn test_write_csv_oldest_first() {
        let expenses = sample();
        let mut buf = Vec::new();
        let count = write_csv(&expenses, &mut buf).unwrap();
        assert_eq!(count, 5);

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Key,Date,Category,Description,Amount"));
        // The unreadable date sorts first
        assert!(lines.next().unwrap().starts_with("e,garbage,Tea"));
        assert!(lines.next().unwrap().starts_with("a,2024-01-10"));
    }
}
