//! Cross-member and cross-expense rollups for dashboard cards, tables and charts
//!
//! Everything here is derived from one owner snapshot; base and extra amounts
//! always come from [`crate::coverage`].

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::coverage;
use crate::expenses::{self, Expense};
use crate::model::{Member, Owner, Payment};
use crate::month::YearMonth;

/// Headline figures for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardTotals {
    pub base_collected: f64,
    pub extra_collected: f64,
    pub total_collected: f64,
    pub total_spent: f64,
    pub balance: f64,
}

pub fn dashboard_totals(owner: &Owner) -> DashboardTotals {
    let base_collected = coverage::all_time_total_collected(owner.members.values());
    let extra_collected = coverage::all_time_extra_collected(owner.members.values());
    let total_collected = base_collected + extra_collected;
    let total_spent = expenses::total_expenses(owner.expenses.values());

    DashboardTotals {
        base_collected,
        extra_collected,
        total_collected,
        total_spent,
        balance: total_collected - total_spent,
    }
}

/// Per-member payment summary row
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSummary {
    pub key: String,
    pub name: String,
    pub total_amount: f64,
    pub total_months: u64,
    pub payment_count: usize,
}

/// Member summaries, largest total first
pub fn member_summaries(owner: &Owner) -> Vec<MemberSummary> {
    let mut summaries: Vec<_> = owner
        .members
        .iter()
        .map(|(key, member)| MemberSummary {
            key: key.clone(),
            name: member.name.clone(),
            total_amount: member.payments.values().map(coverage::base_total).sum(),
            total_months: member.payments.values().map(|p| u64::from(p.months())).sum(),
            payment_count: member.payments.len(),
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| a.key.cmp(&b.key))
    });
    summaries
}

/// One point of the collection-vs-expense chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyPoint {
    pub month: YearMonth,
    pub collection: f64,
    pub expense: f64,
}

impl MonthlyPoint {
    pub fn net(&self) -> f64 {
        self.collection - self.expense
    }
}

/// Collections and expenses bucketed by entry month, oldest first.
///
/// A payment's collection (base plus extra) lands in the month it was entered.
/// Records with unreadable dates are left out.
pub fn monthly_series(owner: &Owner) -> Vec<MonthlyPoint> {
    let mut deltas: Vec<(YearMonth, f64, f64)> = Vec::new();
    for payment in owner.members.values().flat_map(|m| m.payments.values()) {
        if let Some(date) = payment.entry_date() {
            let amount = coverage::base_total(payment) + payment.extra();
            deltas.push((YearMonth::from_date(date), amount, 0.0));
        }
    }
    for (month, amount) in expenses::expenses_by_month(owner.expenses.values()) {
        deltas.push((month, 0.0, amount));
    }

    let mut points: BTreeMap<YearMonth, MonthlyPoint> = BTreeMap::new();
    for (month, collection, expense) in deltas {
        let entry = points.entry(month).or_insert(MonthlyPoint {
            month,
            collection: 0.0,
            expense: 0.0,
        });
        entry.collection += collection;
        entry.expense += expense;
    }

    points.into_values().collect()
}

/// A payment together with the member and key it is stored under
#[derive(Debug, Clone, Copy)]
pub struct PaymentRef<'a> {
    pub member_key: &'a str,
    pub member: &'a Member,
    pub key: &'a str,
    pub payment: &'a Payment,
}

/// Most recently entered payments across all members, newest first
pub fn recent_payments(owner: &Owner, limit: usize) -> Vec<PaymentRef<'_>> {
    let mut all: Vec<_> = owner
        .members
        .iter()
        .flat_map(|(member_key, member)| {
            member.payments.iter().map(move |(key, payment)| PaymentRef {
                member_key: member_key.as_str(),
                member,
                key: key.as_str(),
                payment,
            })
        })
        .collect();

    all.sort_by(|a, b| b.payment.entered_at().cmp(&a.payment.entered_at()));
    all.truncate(limit);
    all
}

/// Most recently entered expenses, newest first
pub fn recent_expenses(owner: &Owner, limit: usize) -> Vec<(&str, &Expense)> {
    let mut all: Vec<_> = owner
        .expenses
        .iter()
        .map(|(key, expense)| (key.as_str(), expense))
        .collect();

    all.sort_by(|a, b| b.1.entered_at().cmp(&a.1.entered_at()));
    all.truncate(limit);
    all
}

/// Number of payments entered on `day`
pub fn payments_on(owner: &Owner, day: NaiveDate) -> usize {
    owner
        .members
        .values()
        .flat_map(|m| m.payments.values())
        .filter(|p| p.entry_date() == Some(day))
        .count()
}

/// Payment with running amount and month counts
#[derive(Debug, Clone)]
pub struct HistoryEntry<'a> {
    pub key: &'a str,
    pub payment: &'a Payment,
    pub running_amount: f64,
    pub running_months: u64,
}

/// A member's payments newest first, optionally limited to entries whose date
/// starts with `date_prefix`, with running totals accumulated in listing order
pub fn payment_history<'a>(member: &'a Member, date_prefix: Option<&str>) -> Vec<HistoryEntry<'a>> {
    let mut listed: Vec<_> = member
        .payments
        .iter()
        .filter(|(_, p)| match date_prefix {
            Some(prefix) => p.date.as_deref().is_some_and(|d| d.starts_with(prefix)),
            None => true,
        })
        .collect();
    listed.sort_by(|a, b| b.1.entered_at().cmp(&a.1.entered_at()));

    let mut running_amount = 0.0;
    let mut running_months = 0u64;
    listed
        .into_iter()
        .map(|(key, payment)| {
            running_amount += coverage::base_total(payment);
            running_months += u64::from(payment.months());
            HistoryEntry {
                key: key.as_str(),
                payment,
                running_amount,
                running_months,
            }
        })
        .collect()
}

/// Member keys matching `query` by name (case-insensitive) or phone substring
pub fn search_members<'a>(owner: &'a Owner, query: &str) -> Vec<&'a str> {
    let query = query.trim();
    if query.is_empty() {
        return owner.members.keys().map(String::as_str).collect();
    }
    let lower = query.to_lowercase();

    owner
        .members
        .iter()
        .filter(|(key, member)| {
            key.to_lowercase().contains(&lower)
                || member.name.to_lowercase().contains(&lower)
                || member.phone.contains(query)
        })
        .map(|(key, _)| key.as_str())
        .collect()
}

/// When the member's most recent payment was entered
pub fn last_payment_at(member: &Member) -> Option<NaiveDateTime> {
    member.payments.values().filter_map(Payment::entered_at).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(rate: f64, months: f64, extra: Option<f64>, date: &str) -> Payment {
        Payment {
            amount_per_month: Some(rate),
            total_amount: Some(rate * months),
            extra_amount: extra,
            start_month: Some("2024-01".to_string()),
            num_months: Some(months),
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn expense(amount: f64, date: &str) -> Expense {
        Expense {
            category: "Hall".to_string(),
            description: None,
            amount: Some(amount),
            date: Some(date.to_string()),
        }
    }

    fn owner() -> Owner {
        let rahim = Member {
            name: "Rahim".to_string(),
            phone: "01711000000".to_string(),
            payments: BTreeMap::from([
                ("p1".to_string(), payment(200.0, 3.0, None, "2024-01-05T09:00:00.000Z")),
                ("p2".to_string(), payment(200.0, 1.0, Some(100.0), "2024-02-07T09:00:00.000Z")),
            ]),
        };
        let karim = Member {
            name: "Karim".to_string(),
            phone: "01822000000".to_string(),
            payments: BTreeMap::from([(
                "p3".to_string(),
                payment(300.0, 4.0, None, "2024-02-01T09:00:00.000Z"),
            )]),
        };

        Owner {
            name: "Admin".to_string(),
            members: BTreeMap::from([("Rahim".to_string(), rahim), ("Karim".to_string(), karim)]),
            expenses: BTreeMap::from([
                ("e1".to_string(), expense(500.0, "2024-01-20T09:00:00.000Z")),
                ("e2".to_string(), expense(250.0, "2024-03-02T09:00:00.000Z")),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_dashboard_totals_keep_base_and_extra_apart() {
        let totals = dashboard_totals(&owner());
        assert_eq!(totals.base_collected, 600.0 + 200.0 + 1200.0);
        assert_eq!(totals.extra_collected, 100.0);
        assert_eq!(totals.total_collected, 2100.0);
        assert_eq!(totals.total_spent, 750.0);
        assert_eq!(totals.balance, 1350.0);
    }

    #[test]
    fn test_dashboard_totals_empty_owner() {
        assert_eq!(dashboard_totals(&Owner::default()), DashboardTotals::default());
    }

    #[test]
    fn test_member_summaries_sorted_by_total() {
        let summaries = member_summaries(&owner());
        assert_eq!(summaries[0].key, "Karim");
        assert_eq!(summaries[0].total_amount, 1200.0);
        assert_eq!(summaries[0].total_months, 4);
        assert_eq!(summaries[1].key, "Rahim");
        assert_eq!(summaries[1].total_amount, 800.0);
        assert_eq!(summaries[1].payment_count, 2);
    }

    #[test]
    fn test_monthly_series() {
        let series = monthly_series(&owner());
        let jan = YearMonth::new(2024, 1).unwrap();
        let feb = YearMonth::new(2024, 2).unwrap();
        let mar = YearMonth::new(2024, 3).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series[0], MonthlyPoint { month: jan, collection: 600.0, expense: 500.0 });
        assert_eq!(series[1], MonthlyPoint { month: feb, collection: 1500.0, expense: 0.0 });
        assert_eq!(series[2], MonthlyPoint { month: mar, collection: 0.0, expense: 250.0 });
        assert_eq!(series[1].net(), 1500.0);
    }

    #[test]
    fn test_recent_payments_newest_first() {
        let owner = owner();
        let recent = recent_payments(&owner, 2);
        let keys: Vec<_> = recent.iter().map(|p| p.key).collect();
        assert_eq!(keys, vec!["p2", "p3"]);
        assert_eq!(recent[0].member_key, "Rahim");
    }

    #[test]
    fn test_recent_expenses_newest_first() {
        let owner = owner();
        let recent = recent_expenses(&owner, 10);
        assert_eq!(recent[0].0, "e2");
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn test_payments_on_day() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 7).unwrap();
        assert_eq!(payments_on(&owner(), day), 1);
    }

    #[test]
    fn test_payment_history_running_totals() {
        let owner = owner();
        let history = payment_history(&owner.members["Rahim"], None);
        assert_eq!(history[0].key, "p2");
        assert_eq!(history[0].running_amount, 200.0);
        assert_eq!(history[0].running_months, 1);
        assert_eq!(history[1].running_amount, 800.0);
        assert_eq!(history[1].running_months, 4);

        let filtered = payment_history(&owner.members["Rahim"], Some("2024-01"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].key, "p1");
    }

    #[test]
    fn test_search_members_by_name_or_phone() {
        let owner = owner();
        assert_eq!(search_members(&owner, "rah"), vec!["Rahim"]);
        assert_eq!(search_members(&owner, "0182"), vec!["Karim"]);
        assert_eq!(search_members(&owner, "  ").len(), 2);
        assert!(search_members(&owner, "zzz").is_empty());
    }

    #[test]
    fn test_last_payment_at() {
        let owner = owner();
        let last = last_payment_at(&owner.members["Rahim"]).unwrap();
        assert_eq!(last.date(), NaiveDate::from_ymd_opt(2024, 2, 7).unwrap());
        assert_eq!(last_payment_at(&Member::default()), None);
    }
}
