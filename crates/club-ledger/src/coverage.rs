//! Coverage aggregation over member payments
//!
//! Base amounts are attributed to the calendar months a payment covers.
//! Extra (donation) amounts are attributed to the year the payment was
//! entered, regardless of which months it covers. Every screen, table and
//! export reads base and extra through this module.
//!
//! All functions are pure and total: unreadable months or dates contribute
//! nothing, missing numbers count as zero.

use chrono::Datelike;

use crate::model::{Member, Payment};
use crate::month::YearMonth;

/// Base-fee amounts per calendar month, January first
pub type MonthlyTotals = [f64; 12];

/// Per-month base rate of a payment.
///
/// Resolution order: `amountPerMonth`, then `totalAmount / numMonths`, then the
/// legacy `amount / numMonths`. A zero field counts as absent.
pub fn resolved_rate(payment: &Payment) -> f64 {
    if let Some(rate) = present(payment.amount_per_month) {
        return rate;
    }
    let months = payment.num_months.unwrap_or(0.0);
    if months <= 0.0 {
        return 0.0;
    }
    present(payment.total_amount)
        .or_else(|| present(payment.amount))
        .map(|total| total / months)
        .unwrap_or(0.0)
}

/// Base amount of a payment over its whole span, excluding extra.
///
/// Resolution order: `totalAmount`, then `amountPerMonth x numMonths`, then the
/// legacy `amount` (which always held the whole-span amount).
pub fn base_total(payment: &Payment) -> f64 {
    if let Some(total) = present(payment.total_amount) {
        return total;
    }
    if let Some(rate) = present(payment.amount_per_month) {
        return rate * payment.num_months.unwrap_or(0.0);
    }
    present(payment.amount).unwrap_or(0.0)
}

/// First and last covered month; `None` when the start month or count is unusable
pub fn covered_span(payment: &Payment) -> Option<(YearMonth, YearMonth)> {
    let start = payment.start()?;
    match payment.months() {
        0 => None,
        months => Some((start, start.plus_months(months - 1))),
    }
}

pub fn first_covered(payment: &Payment) -> Option<YearMonth> {
    covered_span(payment).map(|(first, _)| first)
}

pub fn last_covered(payment: &Payment) -> Option<YearMonth> {
    covered_span(payment).map(|(_, last)| last)
}

/// Months a payment covers, generated lazily; empty when the start month or
/// count is unusable
pub fn covered_months(payment: &Payment) -> impl Iterator<Item = YearMonth> {
    let months = payment.months();
    payment
        .start()
        .into_iter()
        .flat_map(move |start| start.span(months))
}

/// Base-fee coverage of each month of `year`, summed over all payments
pub fn monthly_base_totals<'a>(
    payments: impl IntoIterator<Item = &'a Payment>,
    year: i32,
) -> MonthlyTotals {
    let mut totals = [0.0; 12];
    let year_first = i64::from(year) * 12;
    let year_last = year_first + 11;

    for payment in payments {
        let months = payment.months();
        if months == 0 {
            continue;
        }
        let Some(start) = payment.start() else {
            continue;
        };

        let rate = resolved_rate(payment);
        let first = start.ordinal();
        let last = first + i64::from(months) - 1;

        // Only the part of the span inside the target year lands in a slot
        for ordinal in first.max(year_first)..=last.min(year_last) {
            totals[(ordinal - year_first) as usize] += rate;
        }
    }

    totals
}

/// Extra amounts of payments entered during `year`
pub fn yearly_extra_total<'a>(payments: impl IntoIterator<Item = &'a Payment>, year: i32) -> f64 {
    payments
        .into_iter()
        .filter(|p| p.entry_date().is_some_and(|d| d.year() == year))
        .map(Payment::extra)
        .sum()
}

/// Base coverage plus extra collected in `year`, across all members
pub fn yearly_total_collected<'a>(members: impl IntoIterator<Item = &'a Member>, year: i32) -> f64 {
    members
        .into_iter()
        .map(|member| {
            let base: f64 = monthly_base_totals(member.payments.values(), year).iter().sum();
            base + yearly_extra_total(member.payments.values(), year)
        })
        .sum()
}

/// Base amount of every payment ever recorded, without year filtering
pub fn all_time_total_collected<'a>(members: impl IntoIterator<Item = &'a Member>) -> f64 {
    members
        .into_iter()
        .flat_map(|member| member.payments.values())
        .map(base_total)
        .sum()
}

/// Extra amount of every payment ever recorded
pub fn all_time_extra_collected<'a>(members: impl IntoIterator<Item = &'a Member>) -> f64 {
    members
        .into_iter()
        .flat_map(|member| member.payments.values())
        .map(Payment::extra)
        .sum()
}

/// One member's row in the yearly coverage table
#[derive(Debug, Clone, PartialEq)]
pub struct MemberYear {
    pub name: String,
    pub monthly: MonthlyTotals,
    pub extra: f64,
    pub base_total: f64,
    pub total: f64,
}

pub fn member_year(member: &Member, year: i32) -> MemberYear {
    let monthly = monthly_base_totals(member.payments.values(), year);
    let extra = yearly_extra_total(member.payments.values(), year);
    let base_total: f64 = monthly.iter().sum();

    MemberYear {
        name: member.name.clone(),
        monthly,
        extra,
        base_total,
        total: base_total + extra,
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn payment(rate: f64, start: &str, months: f64) -> Payment {
        Payment {
            amount_per_month: Some(rate),
            total_amount: Some(rate * months),
            start_month: Some(start.to_string()),
            num_months: Some(months),
            date: Some("2023-11-02T10:00:00.000Z".to_string()),
            ..Default::default()
        }
    }

    fn member(name: &str, payments: Vec<Payment>) -> Member {
        Member {
            name: name.to_string(),
            phone: String::new(),
            payments: payments
                .into_iter()
                .enumerate()
                .map(|(i, p)| (format!("p{i}"), p))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_year_boundary_split() {
        let payments = [payment(200.0, "2023-11", 4.0)];

        assert_eq!(
            monthly_base_totals(&payments, 2023),
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 200.0, 200.0]
        );
        assert_eq!(
            monthly_base_totals(&payments, 2024),
            [200.0, 200.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(monthly_base_totals(&payments, 2022), [0.0; 12]);
    }

    #[test]
    fn test_contributions_across_years_sum_to_span_total() {
        let cases = [("2023-01", 1.0), ("2023-07", 12.0), ("2022-12", 30.0), ("2024-02", 7.0)];
        for (start, months) in cases {
            let payments = [payment(150.0, start, months)];
            let total: f64 = (2020..=2030)
                .map(|year| monthly_base_totals(&payments, year).iter().sum::<f64>())
                .sum();
            assert_eq!(total, 150.0 * months, "start {start}, {months} months");
        }
    }

    #[test]
    fn test_span_longer_than_a_year_fills_every_slot() {
        let payments = [payment(100.0, "2023-06", 24.0)];
        assert_eq!(monthly_base_totals(&payments, 2024), [100.0; 12]);
    }

    #[test]
    fn test_overlapping_payments_sum() {
        let payments = [payment(200.0, "2024-01", 3.0), payment(50.0, "2024-02", 1.0)];
        let totals = monthly_base_totals(&payments, 2024);
        assert_eq!(totals[0], 200.0);
        assert_eq!(totals[1], 250.0);
        assert_eq!(totals[2], 200.0);
        assert_eq!(totals[3], 0.0);
    }

    #[test]
    fn test_rate_fallback_from_total_amount() {
        let p = Payment {
            total_amount: Some(1200.0),
            num_months: Some(6.0),
            start_month: Some("2024-01".to_string()),
            ..Default::default()
        };
        assert_eq!(resolved_rate(&p), 200.0);
        assert_eq!(monthly_base_totals([&p], 2024)[5], 200.0);
    }

    #[test]
    fn test_rate_fallback_from_legacy_amount() {
        let p = Payment {
            amount: Some(1200.0),
            num_months: Some(6.0),
            start_month: Some("2024-01".to_string()),
            ..Default::default()
        };
        assert_eq!(resolved_rate(&p), 200.0);
        assert_eq!(base_total(&p), 1200.0);
        assert_eq!(monthly_base_totals([&p], 2024).iter().sum::<f64>(), 1200.0);
    }

    #[test]
    fn test_rate_prefers_explicit_per_month() {
        let p = Payment {
            amount_per_month: Some(300.0),
            total_amount: Some(1200.0),
            amount: Some(50.0),
            num_months: Some(6.0),
            ..Default::default()
        };
        assert_eq!(resolved_rate(&p), 300.0);
    }

    #[test]
    fn test_rate_without_any_amount_is_zero() {
        let p = Payment {
            num_months: Some(3.0),
            start_month: Some("2024-01".to_string()),
            ..Default::default()
        };
        assert_eq!(resolved_rate(&p), 0.0);
        assert_eq!(monthly_base_totals([&p], 2024), [0.0; 12]);
    }

    #[test]
    fn test_malformed_start_month_contributes_nothing() {
        let mut p = payment(200.0, "2024-01", 3.0);
        p.start_month = Some("January".to_string());
        assert_eq!(monthly_base_totals([&p], 2024), [0.0; 12]);
        assert_eq!(covered_months(&p).count(), 0);
        assert_eq!(covered_span(&p), None);

        p.start_month = None;
        assert_eq!(monthly_base_totals([&p], 2024), [0.0; 12]);
    }

    #[test]
    fn test_zero_months_contributes_nothing() {
        let p = payment(200.0, "2024-01", 0.0);
        assert_eq!(monthly_base_totals([&p], 2024), [0.0; 12]);
    }

    #[test]
    fn test_extra_attributed_by_entry_date() {
        let mut p = payment(200.0, "2023-11", 4.0);
        p.extra_amount = Some(500.0);
        p.date = Some("2024-03-15T12:00:00.000Z".to_string());

        assert_eq!(yearly_extra_total([&p], 2024), 500.0);
        assert_eq!(yearly_extra_total([&p], 2023), 0.0);
    }

    #[test]
    fn test_extra_with_unreadable_date_is_excluded() {
        let mut p = payment(200.0, "2024-01", 1.0);
        p.extra_amount = Some(500.0);
        p.date = Some("someday".to_string());
        assert_eq!(yearly_extra_total([&p], 2024), 0.0);
    }

    #[test]
    fn test_empty_member() {
        let m = member("Rahim", vec![]);
        assert_eq!(monthly_base_totals(m.payments.values(), 2024), [0.0; 12]);
        assert_eq!(yearly_extra_total(m.payments.values(), 2024), 0.0);

        let row = member_year(&m, 2024);
        assert_eq!(row.total, 0.0);
    }

    #[test]
    fn test_idempotent() {
        let payments = [payment(200.0, "2023-11", 4.0), payment(75.0, "2024-05", 2.0)];
        assert_eq!(
            monthly_base_totals(&payments, 2024),
            monthly_base_totals(&payments, 2024)
        );
        assert_eq!(
            yearly_extra_total(&payments, 2023),
            yearly_extra_total(&payments, 2023)
        );
    }

    #[test]
    fn test_yearly_total_collected_across_members() {
        let mut with_extra = payment(200.0, "2024-11", 4.0);
        with_extra.extra_amount = Some(100.0);
        with_extra.date = Some("2024-11-01T00:00:00.000Z".to_string());

        let members = [
            member("A", vec![with_extra]),
            member("B", vec![payment(150.0, "2024-01", 2.0)]),
        ];

        // A: Nov + Dec 2024 = 400, extra 100. B: Jan + Feb = 300.
        assert_eq!(yearly_total_collected(&members, 2024), 800.0);
        // A: Jan + Feb 2025 = 400, extra was entered in 2024.
        assert_eq!(yearly_total_collected(&members, 2025), 400.0);
    }

    #[test]
    fn test_all_time_total_uses_fallback_chain() {
        let legacy = Payment {
            amount: Some(600.0),
            num_months: Some(3.0),
            ..Default::default()
        };
        let rate_only = Payment {
            amount_per_month: Some(100.0),
            num_months: Some(2.0),
            ..Default::default()
        };
        let mut canonical = payment(200.0, "2024-01", 4.0);
        canonical.extra_amount = Some(50.0);

        let members = [member("A", vec![legacy, rate_only]), member("B", vec![canonical])];
        assert_eq!(all_time_total_collected(&members), 600.0 + 200.0 + 800.0);
        assert_eq!(all_time_extra_collected(&members), 50.0);
    }

    #[test]
    fn test_member_year_row() {
        let mut p = payment(200.0, "2024-06", 2.0);
        p.extra_amount = Some(30.0);
        p.date = Some("2024-06-01".to_string());
        let m = member("Karim", vec![p]);

        let row = member_year(&m, 2024);
        assert_eq!(row.name, "Karim");
        assert_eq!(row.monthly[5], 200.0);
        assert_eq!(row.monthly[6], 200.0);
        assert_eq!(row.base_total, 400.0);
        assert_eq!(row.extra, 30.0);
        assert_eq!(row.total, 430.0);
    }

    #[test]
    fn test_covered_months_lists_span() {
        let p = payment(200.0, "2023-12", 2.0);
        let labels: Vec<_> = covered_months(&p).map(|m| m.label()).collect();
        assert_eq!(labels, vec!["Dec 2023", "Jan 2024"]);
        assert_eq!(first_covered(&p).map(|m| m.label()).as_deref(), Some("Dec 2023"));
        assert_eq!(last_covered(&p).map(|m| m.label()).as_deref(), Some("Jan 2024"));
    }

    #[test]
    fn test_huge_month_count_stays_bounded() {
        let p = payment(200.0, "2024-01", 4e9);

        let (first, last) = covered_span(&p).unwrap();
        assert_eq!(first, YearMonth::new(2024, 1).unwrap());
        assert_eq!(last.ordinal() - first.ordinal(), 3_999_999_999);
        assert_eq!(covered_months(&p).take(3).count(), 3);
        assert_eq!(monthly_base_totals([&p], 2024), [200.0; 12]);
    }
}
