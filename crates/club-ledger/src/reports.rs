//! Report generation (CSV outputs and console summary)

use anyhow::Result;
use csv::Writer;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::coverage::{self, MemberYear};
use crate::expenses;
use crate::model::{Member, Owner, Payment};
use crate::rollups::{self, MonthlyPoint};

/// Generate the yearly coverage, ledger summary and expense ledger CSVs
pub fn generate_all_reports(
    output_dir: &Path,
    owner: &Owner,
    year: i32,
    unit: &str,
) -> Result<Vec<PathBuf>> {
    let coverage = generate_coverage_report(output_dir, owner, year, unit, None)?;

    let summary = output_dir.join(constants::SUMMARY_FILENAME);
    write_summary(owner, None, std::fs::File::create(&summary)?)?;
    println!("  Generated: {}", summary.display());

    let expense_ledger = output_dir.join(constants::EXPENSE_LEDGER_FILENAME);
    expenses::export_to_csv(&owner.expenses, &expense_ledger)?;
    println!("  Generated: {}", expense_ledger.display());

    Ok(vec![coverage, summary, expense_ledger])
}

/// File name for a club's yearly coverage report
pub fn coverage_report_filename(club_name: &str, year: i32) -> String {
    format!("{}_Monthly_Report_{}.csv", file_stem(club_name), year)
}

/// Generate `<club>_Monthly_Report_<year>.csv`
pub fn generate_coverage_report(
    output_dir: &Path,
    owner: &Owner,
    year: i32,
    unit: &str,
    search: Option<&str>,
) -> Result<PathBuf> {
    let path = output_dir.join(coverage_report_filename(owner.display_club_name(), year));
    let rows = coverage_rows(owner, year, search);
    write_coverage_report(&rows, unit, std::fs::File::create(&path)?)?;
    println!("  Generated: {}", path.display());
    Ok(path)
}

/// Coverage rows for every member (or those matching `search`), in key order
pub fn coverage_rows(owner: &Owner, year: i32, search: Option<&str>) -> Vec<MemberYear> {
    rollups::search_members(owner, search.unwrap_or(""))
        .into_iter()
        .filter_map(|key| owner.members.get(key))
        .map(|member| coverage::member_year(member, year))
        .collect()
}

/// Write the yearly coverage table: one row per member, one column per month
pub fn write_coverage_report<W: io::Write>(rows: &[MemberYear], unit: &str, out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);

    let mut header = vec!["Member Name".to_string()];
    header.extend(constants::MONTH_LABELS.iter().map(|m| m.to_string()));
    header.push(format!("Extra ({unit})"));
    header.push(format!("Total ({unit})"));
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.name.clone()];
        record.extend(row.monthly.iter().map(|amount| blank_if_zero(*amount)));
        record.push(blank_if_zero(row.extra));
        record.push(format!("{:.0}", row.total));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// File name for a member's payment history export
pub fn payment_history_filename(member: &Member) -> String {
    format!("{}_payment_history.csv", file_stem(&member.name))
}

/// Generate `<member>_payment_history.csv`
pub fn generate_payment_history(
    output_dir: &Path,
    member: &Member,
    date_prefix: Option<&str>,
) -> Result<PathBuf> {
    let path = output_dir.join(payment_history_filename(member));
    write_payment_history(member, date_prefix, std::fs::File::create(&path)?)?;
    println!("  Generated: {}", path.display());
    Ok(path)
}

/// Covered months as "Nov 2023, Dec 2023"; long spans collapse to
/// "Nov 2023 - Oct 2027 (48 months)"
fn covered_label(payment: &Payment) -> String {
    let Some((first, last)) = coverage::covered_span(payment) else {
        return String::new();
    };
    let months = payment.months();
    if months <= constants::MAX_LISTED_MONTHS {
        let labels: Vec<_> = coverage::covered_months(payment).map(|m| m.label()).collect();
        labels.join(", ")
    } else {
        format!("{} - {} ({months} months)", first.label(), last.label())
    }
}

/// Write a member's payments, newest first, with running totals
pub fn write_payment_history<W: io::Write>(
    member: &Member,
    date_prefix: Option<&str>,
    out: W,
) -> Result<()> {
    let mut wtr = Writer::from_writer(out);

    // Header
    wtr.write_record([
        "Date",
        "Amount Per Month",
        "Total Paid",
        "Extra",
        "Start Month",
        "Num Months",
        "Covered Months",
        "Running Total",
        "Running Months",
    ])?;

    for entry in rollups::payment_history(member, date_prefix) {
        let payment = entry.payment;
        let date = payment
            .entered_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .or_else(|| payment.date.clone())
            .unwrap_or_default();

        wtr.write_record([
            date,
            format!("{:.2}", coverage::resolved_rate(payment)),
            format!("{:.2}", coverage::base_total(payment)),
            format!("{:.2}", payment.extra()),
            payment.start_month.clone().unwrap_or_default(),
            payment.months().to_string(),
            covered_label(payment),
            format!("{:.2}", entry.running_amount),
            entry.running_months.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the ledger summary: monthly collection/expense/net rows, then one
/// TOTAL row per year
pub fn write_summary<W: io::Write>(owner: &Owner, year_filter: Option<i32>, out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);

    // Header
    wtr.write_record(["Month", "Collection", "Expense", "Net", "YTD_Net"])?;

    let series: Vec<MonthlyPoint> = rollups::monthly_series(owner)
        .into_iter()
        .filter(|p| year_filter.is_none_or(|year| p.month.year() == year))
        .collect();

    // Track annual totals for summary rows
    let mut annual: BTreeMap<i32, (f64, f64)> = BTreeMap::new();
    let mut ytd = 0.0;
    let mut current_year: Option<i32> = None;

    for point in &series {
        let year = point.month.year();

        // Reset YTD at year boundary
        if current_year != Some(year) {
            current_year = Some(year);
            ytd = 0.0;
        }
        ytd += point.net();

        let totals = annual.entry(year).or_default();
        totals.0 += point.collection;
        totals.1 += point.expense;

        wtr.write_record([
            point.month.to_string(),
            format!("{:.2}", point.collection),
            format!("{:.2}", point.expense),
            format!("{:.2}", point.net()),
            format!("{:.2}", ytd),
        ])?;
    }

    for (year, (collection, expense)) in &annual {
        wtr.write_record([
            format!("{} TOTAL", year),
            format!("{:.2}", collection),
            format!("{:.2}", expense),
            format!("{:.2}", collection - expense),
            String::new(), // No YTD for annual rows
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Print summary to console
pub fn print_summary(owner: &Owner, year: i32, unit: &str) {
    let totals = rollups::dashboard_totals(owner);
    let year_collected = coverage::yearly_total_collected(owner.members.values(), year);

    println!("\n============================================================");
    println!("     {} - FINANCIAL SUMMARY", owner.display_club_name());
    println!("============================================================\n");

    println!("COLLECTIONS (all time):");
    println!("  Monthly fees:       {:>12.2} {unit}", normalize_zero(totals.base_collected));
    println!("  Extra / donations:  {:>12.2} {unit}", normalize_zero(totals.extra_collected));
    println!("  ─────────────────────────────────────────────");
    println!("  Total Collected:    {:>12.2} {unit}", normalize_zero(totals.total_collected));

    println!("\nCOLLECTED IN {year}:");
    println!("  Fees + extra:       {:>12.2} {unit}", normalize_zero(year_collected));

    println!("\nEXPENSES:");
    for (category, amount) in expenses::expenses_by_category(owner.expenses.values()) {
        println!("  {:<20}{:>12.2} {unit}", truncate(&category, 19), amount);
    }
    println!("  ─────────────────────────────────────────────");
    println!("  Total Spent:        {:>12.2} {unit}", normalize_zero(totals.total_spent));

    println!("\nBALANCE:");
    println!("  Club Balance:       {:>12.2} {unit}", normalize_zero(totals.balance));
    println!("  Members:            {:>12}", owner.members.len());
    println!("============================================================");
}

/// Normalize -0.0 to 0.0 for cleaner display
fn normalize_zero(val: f64) -> f64 {
    if val == 0.0 { 0.0 } else { val }
}

/// Whole amount, or an empty cell for zero
pub fn blank_if_zero(amount: f64) -> String {
    if amount > 0.0 {
        format!("{:.0}", amount)
    } else {
        String::new()
    }
}

/// Truncate string for display
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// File-name-safe version of a display name
fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() { "club".to_string() } else { stem }
}
