//! Owner, member and payment records as stored in the realtime document store
//!
//! Field names follow the store's camelCase document layout. Every numeric
//! field is optional because older records omit or stringify them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants;
use crate::expenses::Expense;
use crate::lenient;
use crate::month::{self, YearMonth};

/// Root document for one club: the administrator account and all its data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub club_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub monthly_fee: Option<f64>,
    #[serde(default, deserialize_with = "lenient::map")]
    pub members: BTreeMap<String, Member>,
    #[serde(default, deserialize_with = "lenient::map")]
    pub expenses: BTreeMap<String, Expense>,
}

impl Owner {
    pub fn display_name(&self) -> &str {
        match self.name.trim() {
            "" => constants::DEFAULT_OWNER_NAME,
            name => name,
        }
    }

    pub fn display_club_name(&self) -> &str {
        match self.club_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => constants::DEFAULT_CLUB_NAME,
        }
    }
}

/// A club member tracked for dues
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::map")]
    pub payments: BTreeMap<String, Payment>,
}

/// One recorded payment covering `numMonths` consecutive months from `startMonth`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub amount_per_month: Option<f64>,
    /// Base amount for the whole span; extra amounts are never folded in
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    /// Oldest record shape: the amount paid for the whole span
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub extra_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub start_month: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub num_months: Option<f64>,
    /// Entry timestamp
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Payment {
    /// Payment in the canonical shape: base total = rate x months, extra kept apart
    pub fn new(
        amount_per_month: f64,
        start: YearMonth,
        num_months: u32,
        extra_amount: Option<f64>,
        entered_at: NaiveDateTime,
    ) -> Self {
        Self {
            amount_per_month: Some(amount_per_month),
            total_amount: Some(amount_per_month * f64::from(num_months)),
            amount: None,
            extra_amount,
            start_month: Some(start.to_string()),
            num_months: Some(f64::from(num_months)),
            date: Some(month::format_timestamp(entered_at)),
        }
    }

    /// Number of covered months; zero when missing, non-positive or unreadable.
    ///
    /// Fractional counts round up, so `2.5` covers three months.
    pub fn months(&self) -> u32 {
        match self.num_months {
            Some(n) if n > 0.0 => n.ceil().min(f64::from(u32::MAX)) as u32,
            _ => 0,
        }
    }

    /// First covered month, if `startMonth` is a valid `YYYY-MM`
    pub fn start(&self) -> Option<YearMonth> {
        self.start_month.as_deref()?.parse().ok()
    }

    pub fn extra(&self) -> f64 {
        self.extra_amount.unwrap_or(0.0)
    }

    pub fn entered_at(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(month::parse_timestamp)
    }

    pub fn entry_date(&self) -> Option<NaiveDate> {
        self.entered_at().map(|dt| dt.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_legacy_shapes_decode() {
        let payment: Payment = serde_json::from_value(json!({
            "amount": "1200",
            "numMonths": "6",
            "startMonth": "2024-01",
            "date": "2024-01-05T08:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(payment.amount, Some(1200.0));
        assert_eq!(payment.amount_per_month, None);
        assert_eq!(payment.months(), 6);
        assert_eq!(payment.start(), YearMonth::new(2024, 1));
    }

    #[test]
    fn test_payment_garbage_fields_decode_as_absent() {
        let payment: Payment = serde_json::from_value(json!({
            "amountPerMonth": "two hundred",
            "numMonths": null,
            "startMonth": {"oops": true},
            "extraAmount": []
        }))
        .unwrap();

        assert_eq!(payment.amount_per_month, None);
        assert_eq!(payment.months(), 0);
        assert_eq!(payment.start(), None);
        assert_eq!(payment.extra(), 0.0);
    }

    #[test]
    fn test_months_rounding() {
        let mut payment = Payment::default();
        assert_eq!(payment.months(), 0);
        payment.num_months = Some(-3.0);
        assert_eq!(payment.months(), 0);
        payment.num_months = Some(2.5);
        assert_eq!(payment.months(), 3);
    }

    #[test]
    fn test_canonical_payment_round_trips_through_json() {
        let entered = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let payment = Payment::new(200.0, YearMonth::new(2024, 3).unwrap(), 4, Some(50.0), entered);

        assert_eq!(payment.total_amount, Some(800.0));
        assert_eq!(payment.date.as_deref(), Some("2024-03-15T09:30:00.000Z"));

        let value = serde_json::to_value(&payment).unwrap();
        assert_eq!(value["amountPerMonth"], json!(200.0));
        assert!(value.get("amount").is_none());

        let back: Payment = serde_json::from_value(value).unwrap();
        assert_eq!(back, payment);
        assert_eq!(back.entry_date(), Some(entered.date()));
    }

    #[test]
    fn test_owner_null_mappings_and_defaults() {
        let owner: Owner = serde_json::from_value(json!({
            "name": "",
            "members": null,
            "monthlyFee": "200"
        }))
        .unwrap();

        assert!(owner.members.is_empty());
        assert!(owner.expenses.is_empty());
        assert_eq!(owner.monthly_fee, Some(200.0));
        assert_eq!(owner.display_name(), constants::DEFAULT_OWNER_NAME);
        assert_eq!(owner.display_club_name(), constants::DEFAULT_CLUB_NAME);
    }

    #[test]
    fn test_corrupt_payment_leaves_rest_of_owner_readable() {
        let owner: Owner = serde_json::from_value(json!({
            "name": "Admin",
            "members": {
                "Rahim": {
                    "name": "Rahim",
                    "phone": "017",
                    "payments": {
                        "-good": {"amountPerMonth": 200, "numMonths": 2, "startMonth": "2024-01"},
                        "-bad": "corrupt"
                    }
                },
                "Karim": "not a member"
            }
        }))
        .unwrap();

        assert_eq!(owner.members.len(), 1);
        let payments = &owner.members["Rahim"].payments;
        assert_eq!(payments.len(), 1);
        assert_eq!(payments["-good"].amount_per_month, Some(200.0));
    }
}
