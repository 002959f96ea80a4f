//! Aggregation of labeled records for the stats API, history page and charts.
//!
//! Everything is recomputed from the full list of records on each request,
//! nothing is cached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    classifier::{FraudLabel, PaymentMethod},
    history::LabeledRecord,
};

/// The number of records per label, keyed by the `is_fraud` flag (`"0"` or `"1"`).
///
/// Labels that never occur are left out.
pub type LabelDistribution = BTreeMap<String, u64>;

/// Counts derived from a full scan of the history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The number of records.
    pub total: u64,
    /// The number of records labeled as fraud.
    pub fraud: u64,
    /// The number of fraudulent records per method, as the method was stored.
    pub by_method: BTreeMap<String, u64>,
    /// The number of records per method, as the method was stored.
    pub method_counts: BTreeMap<String, u64>,
    /// The label distribution of credit card records.
    pub credit_chart: LabelDistribution,
    /// The label distribution of UPI records.
    pub upi_chart: LabelDistribution,
}

impl Summary {
    /// The label distribution for one of the payment methods with its own page.
    pub fn chart_for(&self, method: PaymentMethod) -> &LabelDistribution {
        match method {
            PaymentMethod::Credit => &self.credit_chart,
            PaymentMethod::Upi => &self.upi_chart,
        }
    }
}

/// Aggregate `records` in a single pass.
///
/// Records with an empty method still count towards the totals but are left
/// out of the per-method maps. The credit and UPI distributions match the
/// method case-insensitively.
pub fn summarize(records: &[LabeledRecord]) -> Summary {
    let mut summary = Summary::default();

    for record in records {
        let fraud = u64::from(record.is_fraud.as_flag());

        summary.total += 1;
        summary.fraud += fraud;

        if !record.method.is_empty() {
            *summary.by_method.entry(record.method.clone()).or_default() += fraud;
            *summary
                .method_counts
                .entry(record.method.clone())
                .or_default() += 1;
        }

        let chart = match PaymentMethod::parse(&record.method) {
            Some(PaymentMethod::Credit) => &mut summary.credit_chart,
            Some(PaymentMethod::Upi) => &mut summary.upi_chart,
            None => continue,
        };

        *chart.entry(record.is_fraud.to_string()).or_default() += 1;
    }

    summary
}

/// Count how many times each label occurs.
pub fn label_distribution(labels: impl IntoIterator<Item = FraudLabel>) -> LabelDistribution {
    let mut distribution = LabelDistribution::new();

    for label in labels {
        *distribution.entry(label.to_string()).or_default() += 1;
    }

    distribution
}

/// The number of fraudulent records in a label distribution.
pub(crate) fn fraud_count(distribution: &LabelDistribution) -> u64 {
    distribution
        .get(&FraudLabel::Fraud.to_string())
        .copied()
        .unwrap_or(0)
}
