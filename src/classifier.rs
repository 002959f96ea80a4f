//! Rule based fraud classification for single transactions.
//!
//! There is no model here, just three fixed rules:
//! - **Credit limit**: credit card payments above [CREDIT_AMOUNT_THRESHOLD]
//! - **Large amount**: any payment above [AMOUNT_THRESHOLD]
//! - **Merchant name**: the merchant contains one of [FLAGGED_MERCHANT_KEYWORDS]
//!
//! A transaction matching any rule is labeled [FraudLabel::Fraud].

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Credit card payments above this amount are fraudulent.
pub const CREDIT_AMOUNT_THRESHOLD: f64 = 50_000.0;

/// Payments above this amount are fraudulent, whatever the payment method.
pub const AMOUNT_THRESHOLD: f64 = 20_000.0;

/// Lowercase fragments of merchant names that mark a transaction as fraudulent.
pub const FLAGGED_MERCHANT_KEYWORDS: [&str; 5] = ["fake", "unknown", "scam", "fraud", "suspicious"];

/// Parse a transaction amount, falling back to zero.
///
/// Surrounding whitespace is ignored. Empty, non-numeric and `NaN` values
/// all become `0.0` instead of being rejected, so a malformed amount can
/// never fail a request. A zero amount is never flagged by the amount rules
/// on its own.
///
/// Amounts too large for an `f64` parse as infinity and are kept, so they
/// still trip the amount rules.
pub fn parse_amount_lenient(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(amount) if !amount.is_nan() => amount,
        _ => 0.0,
    }
}

/// A transaction waiting to be classified.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The amount of money that was paid.
    pub amount: f64,
    /// The name of the merchant that was paid.
    pub merchant: String,
    /// The payment method, e.g. "upi" or "credit".
    pub method: String,
}

impl Transaction {
    /// Create a transaction from untrusted text fields.
    ///
    /// The amount is parsed with [parse_amount_lenient], the merchant and
    /// method are kept as given.
    pub fn from_raw(amount: &str, merchant: &str, method: &str) -> Self {
        Self {
            amount: parse_amount_lenient(amount),
            merchant: merchant.to_owned(),
            method: method.to_owned(),
        }
    }
}

/// The binary outcome of classifying a transaction.
///
/// Serialized as the integer `0` or `1` so the CSV history and the JSON API
/// keep the `is_fraud` flag format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FraudLabel {
    /// The transaction matched none of the fraud rules.
    Legitimate,
    /// The transaction matched at least one fraud rule.
    Fraud,
}

impl FraudLabel {
    /// The `is_fraud` flag for this label, `1` for fraud and `0` otherwise.
    pub fn as_flag(self) -> u8 {
        match self {
            FraudLabel::Legitimate => 0,
            FraudLabel::Fraud => 1,
        }
    }

    /// Any flag other than `1` is treated as legitimate.
    pub fn from_flag(flag: u8) -> Self {
        if flag == 1 {
            FraudLabel::Fraud
        } else {
            FraudLabel::Legitimate
        }
    }

    /// Parse an `is_fraud` cell read back from a CSV file.
    ///
    /// Accepts both integer (`1`) and float (`1.0`) spellings of the flag.
    pub fn parse_lenient(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(flag) if flag == 1.0 => FraudLabel::Fraud,
            _ => FraudLabel::Legitimate,
        }
    }

    /// Whether this label marks the transaction as fraudulent.
    pub fn is_fraud(self) -> bool {
        self == FraudLabel::Fraud
    }

    /// A human readable name for charts and tables.
    pub fn name(self) -> &'static str {
        match self {
            FraudLabel::Legitimate => "Legitimate",
            FraudLabel::Fraud => "Fraud",
        }
    }
}

impl Display for FraudLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_flag())
    }
}

impl Serialize for FraudLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_flag())
    }
}

impl<'de> Deserialize<'de> for FraudLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u8::deserialize(deserializer).map(FraudLabel::from_flag)
    }
}

/// The payment methods that get their own information page and chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Credit card payments.
    Credit,
    /// Unified Payments Interface payments.
    Upi,
}

impl PaymentMethod {
    /// Match a stored method name, ignoring case.
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_lowercase().as_str() {
            "credit" => Some(PaymentMethod::Credit),
            "upi" => Some(PaymentMethod::Upi),
            _ => None,
        }
    }

    /// The lowercase method name used in transaction records.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Credit => "credit",
            PaymentMethod::Upi => "upi",
        }
    }
}

/// Label a transaction using the fixed fraud rules.
///
/// The merchant and method are compared case-insensitively. This function
/// never fails.
pub fn classify(transaction: &Transaction) -> FraudLabel {
    let amount = transaction.amount;
    let merchant = transaction.merchant.to_lowercase();
    let method = transaction.method.to_lowercase();

    let over_credit_limit =
        amount > CREDIT_AMOUNT_THRESHOLD && method == PaymentMethod::Credit.as_str();
    let over_amount_limit = amount > AMOUNT_THRESHOLD;
    let flagged_merchant = FLAGGED_MERCHANT_KEYWORDS
        .iter()
        .any(|keyword| merchant.contains(keyword));

    if over_credit_limit || over_amount_limit || flagged_merchant {
        FraudLabel::Fraud
    } else {
        FraudLabel::Legitimate
    }
}
