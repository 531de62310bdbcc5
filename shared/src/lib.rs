use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Payment status of an invoice. Stored and transmitted as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Invoice issued, payment outstanding
    Pending,
    /// Payment received
    Paid,
}

impl InvoiceStatus {
    /// The storage/wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Parse the storage/wire representation. Anything other than the two
    /// exact lowercase values is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted invoice record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    /// Opaque identifier of the billed customer
    pub customer_id: String,
    /// Amount in integer cents (never fractional dollars)
    pub amount_cents: i64,
    pub status: InvoiceStatus,
    /// Issue date, day precision; immutable after creation
    pub date: NaiveDate,
}

/// Raw invoice form fields as submitted from the dashboard.
///
/// Every field is optional because form inputs can simply be absent from
/// the request; validation turns missing fields into per-field errors
/// rather than deserialization failures. Wire keys are camelCase to match
/// the form input names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceForm {
    pub customer_id: Option<String>,
    /// Dollar amount as typed by the user, e.g. "250.99"
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// Field name mapped to an ordered list of human-readable messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Outcome payload rendered back into an already-displayed form when a
/// mutation does not redirect: an optional top-level message plus any
/// per-field validation errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionState {
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
}

impl ActionState {
    /// State carrying only a top-level message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            errors: FieldErrors::new(),
        }
    }
}

/// Credential form for the sign-in screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}
