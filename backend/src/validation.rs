//! Schema validation for the invoice form.
//!
//! The validator never raises: it either produces a normalized
//! [`InvoiceDraft`] or a per-field error report, and it reports every
//! failing field in one pass so the form can highlight all of them.

use shared::{FieldErrors, InvoiceForm, InvoiceStatus};

/// Message for a missing customer selection
pub const CUSTOMER_ERROR: &str = "Please select a customer.";
/// Message for a missing, non-numeric, or non-positive amount
pub const AMOUNT_ERROR: &str = "Please enter an amount greater than $0.";
/// Message for a status outside the pending/paid enum
pub const STATUS_ERROR: &str = "Please select an invoice status.";

const CENTS_PER_DOLLAR: f64 = 100.0;

/// Normalized invoice fields produced by a successful validation.
///
/// The id and date are deliberately absent: the id is generated (create)
/// or supplied out-of-band (update), and the date is stamped at creation
/// time and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub customer_id: String,
    /// Dollar amount, strictly positive
    pub amount: f64,
    pub status: InvoiceStatus,
}

impl InvoiceDraft {
    /// Amount as integer cents for storage. Exact for every amount with at
    /// most two decimal places in currency range.
    pub fn amount_cents(&self) -> i64 {
        (self.amount * CENTS_PER_DOLLAR).round() as i64
    }
}

/// Per-field validation report, keyed by wire field name with messages in
/// the order they were produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub field_errors: FieldErrors,
}

impl ValidationErrors {
    fn push(&mut self, field: &str, message: &str) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }
}

/// Validate and coerce the raw invoice form.
///
/// Blank strings count as missing: an empty `<select>` submits an empty
/// value, not an absent field.
pub fn validate_invoice_form(form: &InvoiceForm) -> Result<InvoiceDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let customer_id = match form.customer_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Some(id.to_string()),
        _ => {
            errors.push("customerId", CUSTOMER_ERROR);
            None
        }
    };

    let amount = match form
        .amount
        .as_deref()
        .map(str::trim)
        .and_then(|raw| raw.parse::<f64>().ok())
    {
        Some(value) if value.is_finite() && value > 0.0 => Some(value),
        _ => {
            errors.push("amount", AMOUNT_ERROR);
            None
        }
    };

    let status = match form.status.as_deref().and_then(InvoiceStatus::parse) {
        Some(status) => Some(status),
        None => {
            errors.push("status", STATUS_ERROR);
            None
        }
    };

    match (customer_id, amount, status) {
        (Some(customer_id), Some(amount), Some(status)) => Ok(InvoiceDraft {
            customer_id,
            amount,
            status,
        }),
        _ => Err(errors),
    }
}
