//! The four dashboard form actions: create, update, and delete an invoice,
//! each a single linear pass through validate → normalize → persist →
//! invalidate/redirect. (Sign-in lives in [`crate::auth`].)

use crate::db::DbConnection;
use crate::side_effects::ViewNotifier;
use crate::validation::validate_invoice_form;
use chrono::Local;
use serde::Serialize;
use shared::{ActionState, FieldErrors, InvoiceForm};
use tracing::{error, info, warn};

/// Canonical listing view: invalidated after every successful mutation and
/// redirected to after create/update.
pub const INVOICES_PAGE: &str = "/dashboard/invoices";

/// Result of one mutation pass. Every outcome the pipeline can produce is
/// a variant here; nothing is signalled by panicking or by an escaping
/// error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ActionOutcome {
    /// Create/update succeeded: control transferred to `to`. The handler
    /// renders nothing on this path.
    Redirected { to: String },
    /// Delete succeeded: status message for the already-rendered view.
    Completed { message: String },
    /// Validation rejected the form: top-level message plus per-field
    /// errors for the form to highlight.
    Invalid { message: String, errors: FieldErrors },
    /// The store refused the statement: message embedding the driver
    /// detail for diagnostics.
    Failed { message: String },
}

impl ActionOutcome {
    /// The renderable form state for this outcome, or `None` for
    /// [`ActionOutcome::Redirected`]: the caller is navigating away and
    /// nothing gets rendered.
    pub fn into_state(self) -> Option<ActionState> {
        match self {
            ActionOutcome::Redirected { .. } => None,
            ActionOutcome::Completed { message } | ActionOutcome::Failed { message } => {
                Some(ActionState::message(message))
            }
            ActionOutcome::Invalid { message, errors } => Some(ActionState {
                message: Some(message),
                errors,
            }),
        }
    }
}

fn missing_fields(operation: &str, errors: FieldErrors) -> ActionOutcome {
    ActionOutcome::Invalid {
        message: format!("Missing Fields. Failed to {} Invoice.", operation),
        errors,
    }
}

fn database_error(operation: &str, cause: &anyhow::Error) -> ActionOutcome {
    // {:#} renders the whole cause chain on one line
    ActionOutcome::Failed {
        message: format!("Database Error: Failed to {} Invoice. Cause: {:#}", operation, cause),
    }
}

/// Service executing the invoice mutations against the store and emitting
/// view side effects on success.
pub struct InvoiceService<N: ViewNotifier> {
    db: DbConnection,
    notifier: N,
}

impl<N: ViewNotifier> InvoiceService<N> {
    pub fn new(db: DbConnection, notifier: N) -> Self {
        Self { db, notifier }
    }

    /// The notifier this service emits through.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Create an invoice from raw form fields. Stamps today's date; the id
    /// is generated by the store layer.
    pub async fn create_invoice(&self, form: &InvoiceForm) -> ActionOutcome {
        let draft = match validate_invoice_form(form) {
            Ok(draft) => draft,
            Err(errors) => {
                info!("Create invoice rejected by validation");
                return missing_fields("Create", errors.field_errors);
            }
        };

        let date = Local::now().date_naive();

        match self
            .db
            .insert_invoice(&draft.customer_id, draft.amount_cents(), draft.status, date)
            .await
        {
            Ok(id) => {
                info!("Created invoice {} for customer {}", id, draft.customer_id);
                self.notifier.invalidate(INVOICES_PAGE);
                self.notifier.redirect_to(INVOICES_PAGE);
                ActionOutcome::Redirected { to: INVOICES_PAGE.to_string() }
            }
            Err(e) => {
                error!("Failed to insert invoice: {:?}", e);
                database_error("Create", &e)
            }
        }
    }

    /// Update an invoice in place. The same validator as create applies;
    /// the id arrives out-of-band and the stored date is left untouched.
    pub async fn update_invoice(&self, id: &str, form: &InvoiceForm) -> ActionOutcome {
        let draft = match validate_invoice_form(form) {
            Ok(draft) => draft,
            Err(errors) => {
                info!("Update invoice {} rejected by validation", id);
                return missing_fields("Update", errors.field_errors);
            }
        };

        match self
            .db
            .update_invoice(id, &draft.customer_id, draft.amount_cents(), draft.status)
            .await
        {
            Ok(()) => {
                info!("Updated invoice {}", id);
                self.notifier.invalidate(INVOICES_PAGE);
                self.notifier.redirect_to(INVOICES_PAGE);
                ActionOutcome::Redirected { to: INVOICES_PAGE.to_string() }
            }
            Err(e) => {
                error!("Failed to update invoice {}: {:?}", id, e);
                database_error("Update", &e)
            }
        }
    }

    /// Delete an invoice. No validation, no redirect: the listing view is
    /// already on screen and just needs the stale cache dropped plus a
    /// status message.
    pub async fn delete_invoice(&self, id: &str) -> ActionOutcome {
        match self.db.delete_invoice(id).await {
            Ok(found) => {
                if found {
                    info!("Deleted invoice {}", id);
                } else {
                    warn!("Delete invoice {}: no matching row", id);
                }
                self.notifier.invalidate(INVOICES_PAGE);
                ActionOutcome::Completed { message: "Invoice deleted".to_string() }
            }
            Err(e) => {
                error!("Failed to delete invoice {}: {:?}", id, e);
                database_error("Delete", &e)
            }
        }
    }
}
