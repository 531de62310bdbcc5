//! Server-side form actions for the invoicing dashboard.
//!
//! Every mutation follows the same pipeline: raw form fields are validated
//! into a normalized draft, the draft is persisted through parameterized
//! SQL, and on success the cached listing view is invalidated (with a
//! redirect for create/update). Failures at any stage come back as values,
//! never as panics or escaping errors, so the dashboard can render them
//! in place.

pub mod actions;
pub mod auth;
pub mod db;
pub mod side_effects;
pub mod validation;

pub use actions::{ActionOutcome, InvoiceService, INVOICES_PAGE};
pub use auth::{authenticate, AuthError, AuthErrorKind, CredentialVerifier, VerifierError};
pub use db::DbConnection;
pub use side_effects::{LoggingNotifier, RecordingNotifier, ViewNotifier, ViewSignal};
