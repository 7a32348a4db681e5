// Service modules
pub mod checkout_service;
pub mod payment_api;
pub mod reconcile_service;
pub mod session;

pub use checkout_service::{CheckoutOutcome, CheckoutService, VerifyOutcome};
pub use payment_api::{HttpPaymentApi, PaymentApi};
pub use reconcile_service::{PendingPaymentReconciler, ReconcileOutcome};
pub use session::{ReconcileSession, SessionState};
