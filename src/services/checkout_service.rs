use crate::{
    error::{ApiError, Result},
    services::{payment_api::PaymentApi, reconcile_service::PendingPaymentReconciler},
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of opening a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Free course, enrolled immediately by the backend; nothing to reconcile.
    Enrolled { enrollment_id: String },
    /// Paid flow; the intent is already recorded and the external payment UI
    /// can open with the returned order details.
    OrderCreated {
        order_id: String,
        amount: i64,
        gateway_key: Option<String>,
    },
}

/// Result of the synchronous post-payment verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Enrolled { order_id: String },
    /// Verification could not confirm the order; the intent stays pending and
    /// the next reconciliation pass picks it up. Shown to the user as
    /// "pending", never as a failure.
    Pending { order_id: String },
}

pub struct CheckoutService {
    api: Arc<dyn PaymentApi>,
    reconciler: Arc<PendingPaymentReconciler>,
}

impl CheckoutService {
    pub fn new(api: Arc<dyn PaymentApi>, reconciler: Arc<PendingPaymentReconciler>) -> Self {
        Self { api, reconciler }
    }

    /// Open a checkout session for a course.
    ///
    /// Order-creation failures propagate to the caller (the one place in this
    /// subsystem where an error reaches the UI). For paid courses the intent is
    /// recorded before returning, so a kill during the external payment UI
    /// still leaves a reconcilable record behind.
    #[instrument(skip(self))]
    pub async fn begin_checkout(&self, course_id: &str) -> Result<CheckoutOutcome> {
        let response = self.api.create_order(course_id).await?;

        if !response.success {
            return Err(ApiError::CheckoutFailed(
                "Order creation rejected by backend".to_string(),
            ));
        }

        if let Some(enrollment_id) = response.enrollment_id {
            info!(
                "Free course enrolled immediately: course={}, enrollment={}",
                course_id, enrollment_id
            );
            return Ok(CheckoutOutcome::Enrolled { enrollment_id });
        }

        let order = response.order.ok_or_else(|| {
            ApiError::CheckoutFailed("Order response missing order details".to_string())
        })?;

        self.reconciler.record_intent(&order.id, course_id).await;

        info!(
            "Checkout session opened: course={}, order={}, amount={}",
            course_id, order.id, order.amount
        );

        Ok(CheckoutOutcome::OrderCreated {
            order_id: order.id,
            amount: order.amount,
            gateway_key: response.key,
        })
    }

    /// Verify an order right after the external payment UI reports success.
    ///
    /// Never a hard failure: if the status endpoint cannot confirm the order
    /// (wrong status, transport error, webhook not yet delivered) the intent is
    /// left in place for reconciliation.
    #[instrument(skip(self))]
    pub async fn confirm_payment(&self, order_id: &str) -> VerifyOutcome {
        match self.api.order_status(order_id).await {
            Ok(status) if status.is_confirmed() => {
                self.reconciler.remove_intent(order_id).await;
                info!("Payment verified: order={}", order_id);
                VerifyOutcome::Enrolled {
                    order_id: order_id.to_string(),
                }
            }
            Ok(status) => {
                info!(
                    "Payment not yet confirmed: order={}, status={}",
                    order_id, status.status
                );
                VerifyOutcome::Pending {
                    order_id: order_id.to_string(),
                }
            }
            Err(e) => {
                warn!(
                    "Verification failed for order={}, leaving intent pending: {}",
                    order_id, e
                );
                VerifyOutcome::Pending {
                    order_id: order_id.to_string(),
                }
            }
        }
    }
}
