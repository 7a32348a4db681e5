use crate::{
    config::ReconcileConfig,
    models::payment::{now_ms, PendingPaymentIntent},
    services::payment_api::PaymentApi,
    store::PendingPaymentStore,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of one reconciliation pass, surfaced to the owning screen.
///
/// `Confirmed` is the one-time enrollment signal: the caller marks the course
/// enrolled and shows the success notification. The reconciler itself only
/// mutates the persisted collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No readable intents matched the course.
    NothingPending,
    /// The backend confirmed one order; its intent has been removed.
    Confirmed { order_id: String, course_id: String },
    /// Matching intents exist but none was confirmed in this pass.
    Unresolved { remaining: usize },
}

/// Tracks payments that were started locally but whose success could not be
/// confirmed synchronously, and reconciles them against the webhook status
/// endpoint.
///
/// All storage errors are fail-open: losing track of a pending payment is
/// recoverable (the user can check their enrollments manually), blocking the
/// checkout flow on storage is not.
pub struct PendingPaymentReconciler {
    store: Arc<dyn PendingPaymentStore>,
    api: Arc<dyn PaymentApi>,
    max_retry_attempts: u32,
    intent_ttl_ms: i64,
}

impl PendingPaymentReconciler {
    pub fn new(
        store: Arc<dyn PendingPaymentStore>,
        api: Arc<dyn PaymentApi>,
        config: &ReconcileConfig,
    ) -> Self {
        Self {
            store,
            api,
            max_retry_attempts: config.max_retry_attempts,
            intent_ttl_ms: config.intent_ttl_hours as i64 * 60 * 60 * 1000,
        }
    }

    /// Insert or replace the intent for `order_id` with a fresh timestamp and a
    /// reset retry count. Called before the external payment UI opens so the
    /// intent survives the app being killed mid-payment.
    #[instrument(skip(self))]
    pub async fn record_intent(&self, order_id: &str, course_id: &str) {
        let mut intents = match self.store.load().await {
            Ok(intents) => intents,
            Err(e) => {
                warn!("Failed to load pending payments, starting fresh: {}", e);
                Vec::new()
            }
        };

        intents.retain(|i| i.order_id != order_id);
        intents.push(PendingPaymentIntent::new(order_id, course_id));
        self.persist(&intents).await;

        info!(
            "Recorded pending payment intent: order={}, course={}",
            order_id, course_id
        );
    }

    /// Delete the intent for `order_id` if present. Idempotent.
    #[instrument(skip(self))]
    pub async fn remove_intent(&self, order_id: &str) {
        let mut intents = match self.store.load().await {
            Ok(intents) => intents,
            Err(e) => {
                warn!("Failed to load pending payments, nothing to remove: {}", e);
                return;
            }
        };

        let before = intents.len();
        intents.retain(|i| i.order_id != order_id);
        if intents.len() != before {
            self.persist(&intents).await;
            info!("Removed pending payment intent: order={}", order_id);
        }
    }

    /// Run one reconciliation pass for a course.
    ///
    /// Expired intents (older than the TTL) are purged first and the purge is
    /// persisted before any status check runs. Remaining intents for the course
    /// are then polled sequentially in insertion order; the first confirmed
    /// order wins and stops the pass (the UI assumes at most one relevant
    /// pending purchase per course). Unconfirmed intents get their retry count
    /// bumped while under the cap; capped intents stay untouched until they
    /// expire.
    ///
    /// Never returns an error: unreadable storage means "nothing pending" and a
    /// failed status check counts as "not confirmed". Safe to call repeatedly.
    #[instrument(skip(self))]
    pub async fn reconcile_for_course(&self, course_id: &str) -> ReconcileOutcome {
        let mut intents = match self.store.load().await {
            Ok(intents) => intents,
            Err(e) => {
                warn!("Failed to load pending payments, skipping pass: {}", e);
                return ReconcileOutcome::NothingPending;
            }
        };

        if intents.is_empty() {
            return ReconcileOutcome::NothingPending;
        }

        let now = now_ms();
        let before = intents.len();
        intents.retain(|i| i.age_ms(now) < self.intent_ttl_ms);
        if intents.len() != before {
            info!("Purged {} expired payment intent(s)", before - intents.len());
        }
        // The purge is persisted even when no matching intents remain to check.
        self.persist(&intents).await;

        let matching: Vec<String> = intents
            .iter()
            .filter(|i| i.course_id == course_id)
            .map(|i| i.order_id.clone())
            .collect();

        if matching.is_empty() {
            return ReconcileOutcome::NothingPending;
        }

        let mut confirmed = None;
        for order_id in matching {
            if self.check_confirmed(&order_id).await {
                intents.retain(|i| i.order_id != order_id);
                info!(
                    "Payment confirmed: order={}, course={}",
                    order_id, course_id
                );
                confirmed = Some(order_id);
                // First confirmation wins; later intents wait for the next pass.
                break;
            }

            let mut bumped = false;
            if let Some(intent) = intents.iter_mut().find(|i| i.order_id == order_id) {
                if intent.retry_count < self.max_retry_attempts {
                    intent.retry_count += 1;
                    bumped = true;
                } else {
                    debug!(
                        "Retry budget exhausted for order={}, leaving stalled until expiry",
                        order_id
                    );
                }
            }
            if bumped {
                self.persist(&intents).await;
            }
        }

        self.persist(&intents).await;

        match confirmed {
            Some(order_id) => ReconcileOutcome::Confirmed {
                order_id,
                course_id: course_id.to_string(),
            },
            None => ReconcileOutcome::Unresolved {
                remaining: intents.iter().filter(|i| i.course_id == course_id).count(),
            },
        }
    }

    /// A transport error or non-active status both count as "not confirmed".
    async fn check_confirmed(&self, order_id: &str) -> bool {
        match self.api.order_status(order_id).await {
            Ok(status) => status.is_confirmed(),
            Err(e) => {
                warn!(
                    "Status check failed for order={}, treating as not confirmed: {}",
                    order_id, e
                );
                false
            }
        }
    }

    async fn persist(&self, intents: &[PendingPaymentIntent]) {
        if let Err(e) = self.store.save(intents).await {
            warn!("Failed to persist pending payments: {}", e);
        }
    }
}
