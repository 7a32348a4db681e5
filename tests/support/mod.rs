#![allow(dead_code)]

use async_trait::async_trait;
use coursepay::config::ReconcileConfig;
use coursepay::error::{ApiError, Result};
use coursepay::models::payment::{
    CreateOrderResponse, OrderInfo, PaymentStatusResponse, PendingPaymentIntent,
};
use coursepay::services::{PaymentApi, PendingPaymentReconciler};
use coursepay::store::PendingPaymentStore;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Scripted status-endpoint behavior for one check.
#[derive(Debug, Clone)]
pub enum ScriptedStatus {
    Active,
    Pending,
    NetworkError,
}

/// Scripted checkout-session creation behavior.
#[derive(Debug, Clone)]
pub enum ScriptedOrder {
    Free { enrollment_id: String },
    Paid { order_id: String, amount: i64 },
    Failure,
}

/// In-memory `PaymentApi` with per-order scripted responses and a call log.
pub struct MockPaymentApi {
    statuses: Mutex<HashMap<String, VecDeque<ScriptedStatus>>>,
    order_response: Mutex<ScriptedOrder>,
    pub status_calls: Mutex<Vec<String>>,
}

impl MockPaymentApi {
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(HashMap::new()),
            order_response: Mutex::new(ScriptedOrder::Failure),
            status_calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue status responses for an order; once the queue is drained further
    /// checks report "pending".
    pub fn script_status(&self, order_id: &str, script: impl IntoIterator<Item = ScriptedStatus>) {
        self.statuses
            .lock()
            .unwrap()
            .entry(order_id.to_string())
            .or_default()
            .extend(script);
    }

    pub fn script_order(&self, response: ScriptedOrder) {
        *self.order_response.lock().unwrap() = response;
    }

    pub fn status_call_log(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentApi for MockPaymentApi {
    async fn create_order(&self, course_id: &str) -> Result<CreateOrderResponse> {
        match self.order_response.lock().unwrap().clone() {
            ScriptedOrder::Free { enrollment_id } => Ok(CreateOrderResponse {
                success: true,
                order: None,
                key: None,
                enrollment_id: Some(enrollment_id),
            }),
            ScriptedOrder::Paid { order_id, amount } => Ok(CreateOrderResponse {
                success: true,
                order: Some(OrderInfo {
                    id: order_id,
                    amount,
                }),
                key: Some("gw_test_key".to_string()),
                enrollment_id: None,
            }),
            ScriptedOrder::Failure => Err(ApiError::CheckoutFailed(format!(
                "Gateway unavailable for course {}",
                course_id
            ))),
        }
    }

    async fn order_status(&self, order_id: &str) -> Result<PaymentStatusResponse> {
        self.status_calls.lock().unwrap().push(order_id.to_string());

        let next = self
            .statuses
            .lock()
            .unwrap()
            .get_mut(order_id)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(ScriptedStatus::Active) => Ok(PaymentStatusResponse {
                success: true,
                status: "active".to_string(),
            }),
            Some(ScriptedStatus::NetworkError) => {
                Err(ApiError::PaymentGateway("connection reset".to_string()))
            }
            Some(ScriptedStatus::Pending) | None => Ok(PaymentStatusResponse {
                success: true,
                status: "pending".to_string(),
            }),
        }
    }
}

/// Store whose every operation fails, for the fail-open paths.
pub struct FailingStore;

#[async_trait]
impl PendingPaymentStore for FailingStore {
    async fn load(&self) -> Result<Vec<PendingPaymentIntent>> {
        Err(std::io::Error::other("disk offline").into())
    }

    async fn save(&self, _intents: &[PendingPaymentIntent]) -> Result<()> {
        Err(std::io::Error::other("disk offline").into())
    }
}

pub fn reconciler_with(
    store: Arc<dyn PendingPaymentStore>,
    api: Arc<MockPaymentApi>,
) -> PendingPaymentReconciler {
    PendingPaymentReconciler::new(store, api, &ReconcileConfig::default())
}

/// An intent with a backdated creation time, for expiry tests.
pub fn intent_aged_hours(order_id: &str, course_id: &str, hours: i64) -> PendingPaymentIntent {
    let mut intent = PendingPaymentIntent::new(order_id, course_id);
    intent.timestamp -= hours * 60 * 60 * 1000;
    intent
}
