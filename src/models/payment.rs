use serde::{Deserialize, Serialize};

/// A locally recorded payment that was initiated but not yet confirmed by the
/// backend. Persisted as a JSON array keyed by `orderId`; field names are fixed
/// by the existing storage layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPaymentIntent {
    pub order_id: String,
    pub course_id: String,
    /// Creation time in milliseconds since epoch. Set once, never mutated.
    pub timestamp: i64,
    #[serde(default)]
    pub retry_count: u32,
}

impl PendingPaymentIntent {
    pub fn new(order_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            course_id: course_id.into(),
            timestamp: now_ms(),
            retry_count: 0,
        }
    }

    /// Age in milliseconds relative to `now_ms`.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.timestamp
    }
}

/// Current time in milliseconds since epoch, matching the persisted layout.
pub fn now_ms() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Response of the payment status endpoint (GET .../{order_id}).
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentStatusResponse {
    pub success: bool,
    pub status: String,
}

impl PaymentStatusResponse {
    /// The webhook records an order as paid with status "active"; everything
    /// else (including success=false) counts as not confirmed.
    pub fn is_confirmed(&self) -> bool {
        self.success && self.status == "active"
    }
}

/// Response of the checkout-session creation endpoint (POST .../{course_id}).
///
/// `enrollment_id` present means a free course was enrolled immediately;
/// `order` present means a paid flow where the external payment UI opens next.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(default)]
    pub order: Option<OrderInfo>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub enrollment_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderInfo {
    pub id: String,
    pub amount: i64,
}
