use crate::{
    config::ApiConfig,
    error::{ApiError, Result},
    models::payment::{CreateOrderResponse, PaymentStatusResponse},
};
use async_trait::async_trait;
use std::time::Duration;

/// Backend payment endpoints consumed by the checkout and reconciliation flows.
#[async_trait]
pub trait PaymentApi: Send + Sync {
    /// Create a checkout session for a course.
    async fn create_order(&self, course_id: &str) -> Result<CreateOrderResponse>;

    /// Query the webhook-recorded status of an order.
    async fn order_status(&self, order_id: &str) -> Result<PaymentStatusResponse>;
}

pub struct HttpPaymentApi {
    config: ApiConfig,
    http_client: reqwest::Client,
    request_timeout: Duration,
}

impl HttpPaymentApi {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            config: config.clone(),
            http_client: reqwest::Client::new(),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        }
    }
}

#[async_trait]
impl PaymentApi for HttpPaymentApi {
    async fn create_order(&self, course_id: &str) -> Result<CreateOrderResponse> {
        let url = format!(
            "{}/{}",
            self.config.create_order_url.trim_end_matches('/'),
            course_id
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.auth_token)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ApiError::CheckoutFailed(format!("Failed to create order: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::CheckoutFailed(format!(
                "Order creation returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::CheckoutFailed(format!("Invalid order response: {}", e)))
    }

    async fn order_status(&self, order_id: &str) -> Result<PaymentStatusResponse> {
        let url = format!(
            "{}/{}",
            self.config.payment_status_url.trim_end_matches('/'),
            order_id
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.config.auth_token)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ApiError::PaymentGateway(format!("Status check failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::PaymentGateway(format!(
                "Status endpoint returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::PaymentGateway(format!("Invalid status response: {}", e)))
    }
}
