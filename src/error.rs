#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Checkout failed: {0}")]
    CheckoutFailed(String),

    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

// Helper type for results
pub type Result<T> = std::result::Result<T, ApiError>;
