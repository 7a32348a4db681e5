mod app_state;
mod config;
mod error;
mod models;
mod services;
mod store;

use app_state::AppState;
use config::Config;
use services::{CheckoutOutcome, ReconcileOutcome};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,coursepay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;

    tracing::info!(
        "Loaded configuration - storage: {}",
        config.storage.path.display()
    );

    let state = AppState::new(config);

    let mut args = std::env::args().skip(1);
    let command = args.next();
    let course_id = args.next();

    match (command.as_deref(), course_id) {
        (Some("reconcile"), Some(course_id)) => {
            match state.reconciler.reconcile_for_course(&course_id).await {
                ReconcileOutcome::NothingPending => {
                    tracing::info!("No pending payments for course {}", course_id);
                }
                ReconcileOutcome::Confirmed { order_id, .. } => {
                    tracing::info!(
                        "Enrollment confirmed for course {} (order {})",
                        course_id,
                        order_id
                    );
                }
                ReconcileOutcome::Unresolved { remaining } => {
                    tracing::info!(
                        "{} payment(s) for course {} still pending",
                        remaining,
                        course_id
                    );
                }
            }
        }
        (Some("checkout"), Some(course_id)) => {
            match state.checkout_service.begin_checkout(&course_id).await? {
                CheckoutOutcome::Enrolled { enrollment_id } => {
                    tracing::info!("Enrolled in free course: enrollment={}", enrollment_id);
                }
                CheckoutOutcome::OrderCreated {
                    order_id, amount, ..
                } => {
                    tracing::info!(
                        "Checkout session open: order={}, amount={} (complete payment externally)",
                        order_id,
                        amount
                    );
                }
            }
        }
        _ => {
            eprintln!("Usage: coursepay <reconcile|checkout> <course-id>");
            std::process::exit(2);
        }
    }

    Ok(())
}
