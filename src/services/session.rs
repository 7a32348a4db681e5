use crate::services::reconcile_service::{PendingPaymentReconciler, ReconcileOutcome};
use tracing::debug;

/// Reconciliation state of one screen instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotChecked,
    Checking,
    Resolved,
}

/// Per-screen guard around the reconciler.
///
/// A screen triggers reconciliation on mount and on app foreground; within one
/// screen lifetime the pass must run at most once automatically so the success
/// notification cannot fire twice. `run` enforces that, and `reopen` re-arms
/// the session for the one explicit re-check after a verification attempt that
/// could not confirm.
pub struct ReconcileSession {
    course_id: String,
    state: SessionState,
}

impl ReconcileSession {
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            state: SessionState::NotChecked,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run one pass unless this session already ran one. Returns `None` when
    /// the session is already checking or resolved.
    pub async fn run(
        &mut self,
        reconciler: &PendingPaymentReconciler,
    ) -> Option<ReconcileOutcome> {
        if self.state != SessionState::NotChecked {
            debug!(
                "Skipping reconciliation for course={}, session already {:?}",
                self.course_id, self.state
            );
            return None;
        }

        self.state = SessionState::Checking;
        let outcome = reconciler.reconcile_for_course(&self.course_id).await;
        self.state = SessionState::Resolved;
        Some(outcome)
    }

    /// Re-arm a resolved session so the caller can trigger one more pass, used
    /// after a post-payment verification attempt that left the intent pending.
    pub fn reopen(&mut self) {
        if self.state == SessionState::Resolved {
            self.state = SessionState::NotChecked;
        }
    }
}
