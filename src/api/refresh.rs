//! Single-flight coordination for access-token renewal.
//!
//! Any number of in-flight requests can hit a 401 while the access token is
//! stale. The first one claims the renewal; everyone else parks on the gate
//! and is handed the same outcome when the renewal settles. At most one
//! renewal call is ever in flight.

use std::sync::Mutex;

use tokio::sync::oneshot;

/// Result of a renewal attempt, broadcast to every parked request.
#[derive(Debug, Clone)]
pub(crate) enum RefreshOutcome {
    /// New access token to replay with. The token store already holds the
    /// renewed pair.
    Renewed(String),
    /// No refresh token was stored; the store has been cleared and the
    /// original 401 stands.
    MissingRefreshToken,
    /// The renewal call was rejected or failed in transit; the store has been
    /// cleared. Carries the renewal error detail.
    Failed(String),
}

enum GateState {
    Idle,
    Refreshing {
        waiters: Vec<oneshot::Sender<RefreshOutcome>>,
    },
}

/// What `enter` hands back: either the claim to perform the renewal, or a
/// receiver that resolves when the claimed renewal settles.
pub(crate) enum GateEntry<'a> {
    Leader(RenewalClaim<'a>),
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

/// The Idle/Refreshing state machine plus the queue of parked requests.
/// Owned by the client instance; the mutex is only held for state
/// transitions, never across an await point.
pub(crate) struct RefreshGate {
    state: Mutex<GateState>,
}

impl RefreshGate {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Idle),
        }
    }

    /// Claim the renewal or join the queue. The transition to `Refreshing`
    /// happens inside the lock, before any renewal I/O can start, so a second
    /// renewal can never race in.
    pub(crate) fn enter(&self) -> GateEntry<'_> {
        let mut state = self.state.lock().expect("refresh gate lock poisoned");
        match &mut *state {
            GateState::Idle => {
                *state = GateState::Refreshing {
                    waiters: Vec::new(),
                };
                GateEntry::Leader(RenewalClaim {
                    gate: self,
                    settled: false,
                })
            }
            GateState::Refreshing { waiters } => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                GateEntry::Waiter(rx)
            }
        }
    }

    /// Drain the queue, hand every waiter the outcome, and return to `Idle`.
    fn settle(&self, outcome: &RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock().expect("refresh gate lock poisoned");
            match std::mem::replace(&mut *state, GateState::Idle) {
                GateState::Refreshing { waiters } => waiters,
                GateState::Idle => Vec::new(),
            }
        };
        for tx in waiters {
            // A waiter that gave up (task cancelled) is fine to skip.
            let _ = tx.send(outcome.clone());
        }
    }
}

/// Exclusive claim on the in-flight renewal. Dropping the claim without
/// settling (the leader's task was cancelled mid-renewal) fails the queue
/// instead of leaving it parked forever.
pub(crate) struct RenewalClaim<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl RenewalClaim<'_> {
    pub(crate) fn settle(mut self, outcome: &RefreshOutcome) {
        self.settled = true;
        self.gate.settle(outcome);
    }
}

impl Drop for RenewalClaim<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.gate
                .settle(&RefreshOutcome::Failed("renewal interrupted".to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_leader(entry: GateEntry<'_>) -> RenewalClaim<'_> {
        match entry {
            GateEntry::Leader(claim) => claim,
            GateEntry::Waiter(_) => panic!("expected leader"),
        }
    }

    fn assert_waiter(entry: GateEntry<'_>) -> oneshot::Receiver<RefreshOutcome> {
        match entry {
            GateEntry::Leader(_) => panic!("expected waiter"),
            GateEntry::Waiter(rx) => rx,
        }
    }

    #[tokio::test]
    async fn test_first_entry_leads_rest_wait() {
        let gate = RefreshGate::new();
        let claim = assert_leader(gate.enter());
        let rx1 = assert_waiter(gate.enter());
        let rx2 = assert_waiter(gate.enter());

        claim.settle(&RefreshOutcome::Renewed("fresh".to_string()));

        for rx in [rx1, rx2] {
            match rx.await.unwrap() {
                RefreshOutcome::Renewed(token) => assert_eq!(token, "fresh"),
                other => panic!("unexpected outcome: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_gate_resets_after_settle() {
        let gate = RefreshGate::new();
        let claim = assert_leader(gate.enter());
        claim.settle(&RefreshOutcome::MissingRefreshToken);

        // A fresh failure storm claims a fresh renewal.
        assert_leader(gate.enter());
    }

    #[tokio::test]
    async fn test_dropped_claim_fails_waiters() {
        let gate = RefreshGate::new();
        let claim = assert_leader(gate.enter());
        let rx = assert_waiter(gate.enter());

        drop(claim);

        match rx.await.unwrap() {
            RefreshOutcome::Failed(_) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_leader(gate.enter());
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_poison_settle() {
        let gate = RefreshGate::new();
        let claim = assert_leader(gate.enter());
        let rx_kept = assert_waiter(gate.enter());
        let rx_dropped = assert_waiter(gate.enter());
        drop(rx_dropped);

        claim.settle(&RefreshOutcome::Failed("refresh rejected".to_string()));

        match rx_kept.await.unwrap() {
            RefreshOutcome::Failed(detail) => assert_eq!(detail, "refresh rejected"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
