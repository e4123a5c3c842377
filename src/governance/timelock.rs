use crate::core::types::{Hash, Timestamp};
use crate::governance::proposals::ProposalAction;
use crate::utils::clock::Clock;
use crate::utils::error::{GovernanceError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Delay-enforcing scheduler for approved action batches.
///
/// The operation id is deterministically derivable from the batch
/// contents (see [`batch_operation_id`]), so callers can recompute it
/// for cancellation without persisting it.
pub trait Timelock: Send {
    /// Announces a batch; it becomes executable after `delay` ms.
    /// Returns the operation id.
    fn schedule_batch(
        &mut self,
        actions: &[ProposalAction],
        predecessor: Hash,
        salt: Hash,
        delay: u64,
    ) -> Result<Hash>;

    /// Executes a previously announced batch once its delay elapsed
    fn execute_batch(
        &mut self,
        actions: &[ProposalAction],
        predecessor: Hash,
        salt: Hash,
    ) -> Result<()>;

    /// Cancels a pending operation
    fn cancel(&mut self, operation_id: Hash) -> Result<()>;
}

/// Deterministic operation id over (actions, predecessor, salt).
/// Each action is length-prefixed so batch boundaries are unambiguous.
pub fn batch_operation_id(actions: &[ProposalAction], predecessor: Hash, salt: Hash) -> Hash {
    let mut data = Vec::new();
    data.extend_from_slice(&(actions.len() as u32).to_be_bytes());
    for action in actions {
        let target = action.target.as_str().as_bytes();
        data.extend_from_slice(&(target.len() as u32).to_be_bytes());
        data.extend_from_slice(target);
        data.extend_from_slice(&action.value.to_be_bytes());
        data.extend_from_slice(&(action.payload.len() as u32).to_be_bytes());
        data.extend_from_slice(&action.payload);
    }
    data.extend_from_slice(predecessor.as_bytes());
    data.extend_from_slice(salt.as_bytes());
    Hash::new(&data)
}

#[derive(Debug, Clone)]
struct PendingOperation {
    ready_at: Timestamp,
    done: bool,
}

/// Reference scheduler keeping announced batches in memory. Embedders
/// bridging to an external scheduler implement [`Timelock`] instead.
pub struct InMemoryTimelock {
    clock: Arc<dyn Clock>,
    operations: HashMap<Hash, PendingOperation>,
}

impl InMemoryTimelock {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            operations: HashMap::new(),
        }
    }

    pub fn is_pending(&self, operation_id: Hash) -> bool {
        self.operations
            .get(&operation_id)
            .map(|op| !op.done)
            .unwrap_or(false)
    }

    pub fn is_ready(&self, operation_id: Hash) -> bool {
        self.operations
            .get(&operation_id)
            .map(|op| !op.done && self.clock.now_ms() >= op.ready_at)
            .unwrap_or(false)
    }
}

impl Timelock for InMemoryTimelock {
    fn schedule_batch(
        &mut self,
        actions: &[ProposalAction],
        predecessor: Hash,
        salt: Hash,
        delay: u64,
    ) -> Result<Hash> {
        let id = batch_operation_id(actions, predecessor, salt);
        if self.operations.contains_key(&id) {
            return Err(GovernanceError::Timelock(format!(
                "operation {} already scheduled",
                id
            )));
        }

        let ready_at = self.clock.now_ms() + delay;
        self.operations
            .insert(id, PendingOperation { ready_at, done: false });
        log::debug!("Scheduled timelock operation {} ready at {}", id, ready_at);
        Ok(id)
    }

    fn execute_batch(
        &mut self,
        actions: &[ProposalAction],
        predecessor: Hash,
        salt: Hash,
    ) -> Result<()> {
        let id = batch_operation_id(actions, predecessor, salt);
        let now = self.clock.now_ms();
        let op = self
            .operations
            .get_mut(&id)
            .ok_or_else(|| GovernanceError::Timelock(format!("operation {} not scheduled", id)))?;

        if op.done {
            return Err(GovernanceError::Timelock(format!(
                "operation {} already executed",
                id
            )));
        }
        if now < op.ready_at {
            return Err(GovernanceError::Timelock(format!(
                "operation {} not ready until {}",
                id, op.ready_at
            )));
        }

        op.done = true;
        log::info!("Executed timelock operation {}", id);
        Ok(())
    }

    fn cancel(&mut self, operation_id: Hash) -> Result<()> {
        match self.operations.remove(&operation_id) {
            Some(op) if !op.done => {
                log::info!("Cancelled timelock operation {}", operation_id);
                Ok(())
            }
            Some(op) => {
                // Executed operations cannot be cancelled; restore the entry
                self.operations.insert(operation_id, op);
                Err(GovernanceError::Timelock(format!(
                    "operation {} already executed",
                    operation_id
                )))
            }
            None => Err(GovernanceError::Timelock(format!(
                "operation {} not scheduled",
                operation_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Address;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct TestClock(AtomicU64);

    impl Clock for TestClock {
        fn now_ms(&self) -> Timestamp {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn actions() -> Vec<ProposalAction> {
        vec![ProposalAction {
            target: Address::from_bytes(&[7u8; 20]),
            value: 42,
            payload: vec![1, 2, 3],
        }]
    }

    #[test]
    fn test_operation_id_deterministic() {
        let a = batch_operation_id(&actions(), Hash::zero(), Hash::new(b"salt"));
        let b = batch_operation_id(&actions(), Hash::zero(), Hash::new(b"salt"));
        assert_eq!(a, b);

        // Different salt, different id
        let c = batch_operation_id(&actions(), Hash::zero(), Hash::new(b"other"));
        assert_ne!(a, c);

        // Different payload, different id
        let mut changed = actions();
        changed[0].payload = vec![9];
        let d = batch_operation_id(&changed, Hash::zero(), Hash::new(b"salt"));
        assert_ne!(a, d);
    }

    #[test]
    fn test_delay_enforced() {
        let clock = Arc::new(TestClock(AtomicU64::new(1_000)));
        let mut timelock = InMemoryTimelock::new(clock.clone());

        let id = timelock
            .schedule_batch(&actions(), Hash::zero(), Hash::new(b"salt"), 500)
            .unwrap();
        assert!(timelock.is_pending(id));
        assert!(!timelock.is_ready(id));

        // Too early
        assert!(timelock
            .execute_batch(&actions(), Hash::zero(), Hash::new(b"salt"))
            .is_err());

        clock.0.store(1_500, Ordering::SeqCst);
        assert!(timelock.is_ready(id));
        timelock
            .execute_batch(&actions(), Hash::zero(), Hash::new(b"salt"))
            .unwrap();

        // Re-execution fails
        assert!(timelock
            .execute_batch(&actions(), Hash::zero(), Hash::new(b"salt"))
            .is_err());
    }

    #[test]
    fn test_cancel_pending_operation() {
        let clock = Arc::new(TestClock(AtomicU64::new(0)));
        let mut timelock = InMemoryTimelock::new(clock);

        let id = timelock
            .schedule_batch(&actions(), Hash::zero(), Hash::new(b"salt"), 500)
            .unwrap();
        timelock.cancel(id).unwrap();
        assert!(!timelock.is_pending(id));

        // Cancelling twice fails
        assert!(timelock.cancel(id).is_err());
    }

    #[test]
    fn test_double_schedule_rejected() {
        let clock = Arc::new(TestClock(AtomicU64::new(0)));
        let mut timelock = InMemoryTimelock::new(clock);

        timelock
            .schedule_batch(&actions(), Hash::zero(), Hash::new(b"salt"), 500)
            .unwrap();
        assert!(timelock
            .schedule_batch(&actions(), Hash::zero(), Hash::new(b"salt"), 500)
            .is_err());
    }
}
