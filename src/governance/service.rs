use crate::core::types::{Address, Hash, Timestamp};
use crate::crypto::signatures::{SignerRecovery, VoteDomain};
use crate::governance::events::GovernanceEvent;
use crate::governance::power::VotingPowerOracle;
use crate::governance::proposals::{Proposal, ProposalAction, ProposalClass, ProposalStore};
use crate::governance::state::{state_of, ProposalState};
use crate::governance::timelock::{batch_operation_id, Timelock};
use crate::governance::voting::{VoteLedger, VoteRecord, VoteType};
use crate::governance::GovernanceConfig;
use crate::utils::clock::Clock;
use crate::utils::error::{GovernanceError, Result};
use std::sync::{Arc, Mutex, MutexGuard};

/// Predecessor handle passed to the timelock; proposals carry no
/// ordering dependencies between batches.
const NO_PREDECESSOR: Hash = Hash::zero();

struct ServiceInner {
    config: GovernanceConfig,
    store: ProposalStore,
    ledger: VoteLedger,
    oracle: VotingPowerOracle,
    timelock: Box<dyn Timelock>,
    recovery: Box<dyn SignerRecovery>,
    admin: Address,
    events: Vec<GovernanceEvent>,
}

/// Governance façade: propose / vote / queue / execute / cancel.
///
/// All mutable state sits behind a single mutex held for the full
/// duration of each call, external collaborator calls included. That
/// reproduces the serialized execution the lifecycle invariants are
/// proven under: no two governance operations ever interleave.
pub struct GovernanceService {
    inner: Mutex<ServiceInner>,
    clock: Arc<dyn Clock>,
    domain: VoteDomain,
}

impl GovernanceService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: GovernanceConfig,
        domain: VoteDomain,
        admin: Address,
        oracle: VotingPowerOracle,
        timelock: Box<dyn Timelock>,
        recovery: Box<dyn SignerRecovery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Mutex::new(ServiceInner {
                config,
                store: ProposalStore::new(),
                ledger: VoteLedger::new(),
                oracle,
                timelock,
                recovery,
                admin,
                events: Vec::new(),
            }),
            clock,
            domain,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ServiceInner> {
        self.inner.lock().expect("governance state lock poisoned")
    }

    /// Creates a proposal. The proposer's *current* voting power is
    /// checked against the threshold; the mandatory voting delay, not
    /// a snapshot, is what makes this flash-loan resistant.
    pub fn propose(
        &self,
        proposer: &Address,
        class: ProposalClass,
        description: &str,
        actions: Vec<ProposalAction>,
    ) -> Result<u64> {
        let now = self.clock.now_ms();
        let mut inner = self.lock();

        let power = inner.oracle.current_power(proposer);
        if power < inner.config.proposal_threshold {
            return Err(GovernanceError::InsufficientVotingPower {
                have: power,
                need: inner.config.proposal_threshold,
            });
        }

        let description_hash = Hash::new(description.as_bytes());
        let snapshot_checkpoint = inner.oracle.current_checkpoint();
        let snapshot_total_supply = inner.oracle.total_supply();

        let config = inner.config.clone();
        let id = inner.store.create_proposal(
            proposer,
            class,
            description_hash,
            actions,
            snapshot_checkpoint,
            snapshot_total_supply,
            now,
            &config,
        )?;

        let proposal = inner.store.get_proposal(id)?.clone();
        emit(
            &mut inner,
            GovernanceEvent::ProposalCreated {
                id,
                proposer: proposer.clone(),
                class,
                description: description.to_string(),
                description_hash,
                snapshot_checkpoint,
                snapshot_total_supply,
                vote_start: proposal.vote_start,
                vote_end: proposal.vote_end,
            },
        );

        Ok(id)
    }

    /// Casts a vote on behalf of the caller. Returns the weight used.
    pub fn cast_vote(
        &self,
        voter: &Address,
        proposal_id: u64,
        vote_type: VoteType,
    ) -> Result<u128> {
        let now = self.clock.now_ms();
        let mut inner = self.lock();
        cast_vote_inner(&mut inner, voter, proposal_id, vote_type, false, now)
    }

    /// Same effect as [`cast_vote`](Self::cast_vote), but the voter is
    /// recovered from a domain-separated signature over
    /// (proposal id, vote type, nonce), enabling relayed voting. The
    /// supplied nonce must exactly equal the signer's stored nonce and
    /// is consumed exactly once on success.
    pub fn cast_vote_by_sig(
        &self,
        proposal_id: u64,
        vote_type: VoteType,
        nonce: u64,
        signature: &[u8],
    ) -> Result<(Address, u128)> {
        let now = self.clock.now_ms();
        let mut inner = self.lock();

        let digest = self.domain.vote_digest(proposal_id, vote_type, nonce);
        let signer = inner
            .recovery
            .recover(&digest, signature)
            .ok_or(GovernanceError::UnknownSigner)?;

        // Fail fast on a stale or skipped nonce before touching state
        let expected = inner.ledger.nonce_of(&signer);
        if nonce != expected {
            return Err(GovernanceError::InvalidNonce {
                expected,
                got: nonce,
            });
        }

        let weight = cast_vote_inner(&mut inner, &signer, proposal_id, vote_type, true, now)?;
        inner.ledger.consume_nonce(&signer, nonce)?;
        Ok((signer, weight))
    }

    /// Queues a succeeded proposal into the timelock with a delay
    /// chosen by its classification. On delegate failure the queued
    /// flag is rolled back and the proposal stays queueable.
    pub fn queue(&self, proposal_id: u64) -> Result<Hash> {
        let now = self.clock.now_ms();
        let mut inner = self.lock();

        let proposal = inner.store.get_proposal(proposal_id)?.clone();
        let state = state_of(&proposal, &inner.config, now);
        match state {
            ProposalState::Succeeded => {}
            ProposalState::Expired => return Err(GovernanceError::QueueDeadlinePassed(proposal_id)),
            other => {
                return Err(GovernanceError::InvalidState {
                    id: proposal_id,
                    state: other,
                    operation: "queue",
                })
            }
        }
        // Belt-and-suspenders with the state machine's own Expired rule
        if now > proposal.vote_end + inner.config.queue_deadline {
            return Err(GovernanceError::QueueDeadlinePassed(proposal_id));
        }

        let delay = match proposal.class {
            ProposalClass::Routine => inner.config.timelock_delay_routine,
            ProposalClass::Critical => inner.config.timelock_delay_critical,
        };
        let actions = inner.store.get_actions(proposal_id)?.to_vec();

        // Tentatively flag, call out, roll back on failure
        inner.store.get_proposal_mut(proposal_id)?.queued = true;
        let scheduled =
            inner
                .timelock
                .schedule_batch(&actions, NO_PREDECESSOR, proposal.description_hash, delay);
        let operation_id = match scheduled {
            Ok(id) => id,
            Err(e) => {
                inner.store.get_proposal_mut(proposal_id)?.queued = false;
                return Err(e);
            }
        };

        emit(
            &mut inner,
            GovernanceEvent::ProposalQueued {
                id: proposal_id,
                operation_id,
                delay,
                eta: now + delay,
            },
        );
        Ok(operation_id)
    }

    /// Executes a queued proposal through the timelock. The executed
    /// flag is set before the delegate call so a reentering call sees
    /// it already executed, and rolled back if the call fails so the
    /// proposal stays retry-able.
    pub fn execute(&self, proposal_id: u64) -> Result<()> {
        let now = self.clock.now_ms();
        let mut inner = self.lock();

        let proposal = inner.store.get_proposal(proposal_id)?.clone();
        let state = state_of(&proposal, &inner.config, now);
        if state != ProposalState::Queued {
            return Err(GovernanceError::InvalidState {
                id: proposal_id,
                state,
                operation: "execute",
            });
        }

        let actions = inner.store.get_actions(proposal_id)?.to_vec();

        inner.store.get_proposal_mut(proposal_id)?.executed = true;
        if let Err(e) =
            inner
                .timelock
                .execute_batch(&actions, NO_PREDECESSOR, proposal.description_hash)
        {
            inner.store.get_proposal_mut(proposal_id)?.executed = false;
            return Err(e);
        }

        let operation_id =
            batch_operation_id(&actions, NO_PREDECESSOR, proposal.description_hash);
        emit(
            &mut inner,
            GovernanceEvent::ProposalExecuted {
                id: proposal_id,
                operation_id,
            },
        );
        Ok(())
    }

    /// Cancels a proposal. Only the original proposer or the
    /// governance admin may cancel, any time before execution. The
    /// local cancelled flag is authoritative: a failing downstream
    /// timelock cancel is logged and ignored.
    pub fn cancel(&self, caller: &Address, proposal_id: u64) -> Result<()> {
        let mut inner = self.lock();

        let proposal = inner.store.get_proposal(proposal_id)?.clone();
        if caller != &proposal.proposer && caller != &inner.admin {
            return Err(GovernanceError::Unauthorized);
        }
        if proposal.executed {
            return Err(GovernanceError::InvalidState {
                id: proposal_id,
                state: ProposalState::Executed,
                operation: "cancel",
            });
        }
        if proposal.cancelled {
            return Err(GovernanceError::InvalidState {
                id: proposal_id,
                state: ProposalState::Cancelled,
                operation: "cancel",
            });
        }

        inner.store.get_proposal_mut(proposal_id)?.cancelled = true;

        let mut timelock_cancelled = true;
        if proposal.queued {
            let actions = inner.store.get_actions(proposal_id)?.to_vec();
            let operation_id =
                batch_operation_id(&actions, NO_PREDECESSOR, proposal.description_hash);
            if let Err(e) = inner.timelock.cancel(operation_id) {
                log::warn!(
                    "Best-effort timelock cancel failed for proposal {}: {}",
                    proposal_id,
                    e
                );
                timelock_cancelled = false;
            }
        }

        emit(
            &mut inner,
            GovernanceEvent::ProposalCancelled {
                id: proposal_id,
                cancelled_by: caller.clone(),
                timelock_cancelled,
            },
        );
        Ok(())
    }

    // ---- read queries ----

    pub fn proposal(&self, proposal_id: u64) -> Result<Proposal> {
        Ok(self.lock().store.get_proposal(proposal_id)?.clone())
    }

    pub fn proposal_state(&self, proposal_id: u64) -> Result<ProposalState> {
        let now = self.clock.now_ms();
        let inner = self.lock();
        let proposal = inner.store.get_proposal(proposal_id)?;
        Ok(state_of(proposal, &inner.config, now))
    }

    pub fn proposal_count(&self) -> u64 {
        self.lock().store.proposal_count()
    }

    pub fn proposals_by(&self, proposer: &Address) -> Vec<Proposal> {
        self.lock()
            .store
            .get_proposals_by_proposer(proposer)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn all_proposals(&self) -> Vec<Proposal> {
        self.lock()
            .store
            .get_all_proposals()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Proposals currently inside their voting window
    pub fn active_proposals(&self) -> Vec<Proposal> {
        let now = self.clock.now_ms();
        let inner = self.lock();
        inner
            .store
            .get_all_proposals()
            .into_iter()
            .filter(|p| state_of(p, &inner.config, now) == ProposalState::Active)
            .cloned()
            .collect()
    }

    pub fn vote_record(&self, proposal_id: u64, voter: &Address) -> Option<VoteRecord> {
        self.lock().ledger.get_vote(proposal_id, voter).cloned()
    }

    pub fn nonce_of(&self, voter: &Address) -> u64 {
        self.lock().ledger.nonce_of(voter)
    }

    pub fn domain(&self) -> &VoteDomain {
        &self.domain
    }

    /// Drains the event journal, oldest first
    pub fn drain_events(&self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.lock().events)
    }
}

/// Shared vote path for direct and signature-based voting. Weight for
/// the delegated component is read at the proposal's snapshot
/// checkpoint, never at the current time.
fn cast_vote_inner(
    inner: &mut ServiceInner,
    voter: &Address,
    proposal_id: u64,
    vote_type: VoteType,
    by_signature: bool,
    now: Timestamp,
) -> Result<u128> {
    let proposal = inner.store.get_proposal(proposal_id)?.clone();
    let state = state_of(&proposal, &inner.config, now);
    if state != ProposalState::Active {
        return Err(GovernanceError::InvalidState {
            id: proposal_id,
            state,
            operation: "vote",
        });
    }

    if inner.ledger.has_voted(proposal_id, voter) {
        return Err(GovernanceError::AlreadyVoted {
            proposal_id,
            voter: voter.clone(),
        });
    }

    let weight = inner.oracle.power_at(voter, proposal.snapshot_checkpoint);
    if weight == 0 {
        return Err(GovernanceError::ZeroVotingPower);
    }

    inner
        .ledger
        .record_vote(proposal_id, voter, vote_type, weight, now)?;

    let record = inner.store.get_proposal_mut(proposal_id)?;
    match vote_type {
        VoteType::Against => record.against_votes += weight,
        VoteType::For => record.for_votes += weight,
        VoteType::Abstain => record.abstain_votes += weight,
    }

    emit(
        inner,
        GovernanceEvent::VoteCast {
            proposal_id,
            voter: voter.clone(),
            vote_type,
            weight,
            by_signature,
        },
    );
    Ok(weight)
}

fn emit(inner: &mut ServiceInner, event: GovernanceEvent) {
    match serde_json::to_string(&event) {
        Ok(json) => log::info!("governance event: {}", json),
        Err(e) => log::warn!("Failed to serialize governance event: {}", e),
    }
    inner.events.push(event);
}
