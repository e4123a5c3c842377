use crate::core::types::{Address, Checkpoint, Hash, Timestamp};
use crate::governance::GovernanceConfig;
use crate::utils::error::{GovernanceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One target operation a proposal executes if it passes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalAction {
    pub target: Address,
    pub value: u128,
    pub payload: Vec<u8>,
}

/// Proposal classification, determines the timelock delay applied at queue time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalClass {
    Routine,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub proposer: Address,
    pub class: ProposalClass,
    /// Commitment to the human-readable description; also used as the
    /// timelock batch salt
    pub description_hash: Hash,
    /// Checkpoint used for delegated-weight lookups while voting
    pub snapshot_checkpoint: Checkpoint,
    /// Total supply captured at creation; quorum denominator for the
    /// whole proposal lifetime, immune to later supply changes
    pub snapshot_total_supply: u128,
    pub vote_start: Timestamp,
    pub vote_end: Timestamp,
    pub for_votes: u128,
    pub against_votes: u128,
    pub abstain_votes: u128,
    pub executed: bool,
    pub cancelled: bool,
    pub queued: bool,
}

/// Owns proposal records and their action batches. Records are never
/// deleted and ids are never reused.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProposalStore {
    proposals: HashMap<u64, Proposal>,
    actions: HashMap<u64, Vec<ProposalAction>>,
    next_proposal_id: u64,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self {
            proposals: HashMap::new(),
            actions: HashMap::new(),
            next_proposal_id: 1,
        }
    }

    /// Creates a proposal record together with its immutable action
    /// batch. Tallies start at zero and all lifecycle flags false.
    #[allow(clippy::too_many_arguments)]
    pub fn create_proposal(
        &mut self,
        proposer: &Address,
        class: ProposalClass,
        description_hash: Hash,
        actions: Vec<ProposalAction>,
        snapshot_checkpoint: Checkpoint,
        snapshot_total_supply: u128,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> Result<u64> {
        if actions.is_empty() {
            return Err(GovernanceError::EmptyActions);
        }
        if actions.len() > config.max_actions {
            return Err(GovernanceError::TooManyActions {
                count: actions.len(),
                max: config.max_actions,
            });
        }

        let id = self.next_proposal_id;
        let vote_start = now + config.voting_delay;
        let vote_end = vote_start + config.voting_period;

        let proposal = Proposal {
            id,
            proposer: proposer.clone(),
            class,
            description_hash,
            snapshot_checkpoint,
            snapshot_total_supply,
            vote_start,
            vote_end,
            for_votes: 0,
            against_votes: 0,
            abstain_votes: 0,
            executed: false,
            cancelled: false,
            queued: false,
        };

        self.proposals.insert(id, proposal);
        self.actions.insert(id, actions);
        self.next_proposal_id += 1;

        Ok(id)
    }

    pub fn get_proposal(&self, id: u64) -> Result<&Proposal> {
        self.proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    pub fn get_proposal_mut(&mut self, id: u64) -> Result<&mut Proposal> {
        self.proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    pub fn get_actions(&self, id: u64) -> Result<&[ProposalAction]> {
        self.actions
            .get(&id)
            .map(|a| a.as_slice())
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    pub fn proposal_count(&self) -> u64 {
        self.next_proposal_id - 1
    }

    pub fn get_all_proposals(&self) -> Vec<&Proposal> {
        self.proposals.values().collect()
    }

    pub fn get_proposals_by_proposer(&self, proposer: &Address) -> Vec<&Proposal> {
        self.proposals
            .values()
            .filter(|p| &p.proposer == proposer)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes(&[n; 20])
    }

    fn one_action() -> Vec<ProposalAction> {
        vec![ProposalAction {
            target: addr(9),
            value: 0,
            payload: vec![0xde, 0xad],
        }]
    }

    #[test]
    fn test_sequential_ids_never_reused() {
        let config = GovernanceConfig::default();
        let mut store = ProposalStore::new();

        let a = store
            .create_proposal(
                &addr(1),
                ProposalClass::Routine,
                Hash::new(b"a"),
                one_action(),
                100,
                1_000_000,
                0,
                &config,
            )
            .unwrap();
        let b = store
            .create_proposal(
                &addr(1),
                ProposalClass::Routine,
                Hash::new(b"b"),
                one_action(),
                101,
                1_000_000,
                0,
                &config,
            )
            .unwrap();

        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(store.proposal_count(), 2);
    }

    #[test]
    fn test_vote_window_derived_from_config() {
        let config = GovernanceConfig::default();
        let mut store = ProposalStore::new();

        let id = store
            .create_proposal(
                &addr(1),
                ProposalClass::Critical,
                Hash::new(b"x"),
                one_action(),
                100,
                1_000_000,
                5_000,
                &config,
            )
            .unwrap();

        let p = store.get_proposal(id).unwrap();
        assert_eq!(p.vote_start, 5_000 + config.voting_delay);
        assert_eq!(p.vote_end, p.vote_start + config.voting_period);
        assert_eq!(p.for_votes, 0);
        assert!(!p.executed && !p.cancelled && !p.queued);
    }

    #[test]
    fn test_rejects_empty_and_oversized_action_batches() {
        let config = GovernanceConfig::default();
        let mut store = ProposalStore::new();

        let err = store
            .create_proposal(
                &addr(1),
                ProposalClass::Routine,
                Hash::new(b"x"),
                vec![],
                100,
                1_000_000,
                0,
                &config,
            )
            .unwrap_err();
        assert!(matches!(err, GovernanceError::EmptyActions));

        let too_many = vec![
            ProposalAction {
                target: addr(9),
                value: 0,
                payload: vec![],
            };
            config.max_actions + 1
        ];
        let err = store
            .create_proposal(
                &addr(1),
                ProposalClass::Routine,
                Hash::new(b"x"),
                too_many,
                100,
                1_000_000,
                0,
                &config,
            )
            .unwrap_err();
        assert!(matches!(err, GovernanceError::TooManyActions { .. }));

        // Nothing was created
        assert_eq!(store.proposal_count(), 0);
    }

    #[test]
    fn test_unknown_proposal_lookup_fails() {
        let store = ProposalStore::new();
        assert!(matches!(
            store.get_proposal(42),
            Err(GovernanceError::ProposalNotFound(42))
        ));
    }
}
