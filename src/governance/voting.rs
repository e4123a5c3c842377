use crate::core::types::{Address, Timestamp};
use crate::utils::error::{GovernanceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Three-way vote discriminant. Wire values match the on-chain
/// convention: 0 = against, 1 = for, 2 = abstain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteType {
    Against,
    For,
    Abstain,
}

impl VoteType {
    pub fn as_u8(&self) -> u8 {
        match self {
            VoteType::Against => 0,
            VoteType::For => 1,
            VoteType::Abstain => 2,
        }
    }
}

impl TryFrom<u8> for VoteType {
    type Error = GovernanceError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(VoteType::Against),
            1 => Ok(VoteType::For),
            2 => Ok(VoteType::Abstain),
            other => Err(GovernanceError::InvalidVoteType(other)),
        }
    }
}

/// Immutable record of one cast vote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: Address,
    pub vote_type: VoteType,
    pub weight: u128,
    pub timestamp: Timestamp,
}

/// Records one vote per (proposal, voter) and the per-voter signature
/// nonces used for replay protection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VoteLedger {
    records: HashMap<(u64, Address), VoteRecord>,
    nonces: HashMap<Address, u64>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            nonces: HashMap::new(),
        }
    }

    pub fn has_voted(&self, proposal_id: u64, voter: &Address) -> bool {
        self.records.contains_key(&(proposal_id, voter.clone()))
    }

    pub fn get_vote(&self, proposal_id: u64, voter: &Address) -> Option<&VoteRecord> {
        self.records.get(&(proposal_id, voter.clone()))
    }

    /// Records a vote. The no-double-vote check reads the record map,
    /// never the tallies. The record is never mutated afterwards.
    pub fn record_vote(
        &mut self,
        proposal_id: u64,
        voter: &Address,
        vote_type: VoteType,
        weight: u128,
        now: Timestamp,
    ) -> Result<()> {
        let key = (proposal_id, voter.clone());
        if self.records.contains_key(&key) {
            return Err(GovernanceError::AlreadyVoted {
                proposal_id,
                voter: voter.clone(),
            });
        }

        let record = VoteRecord {
            voter: voter.clone(),
            vote_type,
            weight,
            timestamp: now,
        };
        self.records.insert(key, record);
        Ok(())
    }

    /// Current signature nonce for a voter (0 if never used)
    pub fn nonce_of(&self, voter: &Address) -> u64 {
        self.nonces.get(voter).copied().unwrap_or(0)
    }

    /// Atomic check-and-increment: the supplied nonce must exactly
    /// equal the stored one, otherwise nothing changes. Strict
    /// equality prevents both replay and skipping.
    pub fn consume_nonce(&mut self, voter: &Address, nonce: u64) -> Result<()> {
        let current = self.nonce_of(voter);
        if nonce != current {
            return Err(GovernanceError::InvalidNonce {
                expected: current,
                got: nonce,
            });
        }
        self.nonces.insert(voter.clone(), current + 1);
        Ok(())
    }
}
