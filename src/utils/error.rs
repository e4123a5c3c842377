// src/utils/error.rs

use crate::core::types::Address;
use crate::governance::state::ProposalState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GovernanceError {
    #[error("Proposal {0} not found")]
    ProposalNotFound(u64),

    #[error("Insufficient voting power ({have}) to create proposal (threshold: {need})")]
    InsufficientVotingPower { have: u128, need: u128 },

    #[error("Proposal must contain at least one action")]
    EmptyActions,

    #[error("Proposal contains {count} actions, maximum is {max}")]
    TooManyActions { count: usize, max: usize },

    #[error("Proposal {id} is {state:?}, cannot {operation}")]
    InvalidState {
        id: u64,
        state: ProposalState,
        operation: &'static str,
    },

    #[error("Voter {voter} has already voted on proposal {proposal_id}")]
    AlreadyVoted { proposal_id: u64, voter: Address },

    #[error("Voter has no voting power")]
    ZeroVotingPower,

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(u8),

    #[error("Invalid signature nonce (expected {expected}, got {got})")]
    InvalidNonce { expected: u64, got: u64 },

    #[error("Signature does not recover to a known signer")]
    UnknownSigner,

    #[error("Queue deadline passed for proposal {0}")]
    QueueDeadlinePassed(u64),

    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    #[error("Timelock error: {0}")]
    Timelock(String),
}

pub type Result<T> = std::result::Result<T, GovernanceError>;
