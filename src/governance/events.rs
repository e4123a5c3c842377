use crate::core::types::{Address, Checkpoint, Hash, Timestamp};
use crate::governance::proposals::ProposalClass;
use crate::governance::voting::VoteType;
use serde::{Deserialize, Serialize};

/// Observable record of one state transition. Each variant carries
/// enough data for an external indexer to reconstruct full history
/// without re-reading the stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum GovernanceEvent {
    ProposalCreated {
        id: u64,
        proposer: Address,
        class: ProposalClass,
        description: String,
        description_hash: Hash,
        snapshot_checkpoint: Checkpoint,
        snapshot_total_supply: u128,
        vote_start: Timestamp,
        vote_end: Timestamp,
    },
    VoteCast {
        proposal_id: u64,
        voter: Address,
        vote_type: VoteType,
        weight: u128,
        /// Set when the vote arrived through the signature path
        by_signature: bool,
    },
    ProposalQueued {
        id: u64,
        operation_id: Hash,
        delay: u64,
        eta: Timestamp,
    },
    ProposalExecuted {
        id: u64,
        operation_id: Hash,
    },
    ProposalCancelled {
        id: u64,
        cancelled_by: Address,
        /// False when the best-effort downstream cancel failed;
        /// the local cancellation is authoritative either way
        timelock_cancelled: bool,
    },
}
