// src/governance/mod.rs

// Declare submodules
pub mod events;
pub mod power;
pub mod proposals;
pub mod service;
pub mod state;
pub mod timelock;
pub mod voting;

use crate::constants::{thresholds, timing};
use serde::{Deserialize, Serialize};

/// Governance parameters. All windows are wall-clock milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceConfig {
    pub voting_delay: u64,            // ms before voting starts
    pub voting_period: u64,           // ms voting is active
    pub proposal_threshold: u128,     // min current voting power to propose
    pub quorum_numerator: u128,       // quorum fraction numerator
    pub quorum_denominator: u128,     // quorum fraction denominator
    pub queue_deadline: u64,          // ms after vote end to queue a succeeded proposal
    pub timelock_delay_routine: u64,  // timelock delay for routine proposals
    pub timelock_delay_critical: u64, // timelock delay for critical proposals
    pub max_actions: usize,           // max actions per proposal
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            voting_delay: timing::VOTING_DELAY_MS,
            voting_period: timing::VOTING_PERIOD_MS,
            proposal_threshold: thresholds::PROPOSAL_THRESHOLD,
            quorum_numerator: thresholds::QUORUM_NUMERATOR,
            quorum_denominator: thresholds::QUORUM_DENOMINATOR,
            queue_deadline: timing::QUEUE_DEADLINE_MS,
            timelock_delay_routine: timing::TIMELOCK_DELAY_ROUTINE_MS,
            timelock_delay_critical: timing::TIMELOCK_DELAY_CRITICAL_MS,
            max_actions: thresholds::MAX_PROPOSAL_ACTIONS,
        }
    }
}

impl GovernanceConfig {
    /// Minimum participation (for + against + abstain) required for a
    /// proposal with the given snapshotted total supply. The
    /// multiplication is split around the denominator so extreme
    /// supplies cannot overflow; pathological fraction settings
    /// saturate instead of panicking.
    pub fn quorum(&self, snapshot_total_supply: u128) -> u128 {
        let whole = snapshot_total_supply / self.quorum_denominator;
        let rem = snapshot_total_supply % self.quorum_denominator;
        whole
            .saturating_mul(self.quorum_numerator)
            .saturating_add(rem.saturating_mul(self.quorum_numerator) / self.quorum_denominator)
    }
}


// Re-export core types for easier imports from outside the governance module
pub use events::GovernanceEvent;
pub use power::{StakeInfo, StakeLookup, TokenVotes, VotingPowerOracle};
pub use proposals::{Proposal, ProposalAction, ProposalClass, ProposalStore};
pub use service::GovernanceService;
pub use state::{state_of, vote_passed, ProposalState};
pub use timelock::{batch_operation_id, InMemoryTimelock, Timelock};
pub use voting::{VoteLedger, VoteRecord, VoteType};
