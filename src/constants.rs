//! Governance Constants
//!
//! Default timing windows and thresholds for the proposal lifecycle.
//! `GovernanceConfig::default()` is built from these values.

/// Proposal timing windows, in milliseconds
pub mod timing {
    /// Delay between proposal creation and the start of voting.
    /// The mandatory gap is what makes snapshot voting flash-loan
    /// resistant: weight is read at a checkpoint taken before anyone
    /// could react to the proposal.
    pub const VOTING_DELAY_MS: u64 = 24 * 60 * 60 * 1000; // 1 day

    /// Length of the voting window
    pub const VOTING_PERIOD_MS: u64 = 7 * 24 * 60 * 60 * 1000; // 7 days

    /// Grace window after voting ends during which a succeeded
    /// proposal must be queued; afterwards it is permanently expired
    pub const QUEUE_DEADLINE_MS: u64 = 14 * 24 * 60 * 60 * 1000; // 14 days

    /// Timelock delay for routine proposals
    pub const TIMELOCK_DELAY_ROUTINE_MS: u64 = 48 * 60 * 60 * 1000; // 48 hours

    /// Timelock delay for critical proposals
    pub const TIMELOCK_DELAY_CRITICAL_MS: u64 = 7 * 24 * 60 * 60 * 1000; // 7 days
}

/// Voting thresholds
pub mod thresholds {
    /// Minimum current voting power required to create a proposal
    pub const PROPOSAL_THRESHOLD: u128 = 10_000;

    /// Quorum numerator: participation must reach
    /// QUORUM_NUMERATOR / QUORUM_DENOMINATOR of the total supply
    /// snapshotted at proposal creation
    pub const QUORUM_NUMERATOR: u128 = 4;

    /// Quorum denominator
    pub const QUORUM_DENOMINATOR: u128 = 100;

    /// Maximum number of actions a single proposal may carry
    pub const MAX_PROPOSAL_ACTIONS: usize = 10;
}
