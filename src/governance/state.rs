use crate::core::types::Timestamp;
use crate::governance::proposals::Proposal;
use crate::governance::GovernanceConfig;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a proposal.
///
/// Never stored: always derived from the proposal's timestamps, flags
/// and tallies plus the current time, so the stored record cannot
/// drift from the timestamp-derived truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    Pending,
    Active,
    Defeated,
    Succeeded,
    Queued,
    Executed,
    Expired,
    Cancelled,
}

impl ProposalState {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalState::Defeated
                | ProposalState::Executed
                | ProposalState::Expired
                | ProposalState::Cancelled
        )
    }
}

/// Pass condition: strict majority (ties fail) and participation
/// quorum against the total supply snapshotted at creation. Abstain
/// votes count toward quorum but not toward the majority.
pub fn vote_passed(proposal: &Proposal, config: &GovernanceConfig) -> bool {
    let participation = proposal.for_votes + proposal.against_votes + proposal.abstain_votes;
    proposal.for_votes > proposal.against_votes
        && participation >= config.quorum(proposal.snapshot_total_supply)
}

/// Derives the current lifecycle state. Pure function of the stored
/// record and `now`; evaluating it has no side effects.
pub fn state_of(proposal: &Proposal, config: &GovernanceConfig, now: Timestamp) -> ProposalState {
    // Terminal flags take precedence over every time window
    if proposal.cancelled {
        return ProposalState::Cancelled;
    }
    if proposal.executed {
        return ProposalState::Executed;
    }

    if now < proposal.vote_start {
        return ProposalState::Pending;
    }
    // Voting window is inclusive at both ends
    if now <= proposal.vote_end {
        return ProposalState::Active;
    }

    if !vote_passed(proposal, config) {
        return ProposalState::Defeated;
    }

    if proposal.queued {
        return ProposalState::Queued;
    }

    // Succeeded proposals must be queued within the grace window
    if now > proposal.vote_end + config.queue_deadline {
        ProposalState::Expired
    } else {
        ProposalState::Succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Address, Hash};
    use crate::governance::proposals::ProposalClass;

    fn test_config() -> GovernanceConfig {
        GovernanceConfig {
            voting_delay: 100,
            voting_period: 1_000,
            queue_deadline: 500,
            ..GovernanceConfig::default()
        }
    }

    fn test_proposal() -> Proposal {
        Proposal {
            id: 1,
            proposer: Address::from_bytes(&[1u8; 20]),
            class: ProposalClass::Routine,
            description_hash: Hash::new(b"test"),
            snapshot_checkpoint: 100,
            snapshot_total_supply: 10_000,
            vote_start: 1_000,
            vote_end: 2_000,
            for_votes: 0,
            against_votes: 0,
            abstain_votes: 0,
            executed: false,
            cancelled: false,
            queued: false,
        }
    }

    /// Enough participation to meet the default 4% quorum of 10_000
    fn passing_tallies(p: &mut Proposal) {
        p.for_votes = 300;
        p.against_votes = 100;
        p.abstain_votes = 0;
    }

    #[test]
    fn test_pending_before_vote_start() {
        let config = test_config();
        let p = test_proposal();
        assert_eq!(state_of(&p, &config, 999), ProposalState::Pending);
    }

    #[test]
    fn test_active_window_inclusive_both_ends() {
        let config = test_config();
        let p = test_proposal();
        assert_eq!(state_of(&p, &config, 1_000), ProposalState::Active);
        assert_eq!(state_of(&p, &config, 1_500), ProposalState::Active);
        assert_eq!(state_of(&p, &config, 2_000), ProposalState::Active);
        assert_ne!(state_of(&p, &config, 2_001), ProposalState::Active);
    }

    #[test]
    fn test_tie_is_defeated() {
        let config = test_config();
        let mut p = test_proposal();
        p.for_votes = 100;
        p.against_votes = 100;
        assert_eq!(state_of(&p, &config, 2_001), ProposalState::Defeated);

        // One more for-vote with quorum met flips the outcome
        p.for_votes = 101;
        p.abstain_votes = 400; // counts toward quorum only
        assert_eq!(state_of(&p, &config, 2_001), ProposalState::Succeeded);
    }

    #[test]
    fn test_majority_without_quorum_is_defeated() {
        let config = test_config();
        let mut p = test_proposal();
        // 4% of 10_000 = 400 participation required
        p.for_votes = 200;
        p.against_votes = 100;
        assert_eq!(state_of(&p, &config, 2_001), ProposalState::Defeated);
    }

    #[test]
    fn test_succeeded_then_expired_after_queue_deadline() {
        let config = test_config();
        let mut p = test_proposal();
        passing_tallies(&mut p);

        assert_eq!(state_of(&p, &config, 2_001), ProposalState::Succeeded);
        assert_eq!(state_of(&p, &config, 2_500), ProposalState::Succeeded);
        assert_eq!(state_of(&p, &config, 2_501), ProposalState::Expired);
    }

    #[test]
    fn test_queued_flag_overrides_expiry() {
        let config = test_config();
        let mut p = test_proposal();
        passing_tallies(&mut p);
        p.queued = true;
        assert_eq!(state_of(&p, &config, 9_999), ProposalState::Queued);
    }

    #[test]
    fn test_cancelled_checked_before_all_else() {
        let config = test_config();
        let mut p = test_proposal();
        passing_tallies(&mut p);
        p.queued = true;
        p.cancelled = true;
        assert_eq!(state_of(&p, &config, 500), ProposalState::Cancelled);
        assert_eq!(state_of(&p, &config, 9_999), ProposalState::Cancelled);
    }

    #[test]
    fn test_executed_flag_is_terminal() {
        let config = test_config();
        let mut p = test_proposal();
        passing_tallies(&mut p);
        p.queued = true;
        p.executed = true;
        assert_eq!(state_of(&p, &config, 9_999), ProposalState::Executed);
        assert!(ProposalState::Executed.is_terminal());
    }

    #[test]
    fn test_state_is_pure() {
        let config = test_config();
        let mut p = test_proposal();
        passing_tallies(&mut p);
        let snapshot = p.clone();
        for now in [0, 1_000, 2_001, 2_501, u64::MAX] {
            assert_eq!(state_of(&p, &config, now), state_of(&p, &config, now));
        }
        // Evaluation never mutates the record
        assert_eq!(format!("{:?}", p), format!("{:?}", snapshot));
    }
}
