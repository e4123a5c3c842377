// src/lib.rs

pub mod constants;
pub mod core;
pub mod crypto;
pub mod governance;
pub mod utils;

// Re-export commonly used types
pub use crate::core::types::{Address, Hash, Timestamp};
pub use crate::crypto::signatures::{SignerRecovery, VoteDomain};
pub use crate::governance::{
    GovernanceConfig, GovernanceEvent, GovernanceService, Proposal, ProposalAction, ProposalClass,
    ProposalState, VoteType,
};
pub use crate::utils::error::{GovernanceError, Result};
