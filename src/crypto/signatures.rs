use crate::core::types::{Address, Hash};
use crate::governance::voting::VoteType;
use serde::{Deserialize, Serialize};

/// Version tag baked into every vote digest
const VOTE_DIGEST_TAG: &[u8] = b"OMNIGOV_VOTE_V1";

/// Identifies one governance instance so a signature produced for one
/// deployment can never be replayed against another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteDomain {
    pub name: String,
    pub instance: Address,
}

impl VoteDomain {
    pub fn new(name: impl Into<String>, instance: Address) -> Self {
        Self {
            name: name.into(),
            instance,
        }
    }

    /// Domain separator hash
    pub fn separator(&self) -> Hash {
        let mut data = Vec::new();
        data.extend_from_slice(VOTE_DIGEST_TAG);
        data.extend_from_slice(&(self.name.len() as u32).to_be_bytes());
        data.extend_from_slice(self.name.as_bytes());
        data.extend_from_slice(self.instance.as_str().as_bytes());
        Hash::new(&data)
    }

    /// Digest a voter signs to authorize a relayed vote. Covers the
    /// proposal id, the vote type and the signer's current nonce under
    /// this domain's separator.
    pub fn vote_digest(&self, proposal_id: u64, vote_type: VoteType, nonce: u64) -> Hash {
        let mut data = Vec::new();
        data.extend_from_slice(self.separator().as_bytes());
        data.extend_from_slice(&proposal_id.to_be_bytes());
        data.push(vote_type.as_u8());
        data.extend_from_slice(&nonce.to_be_bytes());
        Hash::new(&data)
    }
}

/// Opaque signature verification capability: recovers the signer
/// identity from a digest and signature, or `None` when the signature
/// does not verify. The concrete scheme lives behind this trait.
pub trait SignerRecovery: Send + Sync {
    fn recover(&self, digest: &Hash, signature: &[u8]) -> Option<Address>;
}
