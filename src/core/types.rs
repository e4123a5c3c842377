use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Hash type used for content commitments and timelock operation ids - 32 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    /// Creates a new SHA-256 hash from data
    pub fn new(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Hash(hasher.finalize().into())
    }

    /// Creates a hash from raw bytes (must be 32 bytes)
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }

    /// Returns the hash as a byte array reference
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Converts hash to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Creates a hash from a hexadecimal string
    pub fn from_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex_str)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }

        let mut array = [0u8; 32];
        array.copy_from_slice(&bytes);
        Ok(Hash(array))
    }

    /// Zero hash (all zeros)
    pub const fn zero() -> Self {
        Hash([0u8; 32])
    }

    /// Check if hash is zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Hash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

/// Address type for participant identities with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Creates a new address with basic validation
    pub fn new(addr: String) -> Result<Self, AddressError> {
        if addr.len() != 42 || !addr.starts_with("0x") {
            return Err(AddressError::InvalidFormat);
        }

        // Basic hex validation
        if hex::decode(&addr[2..]).is_err() {
            return Err(AddressError::InvalidHex);
        }

        Ok(Address(addr))
    }

    /// Creates an address without validation (use carefully)
    pub fn new_unchecked(addr: String) -> Self {
        Address(addr)
    }

    /// Returns address as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the raw bytes of the address (without 0x prefix)
    pub fn to_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.0[2..])
    }

    /// Creates address from bytes (adds 0x prefix)
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hex_str = hex::encode(bytes);
        Address(format!("0x{}", hex_str))
    }

    /// Check if address is zero address
    pub fn is_zero(&self) -> bool {
        self.0 == "0x0000000000000000000000000000000000000000"
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address::new_unchecked(s.to_string())
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Address validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    InvalidFormat,
    InvalidHex,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::InvalidFormat => {
                write!(f, "Address must start with 0x and be 42 characters long")
            }
            AddressError::InvalidHex => {
                write!(f, "Address contains invalid hexadecimal characters")
            }
        }
    }
}

impl std::error::Error for AddressError {}

/// Timestamp in milliseconds since UNIX epoch
pub type Timestamp = u64;

/// Checkpoint reference for historical voting-weight queries
pub type Checkpoint = u64;
