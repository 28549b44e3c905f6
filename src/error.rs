/// Errors which can occur while cracking a ciphertext
#[derive(Debug)]
pub enum VaudenayError {
    /// Occurs when the ciphertext is not a whole number of blocks, holds
    /// fewer than two blocks or cannot be decoded.
    MalformedInput(String),
    /// Occurs when the oracle cannot be reached or answers with something
    /// other than a padding verdict.
    OracleTransport {
        /// What went wrong, as reported by the oracle client.
        reason: String,
        /// Ciphertext block under attack, the IV being block 0.
        block: Option<usize>,
        /// Byte being searched in that block, counted from 0.
        position: Option<usize>,
    },
    /// Occurs when no candidate byte is accepted by the oracle.
    OracleInconsistency {
        /// Ciphertext block under attack, the IV being block 0.
        block: Option<usize>,
        /// Byte that no candidate solved, counted from 0.
        position: usize,
    },
    /// Occurs when the recovered plaintext does not end with valid padding.
    /// Holds the recovered bytes, padding included.
    InvalidPadding(Vec<u8>),
}

impl VaudenayError {
    /// Build a transport error not yet tied to a block or byte.
    pub fn transport(reason: impl Into<String>) -> Self {
        VaudenayError::OracleTransport {
            reason: reason.into(),
            block: None,
            position: None,
        }
    }

    /// True for `VaudenayError::OracleTransport`.
    pub fn is_transport(&self) -> bool {
        matches!(self, VaudenayError::OracleTransport { .. })
    }

    /// Attach the byte position that was being searched.
    pub(crate) fn at_position(self, position: usize) -> Self {
        match self {
            VaudenayError::OracleTransport { reason, block, .. } => {
                VaudenayError::OracleTransport {
                    reason,
                    block,
                    position: Some(position),
                }
            }
            other => other,
        }
    }

    /// Attach the index of the ciphertext block under attack.
    pub(crate) fn in_block(self, block: usize) -> Self {
        match self {
            VaudenayError::OracleTransport {
                reason, position, ..
            } => VaudenayError::OracleTransport {
                reason,
                block: Some(block),
                position,
            },
            VaudenayError::OracleInconsistency { position, .. } => {
                VaudenayError::OracleInconsistency {
                    block: Some(block),
                    position,
                }
            }
            other => other,
        }
    }
}

/// ` [Block b, Byte p]` suffix shared by errors and progress logs. Bytes
/// count from 0.
pub(crate) fn location(block: &Option<usize>, position: &Option<usize>) -> String {
    match (block, position) {
        (Some(b), Some(p)) => format!(" [Block {}, Byte {}]", b, p),
        (Some(b), None) => format!(" [Block {}]", b),
        (None, Some(p)) => format!(" [Byte {}]", p),
        (None, None) => String::new(),
    }
}

impl std::fmt::Display for VaudenayError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            VaudenayError::MalformedInput(ref s) => write!(f, "Malformed ciphertext: {}", s),
            VaudenayError::OracleTransport {
                ref reason,
                ref block,
                ref position,
            } => write!(
                f,
                "Oracle transport error{}: {}",
                location(block, position),
                reason
            ),
            VaudenayError::OracleInconsistency {
                ref block,
                position,
            } => write!(
                f,
                "Oracle accepted none of the 256 candidates{}",
                location(block, &Some(position))
            ),
            VaudenayError::InvalidPadding(ref plaintext) => write!(
                f,
                "Recovered plaintext has invalid padding: {}",
                hex::encode(plaintext)
            ),
        }
    }
}

impl std::error::Error for VaudenayError {}

impl From<hex::FromHexError> for VaudenayError {
    fn from(e: hex::FromHexError) -> Self {
        VaudenayError::MalformedInput(format!("invalid hex: {}", e))
    }
}

impl From<base64::DecodeError> for VaudenayError {
    fn from(e: base64::DecodeError) -> Self {
        VaudenayError::MalformedInput(format!("invalid base64: {}", e))
    }
}
