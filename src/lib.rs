//! CBC padding oracle attack.
//!
//! Recovers the plaintext of a CBC ciphertext from an oracle that only tells
//! whether a submitted ciphertext decrypts to validly padded plaintext. The
//! key is never learned.
//!
//! ```no_run
//! use vaudenay::{HttpOracle, DEFAULT_ORACLE_URL};
//!
//! let oracle = HttpOracle::new(DEFAULT_ORACLE_URL)?;
//! let ciphertext = hex::decode("00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff")?;
//! let _plaintext = vaudenay::crack(&oracle, &ciphertext)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![warn(missing_docs)]

mod block;
mod codec;
mod error;
mod message;
mod oracle;

#[cfg(test)]
mod testing;

pub use block::BlockCracker;
pub use codec::{split, strip_padding, xor_blocks, Block, BLOCK_SIZE};
pub use error::VaudenayError;
pub use message::MessageCracker;
pub use oracle::{HttpOracle, Oracle, PaddingVerdict, DEFAULT_ORACLE_URL};

/// Recover the plaintext of `ciphertext`, IV first, through `oracle`.
pub fn crack<O: Oracle + ?Sized>(oracle: &O, ciphertext: &[u8]) -> Result<Vec<u8>, VaudenayError> {
    MessageCracker::new(oracle).crack(ciphertext)
}
