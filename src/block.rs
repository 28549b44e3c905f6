use log::debug;

use crate::error::location;
use crate::{Block, Oracle, PaddingVerdict, VaudenayError, BLOCK_SIZE};

/// `BlockCracker` recovers the intermediate bytes of one ciphertext block.
///
/// The intermediate block `D` is the raw block decryption of the target, so
/// that for any prefix `P` the oracle accepts `P || target` iff `P ^ D` is
/// validly padded. XOR-ing `D` with the real preceding ciphertext block
/// yields the plaintext.
pub struct BlockCracker<'a, O: ?Sized> {
    oracle: &'a O,
}

impl<'a, O: Oracle + ?Sized> BlockCracker<'a, O> {
    /// Return a BlockCracker querying `oracle`.
    pub fn new(oracle: &'a O) -> Self {
        BlockCracker { oracle }
    }

    /// Recover the intermediate block of `target`.
    ///
    /// Errors carry the byte position under attack but no block index.
    pub fn crack(&self, target: &Block) -> Result<Block, VaudenayError> {
        let mut forged = [0u8; BLOCK_SIZE];
        let mut intermediate = [0u8; BLOCK_SIZE];

        for pad in 1..=BLOCK_SIZE as u8 {
            let position = BLOCK_SIZE - pad as usize;
            // Solved bytes must decrypt to the padding value of this round.
            for k in position + 1..BLOCK_SIZE {
                forged[k] = intermediate[k] ^ pad;
            }

            let value = self
                .search_byte(&mut forged, target, position, pad)
                .map_err(|e| e.at_position(position))?
                .ok_or(VaudenayError::OracleInconsistency {
                    block: None,
                    position,
                })?;
            intermediate[position] = value ^ pad;
        }

        Ok(intermediate)
    }

    /// Try every value of `forged[position]` until the oracle accepts one.
    fn search_byte(
        &self,
        forged: &mut Block,
        target: &Block,
        position: usize,
        pad: u8,
    ) -> Result<Option<u8>, VaudenayError> {
        for candidate in 0..=255u8 {
            forged[position] = candidate;
            if !self.query(forged, target)?.is_valid() {
                continue;
            }
            if pad == 1 && !self.confirm_last_byte(forged, target)? {
                debug!("[-] Ambiguous padding for candidate {:#04x}, skipping", candidate);
                continue;
            }
            debug!(
                "[+] Success: ({}/256){}",
                candidate as usize + 1,
                location(&None, &Some(position))
            );
            return Ok(Some(candidate));
        }
        Ok(None)
    }

    /// A valid verdict in the first round may come from a longer padding
    /// such as `02 02`. A genuine `01` survives a change to the byte before
    /// it, a longer padding does not.
    fn confirm_last_byte(&self, forged: &mut Block, target: &Block) -> Result<bool, VaudenayError> {
        let neighbour = BLOCK_SIZE - 2;
        forged[neighbour] ^= 1;
        let verdict = self.query(forged, target);
        forged[neighbour] ^= 1;
        Ok(verdict?.is_valid())
    }

    fn query(&self, forged: &Block, target: &Block) -> Result<PaddingVerdict, VaudenayError> {
        let mut test_bytes = Vec::with_capacity(2 * BLOCK_SIZE);
        test_bytes.extend_from_slice(forged);
        test_bytes.extend_from_slice(target);
        self.oracle.check(&test_bytes)
    }
}
