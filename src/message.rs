use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{error, info};
use rayon::prelude::*;

use crate::codec::{split, strip_padding, xor_blocks};
use crate::{Block, BlockCracker, Oracle, VaudenayError};

/// `MessageCracker` recovers the whole plaintext of a CBC ciphertext
///
/// The first block of the ciphertext is the IV. Every following block is
/// cracked on its own and XOR-ed with the block before it.
pub struct MessageCracker<'a, O: ?Sized> {
    oracle: &'a O,
}

impl<'a, O: Oracle + ?Sized> MessageCracker<'a, O> {
    /// Return a MessageCracker querying `oracle` for every block.
    pub fn new(oracle: &'a O) -> Self {
        MessageCracker { oracle }
    }

    /// Decrypt the given ciphertext one block after the other
    ///
    /// # Arguments
    ///
    /// * `ciphertext` - IV followed by at least one encrypted block.
    ///
    pub fn crack(&self, ciphertext: &[u8]) -> Result<Vec<u8>, VaudenayError> {
        info!("Starting Decrypt Mode");
        let blocks = self.validate(ciphertext)?;

        let mut decrypted = Vec::with_capacity(ciphertext.len() - blocks[0].len());
        for index in 1..blocks.len() {
            decrypted.extend_from_slice(&self.crack_block(&blocks, index)?);
        }

        finish(decrypted)
    }

    fn validate(&self, ciphertext: &[u8]) -> Result<Vec<Block>, VaudenayError> {
        info!("Attempting to decrypt {}", hex::encode(ciphertext));
        let blocks = split(ciphertext)?;
        if blocks.len() < 2 {
            return Err(VaudenayError::MalformedInput(
                "ciphertext must hold an IV and at least one block".to_owned(),
            ));
        }
        Ok(blocks)
    }

    fn crack_block(&self, blocks: &[Block], index: usize) -> Result<Block, VaudenayError> {
        info!("*** Starting Block {} ***", index);
        let intermediate = BlockCracker::new(self.oracle)
            .crack(&blocks[index])
            .map_err(|e| {
                let e = e.in_block(index);
                error!("{}", e);
                e
            })?;
        let plaintext = xor_blocks(&intermediate, &blocks[index - 1]);

        info!(
            "Block {} Results:
            [+] Cipher Text (HEX): {}
            [+] Intermediate Bytes (HEX): {}
            [+] Plain Text (HEX): {}",
            index,
            hex::encode(blocks[index]),
            hex::encode(intermediate),
            hex::encode(plaintext)
        );
        Ok(plaintext)
    }
}

impl<'a, O: Oracle + Sync + ?Sized> MessageCracker<'a, O> {
    /// Same as `crack` with every block cracked on the rayon pool.
    ///
    /// Blocks only depend on the ciphertext, so each one gets its own forged
    /// prefix. The first failing block, in order, is reported.
    pub fn crack_parallel(&self, ciphertext: &[u8]) -> Result<Vec<u8>, VaudenayError> {
        info!("Starting Parallel Decrypt Mode");
        let blocks = self.validate(ciphertext)?;

        let plaintext_blocks = (1..blocks.len())
            .into_par_iter()
            .map(|index| self.crack_block(&blocks, index))
            .collect::<Vec<_>>();

        let mut decrypted = Vec::with_capacity(ciphertext.len() - blocks[0].len());
        for block in plaintext_blocks {
            decrypted.extend_from_slice(&block?);
        }

        finish(decrypted)
    }
}

fn finish(decrypted: Vec<u8>) -> Result<Vec<u8>, VaudenayError> {
    let plaintext = strip_padding(&decrypted).map_err(|e| {
        error!("{}", e);
        e
    })?;

    info!(
        "*** Finished ***
        [+] Decrypted value (ASCII): {}
        [+] Decrypted value (HEX): {}
        [+] Decrypted value (Base64): {}",
        String::from_utf8_lossy(&plaintext),
        hex::encode(&plaintext),
        STANDARD.encode(&plaintext)
    );

    Ok(plaintext)
}
