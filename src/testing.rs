//! In-process padding oracles used by the unit tests.
use std::sync::atomic::{AtomicUsize, Ordering};

use aes::cipher::{BlockDecrypt, KeyInit};
use aes::Aes128;
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};

use crate::{xor_blocks, Block, Oracle, PaddingVerdict, VaudenayError, BLOCK_SIZE};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;

pub fn pkcs7_valid(b: &[u8]) -> bool {
    let c = match b.last() {
        Some(&c) => c as usize,
        None => return false,
    };
    if c == 0 || c > BLOCK_SIZE || c > b.len() {
        return false;
    }
    b[b.len() - c..].iter().all(|&x| x as usize == c)
}

pub fn pkcs7_pad(plaintext: &[u8]) -> Vec<u8> {
    let pad = BLOCK_SIZE - plaintext.len() % BLOCK_SIZE;
    let mut padded = plaintext.to_vec();
    padded.extend(vec![pad as u8; pad]);
    padded
}

/// AES-128-CBC oracle with a fixed key, counting the queries it answers.
///
/// Only the last block decides the padding, so only that one is decrypted.
pub struct AesOracle {
    key: [u8; 16],
    cipher: Aes128,
    queries: AtomicUsize,
}

impl AesOracle {
    pub fn new(key: [u8; 16]) -> Self {
        AesOracle {
            key,
            cipher: Aes128::new(&key.into()),
            queries: AtomicUsize::new(0),
        }
    }

    /// Return `iv || AES-128-CBC(plaintext)`.
    pub fn encrypt(&self, iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
        let mut ciphertext = iv.to_vec();
        ciphertext.extend(
            Aes128CbcEnc::new(&self.key.into(), &(*iv).into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        );
        ciphertext
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Oracle for AesOracle {
    fn check(&self, data: &[u8]) -> Result<PaddingVerdict, VaudenayError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if data.len() < 2 * BLOCK_SIZE || data.len() % BLOCK_SIZE != 0 {
            return Ok(PaddingVerdict::Invalid);
        }
        let end = data.len();
        let mut block = aes::Block::clone_from_slice(&data[end - BLOCK_SIZE..]);
        self.cipher.decrypt_block(&mut block);
        let mut last = [0u8; BLOCK_SIZE];
        for (index, byte) in last.iter_mut().enumerate() {
            *byte = block[index] ^ data[end - 2 * BLOCK_SIZE + index];
        }
        Ok(PaddingVerdict::from(pkcs7_valid(&last)))
    }
}

/// Oracle over a toy one-block cipher `E(x) = x ^ key`, chained in CBC.
pub struct XorCipherOracle {
    pub key: Block,
}

impl XorCipherOracle {
    pub fn encrypt(&self, iv: &Block, plaintext: &[u8]) -> Vec<u8> {
        let mut ciphertext = iv.to_vec();
        let mut previous = *iv;
        for chunk in pkcs7_pad(plaintext).chunks(BLOCK_SIZE) {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            previous = xor_blocks(&xor_blocks(&block, &previous), &self.key);
            ciphertext.extend_from_slice(&previous);
        }
        ciphertext
    }
}

impl Oracle for XorCipherOracle {
    fn check(&self, data: &[u8]) -> Result<PaddingVerdict, VaudenayError> {
        let blocks = crate::codec::split(data)?;
        let mut plaintext = Vec::with_capacity(data.len());
        for pair in blocks.windows(2) {
            plaintext.extend_from_slice(&xor_blocks(&xor_blocks(&pair[1], &self.key), &pair[0]));
        }
        Ok(PaddingVerdict::from(pkcs7_valid(&plaintext)))
    }
}

/// Oracle whose block decryption always yields `intermediate`, whatever the
/// target block is.
pub struct FixedIntermediateOracle {
    pub intermediate: Block,
}

impl Oracle for FixedIntermediateOracle {
    fn check(&self, data: &[u8]) -> Result<PaddingVerdict, VaudenayError> {
        let mut prefix = [0u8; BLOCK_SIZE];
        prefix.copy_from_slice(&data[data.len() - 2 * BLOCK_SIZE..data.len() - BLOCK_SIZE]);
        Ok(PaddingVerdict::from(pkcs7_valid(&xor_blocks(
            &prefix,
            &self.intermediate,
        ))))
    }
}
