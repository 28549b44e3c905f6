use crate::VaudenayError;

/// Size of a CBC block in bytes.
pub const BLOCK_SIZE: usize = 16;

/// One cipher block.
pub type Block = [u8; BLOCK_SIZE];

/// Split `data` into consecutive blocks.
///
/// Fails with `VaudenayError::MalformedInput` unless `data` is a positive
/// multiple of `BLOCK_SIZE`.
pub fn split(data: &[u8]) -> Result<Vec<Block>, VaudenayError> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(VaudenayError::MalformedInput(format!(
            "length {} is not a positive multiple of {}",
            data.len(),
            BLOCK_SIZE
        )));
    }
    let mut blocks = Vec::with_capacity(data.len() / BLOCK_SIZE);
    for chunk in data.chunks_exact(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        blocks.push(block);
    }
    Ok(blocks)
}

/// Remove PKCS#7 padding from `data`.
///
/// Fails with `VaudenayError::InvalidPadding`, holding `data` untouched, when
/// the last byte is not a length in `1..=BLOCK_SIZE` repeated that many times.
pub fn strip_padding(data: &[u8]) -> Result<Vec<u8>, VaudenayError> {
    let n = match data.last() {
        Some(&n) => n as usize,
        None => return Err(VaudenayError::InvalidPadding(Vec::new())),
    };
    if n == 0 || n > BLOCK_SIZE || n > data.len() {
        return Err(VaudenayError::InvalidPadding(data.to_vec()));
    }
    let (content, padding) = data.split_at(data.len() - n);
    if !padding.iter().all(|&b| b as usize == n) {
        return Err(VaudenayError::InvalidPadding(data.to_vec()));
    }
    Ok(content.to_vec())
}

/// `xor_blocks` xor two blocks byte-wise
pub fn xor_blocks(a: &Block, b: &Block) -> Block {
    let mut res = [0u8; BLOCK_SIZE];
    for (index, byte) in res.iter_mut().enumerate() {
        *byte = a[index] ^ b[index];
    }
    res
}
