use super::StreamError;

/// Folds the bytes of an encoded name into an 8-bit generator seed by XOR.
/// Returns `None` for empty input.
pub fn seed_from_bytes(bytes: &[u8]) -> Option<u8> {
    if bytes.is_empty() {
        return None;
    }
    Some(bytes.iter().fold(0, |acc, b| acc ^ b))
}

/// Gamma cipher modulo 2: `out[i] = data[i] ^ keystream[i mod len]`.
///
/// A keystream shorter than the data is reused cyclically from its start.
/// The operation is its own inverse, so it both encrypts and decrypts.
pub fn apply(data: &[u8], keystream: &[u8]) -> Result<Vec<u8>, StreamError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    if keystream.is_empty() {
        return Err(StreamError::EmptyKeystream);
    }
    Ok(data
        .iter()
        .zip(keystream.iter().cycle())
        .map(|(d, k)| d ^ k)
        .collect())
}
