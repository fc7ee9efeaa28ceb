use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Encodes bytes as standard padded base64 (RFC 4648 §4) on a single line.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Length of [`encode`]'s output for `len` input bytes.
pub const fn encoded_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}
