use std::io::Read;

use super::context::{Signature, SigningContext};
use super::key::PrivateKeyHandle;
use crate::error::Result;

/// Identifier of the fixed digest and padding pairing.
pub const ALGORITHM: &str = "rsa-pkcs1v15-sha256";

/// Signs `payload` with `key`. The key is released when this returns.
pub fn sign(key: PrivateKeyHandle, payload: &[u8]) -> Result<Signature> {
    let mut ctx = SigningContext::init(key)?;
    ctx.update(payload)?;
    ctx.finalize()
}

/// Like [`sign`], but streams the payload from `reader` in chunks.
pub fn sign_reader<R: Read>(key: PrivateKeyHandle, reader: R) -> Result<Signature> {
    let mut ctx = SigningContext::init(key)?;
    let read = ctx.update_from_reader(reader)?;
    tracing::debug!(payload_len = read, "payload ingested");
    ctx.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::test_keys;
    use rsa::pkcs1v15::VerifyingKey;
    use rsa::signature::Verifier;
    use sha2::Sha256;

    fn key() -> PrivateKeyHandle {
        PrivateKeyHandle::from(test_keys::rsa_2048().clone())
    }

    #[test]
    fn algorithm_is_rsa_pkcs1v15_sha256() {
        assert_eq!(ALGORITHM, "rsa-pkcs1v15-sha256");
    }

    #[test]
    fn deterministic_signing() {
        let sig1 = sign(key(), b"hello").unwrap();
        let sig2 = sign(key(), b"hello").unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn signature_is_256_bytes() {
        let sig = sign(key(), b"data").unwrap();
        assert_eq!(sig.len(), 256);
    }

    #[test]
    fn empty_payload_signs() {
        let sig = sign(key(), b"").unwrap();
        assert_eq!(sig.len(), 256);

        let verifying_key = VerifyingKey::<Sha256>::new(test_keys::rsa_2048().to_public_key());
        let signature = rsa::pkcs1v15::Signature::try_from(sig.as_bytes()).unwrap();
        verifying_key.verify(b"", &signature).unwrap();
    }

    #[test]
    fn streaming_matches_one_shot() {
        let payload = br#"{"device":"sda","method":"NIST 800-88 Purge"}"#;
        let one_shot = sign(key(), payload).unwrap();
        let streamed = sign_reader(key(), &payload[..]).unwrap();
        assert_eq!(one_shot, streamed);
    }

    #[test]
    fn single_bit_flip_changes_signature() {
        let payload = b"{\"status\":\"wiped\"}".to_vec();
        let mut tampered = payload.clone();
        tampered[3] ^= 0x01;
        assert_ne!(sign(key(), &payload).unwrap(), sign(key(), &tampered).unwrap());
    }

    #[test]
    fn different_keys_produce_different_signatures() {
        let other = PrivateKeyHandle::from(test_keys::rsa_from_seed("other-seed", 1024));
        let sig = sign(other, b"data").unwrap();
        assert_eq!(sig.len(), 128);
        assert_ne!(sig, sign(key(), b"data").unwrap());
    }
}
