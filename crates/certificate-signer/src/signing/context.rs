use std::io::Read;
use std::path::Path;

use rsa::pkcs1v15::SigningKey;
use rsa::signature::{DigestSigner, SignatureEncoding};
use sha2::{Digest, Sha256};

use super::key::PrivateKeyHandle;
use super::signer::ALGORITHM;
use crate::error::{Result, SignerError};
use crate::files::stream_source;

/// Smallest modulus that fits a PKCS#1 v1.5 encoded SHA-256 digest:
/// 19 bytes of DigestInfo prefix, 32 bytes of digest, 11 bytes of padding.
pub const MIN_MODULUS_BYTES: usize = 19 + 32 + 11;

/// The raw bytes of an RSA PKCS#1 v1.5 / SHA-256 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", hex::encode(&self.0))
    }
}

/// A signing context binding one key to SHA-256 with PKCS#1 v1.5 padding.
///
/// Used in three phases: [`init`](Self::init), any number of
/// [`update`](Self::update) calls, then [`finalize`](Self::finalize).
/// The context owns the key; dropping it on any path releases the key,
/// which zeroizes its private material.
pub struct SigningContext {
    signing_key: SigningKey<Sha256>,
    digest: Sha256,
    signature_len: usize,
    ingested: u64,
}

impl std::fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningContext")
            .field("signature_len", &self.signature_len)
            .field("ingested", &self.ingested)
            .finish_non_exhaustive()
    }
}

impl SigningContext {
    /// Binds `key` and SHA-256 into a fresh context.
    pub fn init(key: PrivateKeyHandle) -> Result<Self> {
        let signature_len = key.signature_len();
        if signature_len < MIN_MODULUS_BYTES {
            return Err(SignerError::ContextInitFailed(format!(
                "{}-bit modulus is too small for PKCS#1 v1.5 with SHA-256 (need at least {} bytes)",
                key.modulus_bits(),
                MIN_MODULUS_BYTES
            )));
        }

        Ok(Self {
            signing_key: SigningKey::<Sha256>::new(key.into_inner()),
            digest: Sha256::new(),
            signature_len,
            ingested: 0,
        })
    }

    /// Feeds a chunk of payload into the digest.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        self.ingested = self
            .ingested
            .checked_add(data.len() as u64)
            .ok_or_else(|| SignerError::SignUpdateFailed("payload length overflow".into()))?;
        self.digest.update(data);
        Ok(())
    }

    /// Streams `reader` to its end through [`update`](Self::update).
    /// Returns the number of bytes read; a failed read is a source error.
    pub fn update_from_reader<R: Read>(&mut self, reader: R) -> Result<u64> {
        stream_source(reader, Path::new("payload reader"), |chunk| self.update(chunk))
    }

    /// Bytes ingested so far.
    pub fn ingested(&self) -> u64 {
        self.ingested
    }

    /// Exact length of the signature [`finalize`](Self::finalize) will produce.
    pub fn signature_len(&self) -> usize {
        self.signature_len
    }

    /// Signs the digest into `out` and returns the number of bytes written.
    pub fn finalize_into(self, out: &mut [u8]) -> Result<usize> {
        tracing::debug!(
            algorithm = ALGORITHM,
            payload_len = self.ingested,
            sha256 = %hex::encode(self.digest.clone().finalize()),
            "finalizing signature"
        );

        let signature = self
            .signing_key
            .try_sign_digest(self.digest)
            .map_err(|e| SignerError::SignFinalizeFailed(e.to_string()))?;
        let bytes = signature.to_bytes();

        let out_len = out.len();
        let dest = out.get_mut(..bytes.len()).ok_or_else(|| {
            SignerError::SignFinalizeFailed(format!(
                "output buffer holds {out_len} bytes, signature needs {}",
                bytes.len()
            ))
        })?;
        dest.copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Queries the signature length, allocates exactly that much and fills it.
    pub fn finalize(self) -> Result<Signature> {
        let expected = self.signature_len();
        let mut buf = vec![0u8; expected];
        let written = self.finalize_into(&mut buf)?;
        if written != expected {
            return Err(SignerError::SignFinalizeFailed(format!(
                "signature length mismatch: queried {expected} bytes, produced {written}"
            )));
        }
        Ok(Signature(buf))
    }
}
