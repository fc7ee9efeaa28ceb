use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use zeroize::Zeroizing;

use crate::error::{Result, SignerError};

const PEM_BEGIN: &str = "-----BEGIN ";
const PEM_DASHES: &str = "-----";

/// An RSA private key loaded for a single signing run.
///
/// Not `Clone` and not serializable. The underlying key zeroizes its
/// material when dropped.
pub struct PrivateKeyHandle {
    key: RsaPrivateKey,
}

impl PrivateKeyHandle {
    /// Size of the modulus in bits.
    pub fn modulus_bits(&self) -> usize {
        self.key.n().bits()
    }

    /// Byte length of any signature made with this key, `ceil(modulus_bits / 8)`.
    pub fn signature_len(&self) -> usize {
        self.key.size()
    }

    pub(crate) fn into_inner(self) -> RsaPrivateKey {
        self.key
    }
}

impl From<RsaPrivateKey> for PrivateKeyHandle {
    fn from(key: RsaPrivateKey) -> Self {
        Self { key }
    }
}

impl fmt::Debug for PrivateKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyHandle")
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

/// Opens `path` and loads the single unencrypted PEM private key it holds.
pub fn load_private_key_file(path: impl AsRef<Path>) -> Result<PrivateKeyHandle> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SignerError::key_unreadable(path, e))?;
    load_private_key(file).map_err(|e| match e {
        SignerError::KeyUnreadable(cause) => {
            SignerError::KeyUnreadable(format!("{}: {cause}", path.display()))
        }
        other => other,
    })
}

/// Reads a PEM container to the end and parses the private key inside.
///
/// Accepts `PRIVATE KEY` (PKCS#8) and `RSA PRIVATE KEY` (PKCS#1) blocks.
/// Other PEM blocks in the container are ignored.
pub fn load_private_key<R: Read>(mut source: R) -> Result<PrivateKeyHandle> {
    let mut text = Zeroizing::new(String::new());
    source.read_to_string(&mut *text).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => SignerError::KeyMalformed("key is not PEM text".into()),
        _ => SignerError::KeyUnreadable(e.to_string()),
    })?;

    let key = parse_pem_private_key(&text)?;
    let handle = PrivateKeyHandle::from(key);
    tracing::debug!(modulus_bits = handle.modulus_bits(), "loaded private key");
    Ok(handle)
}

fn parse_pem_private_key(text: &str) -> Result<RsaPrivateKey> {
    let blocks = private_key_blocks(text);
    let block = match blocks.as_slice() {
        [] => {
            return Err(SignerError::KeyMalformed("no PEM private key block found".into()));
        }
        [block] => block,
        many => {
            return Err(SignerError::KeyMalformed(format!(
                "found {} private key blocks, expected exactly one",
                many.len()
            )));
        }
    };

    match block.label {
        "PRIVATE KEY" => RsaPrivateKey::from_pkcs8_pem(block.text)
            .map_err(|e| SignerError::KeyMalformed(format!("invalid PKCS#8 RSA key: {e}"))),
        "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_pem(block.text)
            .map_err(|e| SignerError::KeyMalformed(format!("invalid PKCS#1 RSA key: {e}"))),
        "ENCRYPTED PRIVATE KEY" => Err(SignerError::KeyMalformed(
            "encrypted private keys are not supported".into(),
        )),
        other => Err(SignerError::KeyMalformed(format!("unsupported key type: {other}"))),
    }
}

#[derive(Debug, PartialEq)]
struct PemBlock<'a> {
    label: &'a str,
    text: &'a str,
}

/// Splits out every PEM block whose label ends in `PRIVATE KEY`.
///
/// A key block with no matching END line runs to the end of the input and
/// is left for the DER decoder to reject. Any other unterminated block is
/// skipped past its BEGIN line.
fn private_key_blocks(text: &str) -> Vec<PemBlock<'_>> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(PEM_BEGIN) {
        let start = cursor + offset;
        let label_start = start + PEM_BEGIN.len();
        let Some(label_len) = text[label_start..].find(PEM_DASHES) else {
            break;
        };
        let label = &text[label_start..label_start + label_len];
        let after_label = label_start + label_len + PEM_DASHES.len();

        let is_key = label.ends_with("PRIVATE KEY");

        let end_marker = format!("-----END {label}-----");
        let end = match text[after_label..].find(&end_marker) {
            Some(i) => after_label + i + end_marker.len(),
            None if is_key => text.len(),
            None => {
                cursor = after_label;
                continue;
            }
        };

        if is_key {
            blocks.push(PemBlock {
                label,
                text: &text[start..end],
            });
        }
        cursor = end;
    }

    blocks
}
