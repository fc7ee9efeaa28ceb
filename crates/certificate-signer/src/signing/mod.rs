mod context;
mod key;
mod signer;

#[cfg(test)]
pub(crate) mod test_keys;

pub use context::{MIN_MODULUS_BYTES, Signature, SigningContext};
pub use key::{PrivateKeyHandle, load_private_key, load_private_key_file};
pub use signer::{ALGORITHM, sign, sign_reader};
