pub mod encoding;
pub mod error;
pub mod files;
pub mod pipeline;
pub mod signing;

pub use encoding::encode;
pub use error::SignerError;
pub use pipeline::{SignRequest, SignedArtifact, run};
pub use signing::{PrivateKeyHandle, Signature, SigningContext, load_private_key, sign};
