use std::path::PathBuf;

use crate::encoding::encode;
use crate::error::Result;
use crate::files::{open_source, stream_source, write_sink};
use crate::signing::{SigningContext, load_private_key_file};

/// One signing run: which payload, which key, where the signature goes.
#[derive(Debug, Clone)]
pub struct SignRequest {
    pub payload_path: PathBuf,
    pub key_path: PathBuf,
    pub output_path: PathBuf,
    /// Append `\n` after the token in the output file.
    pub trailing_newline: bool,
}

impl SignRequest {
    pub fn new(
        payload_path: impl Into<PathBuf>,
        key_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            payload_path: payload_path.into(),
            key_path: key_path.into(),
            output_path: output_path.into(),
            trailing_newline: false,
        }
    }

    pub fn with_trailing_newline(mut self, trailing_newline: bool) -> Self {
        self.trailing_newline = trailing_newline;
        self
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedArtifact {
    pub output_path: PathBuf,
    pub payload_len: u64,
    pub signature_len: usize,
    /// The base64 token, without any trailing newline.
    pub encoded: String,
}

/// Signs the payload file and writes the encoded signature.
///
/// Nothing is written unless every earlier stage succeeded.
pub fn run(request: &SignRequest) -> Result<SignedArtifact> {
    let payload = open_source(&request.payload_path)?;
    let key = load_private_key_file(&request.key_path)?;

    let mut ctx = SigningContext::init(key)?;
    let payload_len = stream_source(payload, &request.payload_path, |chunk| ctx.update(chunk))?;
    let signature = ctx.finalize()?;
    let encoded = encode(signature.as_bytes());

    let mut contents = encoded.clone().into_bytes();
    if request.trailing_newline {
        contents.push(b'\n');
    }
    write_sink(&request.output_path, &contents)?;

    tracing::info!(
        output = %request.output_path.display(),
        signature_len = signature.len(),
        "payload signed"
    );

    Ok(SignedArtifact {
        output_path: request.output_path.clone(),
        payload_len,
        signature_len: signature.len(),
        encoded,
    })
}
