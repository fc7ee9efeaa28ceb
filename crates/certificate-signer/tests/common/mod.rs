#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::SeedableRng;
use rsa::RsaPrivateKey;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

pub const CERTIFICATE: &[u8] = br#"{"certificate_id":"ZT-2024-0001","device":{"path":"/dev/sdb","serial":"WD-WCC4N1234567"},"wipe":{"method":"NIST 800-88 Purge","passes":3,"status":"completed"}}"#;

pub fn rsa_2048() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let hash = Sha256::digest(b"integration-seed");
        let mut rng = ChaCha20Rng::from_seed(hash.into());
        RsaPrivateKey::new(&mut rng, 2048).unwrap()
    })
}

pub fn pkcs8_pem() -> String {
    rsa_2048().to_pkcs8_pem(LineEnding::LF).unwrap().to_string()
}

pub fn pkcs1_pem() -> String {
    rsa_2048().to_pkcs1_pem(LineEnding::LF).unwrap().to_string()
}

/// Scratch directory holding a payload and a PKCS#8 key.
pub struct Workspace {
    pub dir: TempDir,
    pub payload: PathBuf,
    pub key: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    pub fn new(payload: &[u8]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let payload_path = dir.path().join("certificate.json");
        let key = dir.path().join("private_key.pem");
        let output = dir.path().join("certificate.sig");
        fs::write(&payload_path, payload).unwrap();
        fs::write(&key, pkcs8_pem()).unwrap();
        Self {
            dir,
            payload: payload_path,
            key,
            output,
        }
    }
}
