use std::path::PathBuf;
use std::process::ExitCode;

use certificate_signer::SignRequest;
use clap::Parser;
use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

/// Sign a JSON certificate with an RSA private key.
#[derive(Parser)]
#[clap(name = "certificate-signer", version)]
struct Args {
    /// Document to sign; read as opaque bytes.
    payload: PathBuf,
    /// Unencrypted PEM RSA private key.
    private_key: PathBuf,
    /// File that receives the base64 signature.
    output: PathBuf,
    /// End the output file with a newline.
    #[clap(long)]
    trailing_newline: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(args) {
        Ok(output) => {
            println!("Certificate signed successfully");
            println!("Signature written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<PathBuf> {
    let request = SignRequest::new(args.payload, args.private_key, args.output)
        .with_trailing_newline(args.trailing_newline);
    let artifact = certificate_signer::run(&request)?;
    Ok(artifact.output_path)
}
