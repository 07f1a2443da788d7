//! Key generation tool for the zk-auth login circuit.
//!
//! Usage:
//!   zk-keygen generate --output ./zk-keys
//!   zk-keygen verify --vk ./zk-keys/verification_key.json
//!   zk-keygen info --keys-dir ./zk-keys

use clap::{Parser, Subcommand};
use rand::thread_rng;
use std::fs;
use std::path::{Path, PathBuf};
use zkauth_crypto::{
    setup_auth_keys, ProvingArtifacts, VerificationKey, VerificationKeyDocument,
    KEY_METADATA_FILE, PROVING_KEY_FILE, VERIFICATION_KEY_FILE, VERIFICATION_KEY_HASH_FILE,
};
use zkauth_types::PUBLIC_SIGNAL_COUNT;

const CIRCUIT_VERSION: &str = "1.0.0";

/// Generate and inspect Groth16 keys for zk-auth.
#[derive(Parser)]
#[command(name = "zk-keygen")]
#[command(about = "Generate Groth16 proving and verification keys for the zk-auth login circuit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run circuit-specific setup and write the key files.
    Generate {
        /// Output directory for keys.
        #[arg(short, long, default_value = "./zk-keys")]
        output: PathBuf,
    },

    /// Load and validate a verification key document.
    Verify {
        /// Path to verification_key.json.
        #[arg(short, long)]
        vk: PathBuf,

        /// Expected key hash (hex).
        #[arg(short, long)]
        expected_hash: Option<String>,
    },

    /// Show the metadata of generated keys.
    Info {
        #[arg(short, long, default_value = "./zk-keys")]
        keys_dir: PathBuf,
    },
}

fn generate_keys(output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("zk-auth key generator v{}", CIRCUIT_VERSION);
    println!("==========================");
    println!("Public signals: {}", PUBLIC_SIGNAL_COUNT);
    println!();

    fs::create_dir_all(output_dir)?;

    println!("Running circuit-specific setup...");
    let mut rng = thread_rng();
    let (pk, vk) = setup_auth_keys(&mut rng)?;
    println!("Setup complete.");
    println!();

    let pk_path = output_dir.join(PROVING_KEY_FILE);
    ProvingArtifacts::new(pk).save(&pk_path)?;
    let pk_size = fs::metadata(&pk_path)?.len();
    println!("Proving key: {} ({} bytes)", pk_path.display(), pk_size);

    let doc = VerificationKeyDocument::from_verifying_key(&vk);
    let vk_path = output_dir.join(VERIFICATION_KEY_FILE);
    doc.save(&vk_path)?;
    println!("Verification key: {}", vk_path.display());

    let vk_hash = doc.fingerprint()?;
    let hash_path = output_dir.join(VERIFICATION_KEY_HASH_FILE);
    fs::write(&hash_path, format!("{}\n", vk_hash))?;
    println!("VK hash: {}", vk_hash);

    let meta_path = output_dir.join(KEY_METADATA_FILE);
    let metadata = serde_json::json!({
        "circuit": "auth",
        "version": CIRCUIT_VERSION,
        "public_signals": PUBLIC_SIGNAL_COUNT,
        "vk_hash": vk_hash,
        "pk_size": pk_size,
        "generated_at": chrono::Utc::now().to_rfc3339(),
    });
    fs::write(&meta_path, serde_json::to_string_pretty(&metadata)?)?;
    println!("Metadata: {}", meta_path.display());

    println!();
    println!("To use these keys:");
    println!("  1. Copy {} to the server data directory", VERIFICATION_KEY_FILE);
    println!("  2. Copy {} to clients that generate proofs", PROVING_KEY_FILE);
    println!("  3. Check the VK hash matches: {}", vk_hash);

    Ok(())
}

fn verify_key(vk_path: &Path, expected_hash: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying key: {}", vk_path.display());

    let doc = VerificationKeyDocument::load(vk_path)?;
    let key = VerificationKey::from_document(&doc)?;
    println!("Curve points: OK");
    println!("VK hash: {}", key.fingerprint());

    if let Some(expected) = expected_hash {
        if key.fingerprint() == expected.trim() {
            println!("Hash match: OK");
        } else {
            eprintln!("Hash MISMATCH!");
            eprintln!("  Expected: {}", expected);
            eprintln!("  Actual:   {}", key.fingerprint());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn show_info(keys_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("zk-auth keys");
    println!("============");
    println!("Directory: {}", keys_dir.display());
    println!();

    let meta_path = keys_dir.join(KEY_METADATA_FILE);
    if !meta_path.exists() {
        println!("No keys found. Run 'zk-keygen generate' first.");
        return Ok(());
    }

    let metadata: serde_json::Value = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
    println!("Version: {}", metadata["version"]);
    println!("Public signals: {}", metadata["public_signals"]);
    println!("VK hash: {}", metadata["vk_hash"]);
    println!("PK size: {} bytes", metadata["pk_size"]);
    println!("Generated: {}", metadata["generated_at"]);

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { output } => generate_keys(&output)?,
        Commands::Verify { vk, expected_hash } => verify_key(&vk, expected_hash)?,
        Commands::Info { keys_dir } => show_info(&keys_dir)?,
    }

    Ok(())
}
