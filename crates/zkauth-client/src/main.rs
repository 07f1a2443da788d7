use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zkauth_client::{
    default_client_dir, register_user, start_login_proof_from_file, AuthClient, CredentialStore,
    DEFAULT_SERVER_URL,
};
use zkauth_crypto::{derive_commitment, PROVING_KEY_FILE};

#[derive(Parser)]
#[command(name = "zkauth")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "zk-auth client - log in without sending your password")]
struct Cli {
    #[arg(long, global = true, env = "ZKAUTH_SERVER", default_value = DEFAULT_SERVER_URL, help = "Server base URL")]
    server: String,

    #[arg(long, global = true, value_name = "DIR", env = "ZKAUTH_CLIENT_DIR", help = "Client state directory")]
    client_dir: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv)")]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Register a new account")]
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "ZKAUTH_SECRET", hide_env_values = true)]
        secret: String,
    },

    #[command(about = "Log in by proving knowledge of the secret")]
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "ZKAUTH_SECRET", hide_env_values = true)]
        secret: String,
        #[arg(long, value_name = "FILE", help = "Proving key (default: <client-dir>/auth.pk.bin)")]
        proving_key: Option<PathBuf>,
        #[arg(long, default_value = "120", help = "Give up on proof generation after SECS")]
        timeout: u64,
    },

    #[command(about = "Print the commitment for a secret and nonce")]
    Commitment {
        #[arg(short, long, env = "ZKAUTH_SECRET", hide_env_values = true)]
        secret: String,
        #[arg(short, long)]
        nonce: String,
    },

    #[command(about = "Check server health")]
    Health,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn,zkauth_client=info",
        1 => "info,zkauth_client=debug",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client_dir = cli.client_dir.clone().unwrap_or_else(default_client_dir);
    let store = CredentialStore::new(&client_dir);

    match cli.command {
        Commands::Register { username, secret } => {
            let api = AuthClient::new(&cli.server)?;
            let record = register_user(&api, &store, &username, &secret).await?;
            println!("[+] Registered '{}'", record.username);
            println!("    Commitment: {}", record.commitment);
            println!("    Record:     {:?}", store.path_for(&username)?);
        }
        Commands::Login {
            username,
            secret,
            proving_key,
            timeout,
        } => {
            let api = AuthClient::new(&cli.server)?;
            let record = store.load(&username)?;
            let pk_path = proving_key.unwrap_or_else(|| client_dir.join(PROVING_KEY_FILE));

            info!("Generating proof...");
            let task = start_login_proof_from_file(pk_path, &record, &secret, &api);
            let canceller = task.canceller();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    canceller.cancel();
                }
            });

            let bundle = task.wait_timeout(Duration::from_secs(timeout)).await?;
            let outcome = api.login(&username, &bundle).await?;
            println!("[+] Logged in as '{}'", outcome.user.username);
            println!("    Session: {}", outcome.session.id);
            println!("    Expires: {}", outcome.session.expires_at.to_rfc3339());
        }
        Commands::Commitment { secret, nonce } => {
            println!("{}", derive_commitment(&secret, &nonce));
        }
        Commands::Health => {
            let api = AuthClient::new(&cli.server)?;
            let health = api.health().await?;
            println!("Status:         {}", health.status);
            println!("Verifier ready: {}", health.verifier_ready);
            println!("Server time:    {}", health.timestamp.to_rfc3339());
        }
    }

    Ok(())
}
