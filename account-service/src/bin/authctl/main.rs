//! authctl - operator tool for the DiaConnect credential core
//!
//! Loads the same layered configuration as the services, so it doubles as a
//! startup check for signing key and hashing settings.

use std::io;
use std::io::BufRead;
use std::process::ExitCode;

use account_service::config::Config;
use anyhow::Context;
use auth::Authenticator;
use chrono::Duration;
use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const EXIT_REJECTED: u8 = 1;
const EXIT_CONFIGURATION: u8 = 2;

#[derive(Parser)]
#[command(name = "authctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load configuration and validate signing key and hashing parameters
    CheckConfig,

    /// Hash a password read from the first line of stdin
    HashPassword,

    /// Verify a password read from stdin against a stored hash
    VerifyPassword {
        /// Stored hash in PHC string format
        #[arg(long)]
        hash: String,
    },

    /// Issue an access token for a subject
    IssueToken {
        /// Subject identifier (account id)
        #[arg(long)]
        subject: String,

        /// Token lifetime in minutes (defaults to the configured expiration)
        #[arg(long, allow_negative_numbers = true)]
        ttl_minutes: Option<i64>,
    },

    /// Verify an access token and print its subject
    VerifyToken {
        token: String,
    },

    /// Print the claims of a token without verifying it
    InspectToken {
        token: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let authenticator = match load_authenticator() {
        Ok(authenticator) => authenticator,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Configuration error");
            return ExitCode::from(EXIT_CONFIGURATION);
        }
    };

    match run(cli.command, &authenticator) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Command failed");
            ExitCode::FAILURE
        }
    }
}

fn load_authenticator() -> anyhow::Result<Authenticator> {
    let config = Config::load().context("failed to load configuration")?;

    tracing::debug!(
        algorithm = %config.auth.jwt.algorithm,
        expiration_minutes = config.auth.jwt.expiration_minutes,
        memory_kib = config.auth.hashing.memory_kib,
        iterations = config.auth.hashing.iterations,
        parallelism = config.auth.hashing.parallelism,
        "Configuration loaded"
    );

    Authenticator::new(&config.auth).context("invalid authentication settings")
}

fn run(command: Commands, authenticator: &Authenticator) -> anyhow::Result<ExitCode> {
    match command {
        Commands::CheckConfig => {
            tracing::info!("Configuration is valid");
            Ok(ExitCode::SUCCESS)
        }
        Commands::HashPassword => {
            let password = read_password()?;
            let hash = authenticator.hash_password(&password)?;
            println!("{}", hash);
            Ok(ExitCode::SUCCESS)
        }
        Commands::VerifyPassword { hash } => {
            let password = read_password()?;
            if authenticator.verify_password(&password, &hash) {
                println!("valid");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid");
                Ok(ExitCode::from(EXIT_REJECTED))
            }
        }
        Commands::IssueToken {
            subject,
            ttl_minutes,
        } => {
            let ttl = ttl_minutes
                .map(|minutes| {
                    Duration::try_minutes(minutes)
                        .with_context(|| format!("ttl of {} minutes is out of range", minutes))
                })
                .transpose()?;
            let issued = authenticator.issue_token(&subject, ttl)?;
            println!("{}", issued.access_token);
            tracing::info!(
                subject = %subject,
                expires_at = %issued.expires_at,
                "Token issued"
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::VerifyToken { token } => match authenticator.verify_token(&token) {
            Ok(subject) => {
                println!("{}", subject);
                Ok(ExitCode::SUCCESS)
            }
            Err(rejected) => {
                println!("{}", rejected);
                Ok(ExitCode::from(EXIT_REJECTED))
            }
        },
        Commands::InspectToken { token } => {
            let claims = authenticator.jwt_handler().decode_unverified(&token)?;
            println!("sub: {}", claims.sub);
            println!("iat: {}", claims.iat);
            match claims.expires_at() {
                Some(expires_at) => println!("exp: {} ({})", claims.exp, expires_at),
                None => println!("exp: {}", claims.exp),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_password() -> anyhow::Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']).to_string();
    anyhow::ensure!(!password.is_empty(), "password must not be empty");

    Ok(password)
}
