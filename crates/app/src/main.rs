//! Adex command-line client.
//!
//! Signs in against the Adex backend, keeps the session on disk and runs one
//! command per invocation. Results are printed as JSON on stdout.

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use adex_application::{
    ApiError, AuthService, ClientConfig, InvestmentService, LoginOutcome, SessionEvent,
    SessionHttpClient, SessionStore, WalletService,
};
use adex_domain::UserProfile;
use adex_infrastructure::{FileStorage, ReqwestTransport};
use serde_json::{Value, json};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Command;

type Client = Arc<SessionHttpClient<ReqwestTransport>>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(output) => {
            match serde_json::to_string_pretty(&output) {
                Ok(text) => println!("{text}"),
                Err(error) => eprintln!("{error}"),
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<Value, Box<dyn std::error::Error>> {
    let command = Command::parse(std::env::args().skip(1))?;
    let config = ClientConfig::from_env()?;

    let storage = match std::env::var("ADEX_STORAGE_PATH") {
        Ok(path) => FileStorage::new(PathBuf::from(path)),
        Err(_) => FileStorage::at_default_location()?,
    };
    tracing::debug!(path = %storage.path().display(), "using session storage");

    let session = SessionStore::load(Arc::new(storage)).await?;
    let mut events = session.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SessionEvent::PersistFailed { reason } => {
                    tracing::warn!(%reason, "stored session is out of date");
                }
                event if event.ends_session() => tracing::info!(?event, "session ended"),
                event => tracing::debug!(?event, "session event"),
            }
        }
    });

    let transport = ReqwestTransport::new(&config)?;
    let client: Client = Arc::new(
        SessionHttpClient::new(transport, session, config).with_expired_handler(
            |event: &SessionEvent| {
                if let SessionEvent::SessionExpired { message } = event {
                    eprintln!("{message} Run `adex login <email> <password>`.");
                }
            },
        ),
    );

    Ok(execute(&client, command).await?)
}

async fn execute(client: &Client, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::Login(credentials) => {
            match AuthService::new(Arc::clone(client)).login(&credentials).await? {
                LoginOutcome::Authenticated { user } => {
                    Ok(json!({"authenticated": true, "user": user}))
                }
                LoginOutcome::TwoFactorRequired => Ok(json!({
                    "authenticated": false,
                    "twoFactorRequired": true
                })),
            }
        }
        Command::Logout => {
            AuthService::new(Arc::clone(client)).logout().await?;
            Ok(json!({"authenticated": false}))
        }
        Command::Profile => AuthService::new(Arc::clone(client)).profile().await,
        Command::Plans => InvestmentService::new(Arc::clone(client)).plans().await,
        Command::Wallet => WalletService::new(Arc::clone(client)).wallet().await,
        Command::Transactions(filter) => {
            let list = WalletService::new(Arc::clone(client))
                .transactions(filter)
                .await?;
            Ok(Value::Array(list))
        }
        Command::Locale(locale) => {
            client.session().set_locale(&locale).await?;
            Ok(json!({"language": locale}))
        }
        Command::WhoAmI => {
            let session = client.session();
            let user = session.user().await;
            Ok(json!({
                "authenticated": session.is_authenticated().await,
                "admin": user.as_ref().is_some_and(UserProfile::is_admin),
                "user": user,
                "language": session.locale().await,
            }))
        }
    }
}
