//! Credential and rights CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};

use crate::output;
use davstore_auth::{CachedAuthenticator, PathRights, RemoteCredentialVerifier};
use davstore_cache::CacheManager;
use davstore_core::error::AppError;

/// Arguments for auth commands
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Auth subcommand
    #[command(subcommand)]
    pub command: AuthCommand,
}

/// Auth subcommands
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Check a login against the credential endpoint
    Check {
        /// Email-shaped login
        login: String,
    },
    /// Show the rights a user has on a path
    Rights {
        /// User login
        user: String,
        /// Path
        path: String,
    },
}

/// Execute auth commands
pub async fn execute(args: &AuthArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    match &args.command {
        AuthCommand::Check { login } => {
            let secret = dialoguer::Password::new()
                .with_prompt("Password")
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

            let verifier = Arc::new(RemoteCredentialVerifier::new(&config.auth)?);
            let authenticator =
                CachedAuthenticator::new(verifier, CacheManager::new(&config.cache), &config.auth);
            match authenticator.login(login, &secret).await? {
                Some(user) => output::print_success(&format!("Credentials accepted for {user}")),
                None => output::print_warning("Credentials rejected"),
            }
        }
        AuthCommand::Rights { user, path } => {
            let rights = PathRights::default().authorization(user, path);
            output::print_kv("User", user);
            output::print_kv("Path", path);
            output::print_kv("Rights", rights.as_str());
        }
    }

    Ok(())
}
