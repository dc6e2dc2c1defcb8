// CLI module for administrative operations

pub mod migrate;
pub mod roles;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Media Explorer backend and administrative CLI
#[derive(Parser)]
#[command(name = "media-explorer")]
#[command(about = "Media Explorer backend and administrative CLI", long_about = None)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve,

    /// Run pending database migrations
    Migrate,

    /// Create the permissions, roles and role/permission links
    BootstrapRoles {
        /// JSON file with `permissions` and `roles`; built-in defaults when omitted
        #[arg(long)]
        definitions: Option<PathBuf>,
    },

    /// Add or remove a role for a user
    AssignRole {
        username: String,
        role_name: String,
        /// `add` or `remove`
        action: String,
    },
}

/// Execute an administrative CLI command
///
/// `serve` and `migrate` are handled by main before AppData exists.
pub async fn execute_command(
    command: Commands,
    app_data: &AppData,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::BootstrapRoles { definitions } => {
            roles::bootstrap_roles(&app_data.role_admin, definitions.as_deref()).await?;
        }
        Commands::AssignRole {
            username,
            role_name,
            action,
        } => {
            roles::assign_role(&app_data.role_admin, &username, &role_name, &action).await?;
        }
        Commands::Serve | Commands::Migrate => {
            tracing::debug!("Command handled before AppData initialization");
        }
    }

    Ok(())
}
