use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{open_pool, output_collection, output_success};
use crate::cli::OutputFormat;
use crate::database::manager::SUPERUSER;
use crate::services::{NewUser, UserService};
use crate::workflow::Role;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create an account with a temporary password")]
    Add {
        #[arg(help = "Login name")]
        username: String,
        #[arg(long, help = "Temporary password")]
        password: String,
        #[arg(long, help = "Role, e.g. Staff or \"Dept HOD\"")]
        role: Role,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        dept: String,
        #[arg(long = "hod-email", default_value = "")]
        hod_email: String,
    },

    #[command(about = "List all accounts")]
    List,
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = open_pool().await?;
    let users = UserService::new(pool.clone());

    let result = match cmd {
        UserCommands::Add { username, password, role, name, email, dept, hod_email } => {
            let summary = users
                .create_user(SUPERUSER, NewUser { username, password, role, name, email, dept, hod_email })
                .await?;
            output_success(
                &output_format,
                &format!("Created {} ({})", summary.username, summary.role),
                Some(json!({ "user": summary })),
            )
        }
        UserCommands::List => {
            let list = users.list_users().await?;
            output_collection(&output_format, "users", &list, "No users", |u| {
                format!("{:<20} {:<12} {:<24} {}", u.username, u.role, u.name, u.dept)
            })
        }
    };

    pool.close().await;
    result
}
