//! Map every (document, user, access level) pair of an organization
//!
//! Walks the whole workspace tree and prints the flat access table the
//! bulk operations work from. Documents whose access list cannot be read
//! are marked and do not abort the scan.

use clap::Parser;

use grist_access::{scan_organization, without_inherited, AccessRow};
use grist_admin::{fail, styled_table};
use grist_client::{GristClient, GristConfig, Result};

#[derive(Parser)]
#[command(
    name = "grist-access-map",
    about = "Map user access across all documents of a Grist organization",
    version
)]
struct Args {
    /// Organization id or team subdomain
    org: String,

    /// Drop rows that only reflect inherited access
    #[arg(long)]
    hide_inherited: bool,

    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run(Args::parse()).await {
        fail(err);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = GristConfig::from_env()?;
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }

    let client = GristClient::new(config)?;
    let mut rows = scan_organization(&client, &args.org).await?;
    if args.hide_inherited {
        rows = without_inherited(rows);
    }

    let failed = rows.iter().filter(|row| row.is_failed()).count();

    let mut table = styled_table(vec!["Workspace", "Document", "Email", "Name", "Access"]);
    for row in &rows {
        let document = row.document();
        match row {
            AccessRow::Granted { entry, .. } => {
                table.add_row(vec![
                    document.workspace.clone(),
                    document.name.clone(),
                    entry.email.clone(),
                    entry.name.clone(),
                    entry.level_label(),
                ]);
            }
            AccessRow::Unlisted { .. } => {
                table.add_row(vec![
                    document.workspace.clone(),
                    document.name.clone(),
                    "-".to_string(),
                    "-".to_string(),
                    "(no explicit access)".to_string(),
                ]);
            }
            AccessRow::Failed { error, .. } => {
                table.add_row(vec![
                    document.workspace.clone(),
                    document.name.clone(),
                    "-".to_string(),
                    "-".to_string(),
                    format!("fetch failed: {}", error),
                ]);
            }
        }
    }

    println!("{table}");
    println!("{} row(s)", rows.len());
    if failed > 0 {
        eprintln!("Warning: {} document(s) could not be read", failed);
    }
    Ok(())
}
