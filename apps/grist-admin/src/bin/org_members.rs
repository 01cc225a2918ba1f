//! List the members of one organization (team-site level access)

use clap::Parser;

use grist_admin::{fail, styled_table};
use grist_client::{GristClient, GristConfig, Result};

#[derive(Parser)]
#[command(
    name = "grist-org-members",
    about = "List the members of a Grist organization",
    version
)]
struct Args {
    /// Organization id or team subdomain
    org: String,

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
    let members = client.list_org_members(&args.org).await?;

    let mut table = styled_table(vec!["Email", "Name", "Access"]);
    for member in &members {
        table.add_row(vec![
            member.email.clone(),
            member.name.clone(),
            member.level_label(),
        ]);
    }

    println!("{table}");
    println!("{} member(s)", members.len());
    Ok(())
}
