//! List the organizations visible to the configured API key

use clap::Parser;

use grist_admin::{fail, styled_table};
use grist_client::{GristClient, GristConfig, Result};

#[derive(Parser)]
#[command(name = "grist-orgs", about = "List Grist organizations", version)]
struct Args {
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
    let orgs = client.list_orgs().await?;

    let mut table = styled_table(vec!["ID", "Name", "Domain"]);
    for org in &orgs {
        table.add_row(vec![
            org.id.to_string(),
            org.name.clone(),
            org.domain.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{table}");
    println!("{} organization(s)", orgs.len());
    Ok(())
}
