use anyhow::Context;
use clap::Parser;
use uuid::Uuid;

use portfolio_api_rust::auth::{issue_token, SessionClaims};
use portfolio_api_rust::config;

/// Issues an HS256 session token signed with AUTH_JWT_SECRET.
#[derive(Parser)]
#[command(name = "portfolio-token")]
#[command(about = "Issue a session token for local testing")]
#[command(version)]
struct Args {
    #[arg(long, help = "Subject id; random when omitted")]
    user_id: Option<Uuid>,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value = "")]
    name: String,

    #[arg(long)]
    admin: bool,

    #[arg(long, default_value_t = 8, help = "Token lifetime in hours")]
    hours: i64,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let secret = config::config()
        .auth
        .jwt_secret
        .as_deref()
        .context("AUTH_JWT_SECRET is not set")?;

    let claims = SessionClaims::new(
        args.user_id.unwrap_or_else(Uuid::new_v4),
        args.email,
        args.name,
        args.admin,
        chrono::Duration::hours(args.hours),
    );
    let token = issue_token(&claims, secret)?;

    println!("{}", token);
    Ok(())
}
