use anyhow::Context;
use clap::Parser;
use motogp_tracker::{cli::Args, run_server, Settings};

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init();
    let args = Args::parse();
    let settings = Settings::new(Some(args.config_path.as_path()))
        .context("failed to parse config")?;
    run_server(settings).await
}
