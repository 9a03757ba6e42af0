use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a configuration file; environment variables override it.
    #[clap(short, long, default_value = "config.toml")]
    pub config_path: PathBuf,
}
