use anyhow::Result;
use clap::Parser;
use trials::settings::{Args, Settings};

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_args(args)?;
    trials::run_application(&settings)?;
    Ok(())
}
