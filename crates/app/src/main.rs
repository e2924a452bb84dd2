mod app;
mod export;

use anyhow::Result;
use clap::Parser;

use crate::app::{App, Cli};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut app = App::new(Cli::parse());
    app.init()?;

    Ok(())
}
