use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = dreamscape::config::Config::parse();
    dreamscape::app::run(cfg)
}
