use anyhow::Result;

use stage_engine::cli;
use stage_engine::runtime;

fn main() -> Result<()> {
    let args = cli::parse()?;
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    runtime::execute(args)
}
