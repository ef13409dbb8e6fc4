use clap::Parser;

use rengo_cli::args::CliArgs;
use rengo_cli::tracing_config;

fn main() -> anyhow::Result<()> {
    tracing_config::init_tracing();
    let args = CliArgs::parse();
    rengo_cli::run(args)
}
