use clap::Parser;
use repo_transfer::{run, TransferCli};
use std::process::exit;

#[tokio::main]
async fn main() {
    let cli_args = TransferCli::parse();
    let level = match cli_args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .format_timestamp(None)
        .init();
    if let Err(e) = run(cli_args).await {
        println!("Error: {e}");
        exit(1);
    }
}
