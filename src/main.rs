use clap::Parser;
use jre_bundler::cli::{Cli, CommandHandler};
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    if let Err(e) = CommandHandler::new().handle_command(cli.command).await {
        eprint!("{e}");
        process::exit(1);
    }
}
