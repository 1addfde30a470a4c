mod cli;
mod output;

use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = cli::Cli::parse();
    std::process::exit(cli::run(args));
}
