use clap::Parser;
use ferrum_store::cli::{self, parsers::CliParser};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let parser = CliParser::parse();

    if let Err(message) = cli::run_client(parser) {
        eprintln!("{}", message);
        std::process::exit(1);
    }
}
