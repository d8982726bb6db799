use clap::Parser;
use sto::cli::{run, Cli};
use sto::logging::{init_logging, LogFormat};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });
    run(cli)
}
