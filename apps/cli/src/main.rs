//! `tavola` binary entry point. See the library crate for the wiring.

use std::process::ExitCode;

use clap::Parser;
use tavola_cli::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let json = cli.json;

    init_tracing();

    match run(cli).await {
        Ok(rendered) => {
            println!("{}", rendered.output(json));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if json {
                eprintln!("{}", serde_json::to_string(&err)?);
            } else {
                eprintln!("error[{}]: {}", err.code.as_str(), err.message);
            }
            Ok(ExitCode::from(err.code.exit_code()))
        }
    }
}
