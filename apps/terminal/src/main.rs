//! # Rodeo Terminal Entry Point
//!
//! `rodeo` binary. The setup lives in lib.rs so it can be tested.
//!
//! ## Exit Codes
//! - `0`: command succeeded
//! - `1`: blocking error (message on stderr)
//! - `2`: transient error such as a failed fetch; safe to retry

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use rodeo_terminal::cli::Cli;
use rodeo_terminal::{init_tracing, run};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(out) => {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(out.as_bytes());
            if json {
                let _ = writeln!(stdout);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if json {
                match serde_json::to_string(&err) {
                    Ok(body) => println!("{}", body),
                    Err(_) => eprintln!("{}", err.message),
                }
            } else {
                eprintln!("{}", err.message);
            }
            if err.is_blocking() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}
