//! # dataprepper entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Load config, install tracing subscriber
//!   └─> Run the command on a Tokio runtime
//!       ├─> serve:   HTTP API until Ctrl-C
//!       └─> preview / stats / apply: one-shot, JSON or CSV out
//! ```
//!
//! ```bash
//! dataprepper serve --port 8000
//! dataprepper stats data.csv
//! dataprepper apply data.csv --action impute --columns '["age"]' --params '{"method":"median"}'
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    tokio::runtime::Runtime::new()?.block_on(cli::run(cli))
}
