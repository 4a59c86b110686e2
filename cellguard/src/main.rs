//! Guarded state cell CLI.
//!
//! Keeps contract state in `.cellguard/state.json` and dispatches one call
//! (or a replay script) per invocation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use cellguard::core::call::Call;
use cellguard::core::types::{Address, Record, SignedWord, Word};
use cellguard::exit_codes;
use cellguard::invoke::{InvokeOutcome, invoke, replay};
use cellguard::io::init::{CellguardPaths, InitOptions, init_cellguard};
use cellguard::io::state_store::load_state;
use cellguard::logging;

#[derive(Parser)]
#[command(name = "cellguard", version, about = "Guarded deterministic state cells")]
struct Cli {
    /// Project root containing `.cellguard/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Debug logging for this crate when `RUST_LOG` is unset.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.cellguard/` with the given owner.
    Init {
        /// Identity recorded as the store owner.
        #[arg(long)]
        owner: Address,
        /// Overwrite existing state, config, and receipts.
        #[arg(short, long)]
        force: bool,
    },
    /// Overwrite the store's scalar counter (owner only).
    SetScalar {
        #[arg(long)]
        caller: Option<Address>,
        value: Word,
    },
    /// Reset the record and derive a value from `--d` (owner only).
    UpdateRecord {
        #[arg(long)]
        caller: Option<Address>,
        #[arg(long)]
        c: Word,
        #[arg(long)]
        d: Word,
    },
    /// Add 20 to element 6 and 10 to the scalar counter.
    Bump {
        #[arg(long)]
        caller: Option<Address>,
        #[arg(required = true)]
        values: Vec<Word>,
    },
    /// Evaluate the range-checked formula.
    Evaluate {
        #[arg(long)]
        caller: Option<Address>,
        x: Word,
        y: Word,
        z: Word,
    },
    /// Classify three signed integers; prints the outcome code (1-5).
    Classify {
        #[arg(long)]
        caller: Option<Address>,
        #[arg(allow_negative_numbers = true)]
        a: SignedWord,
        #[arg(allow_negative_numbers = true)]
        b: SignedWord,
        #[arg(allow_negative_numbers = true)]
        c: SignedWord,
    },
    /// Execute a JSON array of `{ "caller", "call" }` entries in order.
    Replay { script: PathBuf },
    /// Print the persisted state.
    Show,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let root = cli.root.as_path();
    let code = match cli.command {
        Command::Init { owner, force } => {
            let paths = init_cellguard(root, &InitOptions { owner, force })?;
            println!("{}", paths.state_dir.display());
            exit_codes::OK
        }
        Command::SetScalar { caller, value } => {
            report_one(&invoke(root, caller, Call::SetScalar { value })?)
        }
        Command::UpdateRecord { caller, c, d } => report_one(&invoke(
            root,
            caller,
            Call::UpdateRecord {
                input: Record::new(c, d),
            },
        )?),
        Command::Bump { caller, values } => {
            report_one(&invoke(root, caller, Call::BumpArray { values })?)
        }
        Command::Evaluate { caller, x, y, z } => {
            report_one(&invoke(root, caller, Call::Evaluate { x, y, z })?)
        }
        Command::Classify { caller, a, b, c } => {
            report_one(&invoke(root, caller, Call::Classify { a, b, c })?)
        }
        Command::Replay { script } => report_all(&replay(root, &script)?),
        Command::Show => {
            let state = load_state(&CellguardPaths::new(root).state_path)?;
            let rendered = serde_json::to_string_pretty(&state).context("serialize state")?;
            println!("{rendered}");
            exit_codes::OK
        }
    };
    Ok(code)
}

fn report_one(outcome: &InvokeOutcome) -> i32 {
    match &outcome.result {
        Ok(output) => {
            println!("{output}");
            exit_codes::OK
        }
        Err(err) => {
            eprintln!("reverted: {err}");
            exit_codes::REVERTED
        }
    }
}

/// One line per call: `<nonce>\tok\t<output>` or `<nonce>\treverted\t<error>`.
fn report_all(outcomes: &[InvokeOutcome]) -> i32 {
    for outcome in outcomes {
        match &outcome.result {
            Ok(output) => println!("{}\tok\t{}", outcome.nonce, output),
            Err(err) => println!("{}\treverted\t{}", outcome.nonce, err),
        }
    }
    if outcomes.iter().any(InvokeOutcome::reverted) {
        exit_codes::REVERTED
    } else {
        exit_codes::OK
    }
}
