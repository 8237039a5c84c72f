use std::{error::Error, io};

use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};
use thiserror::Error;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

use crate::{
    calculator::{Calculator, CalculatorError},
    repl::{DEFAULT_MAX_EXPONENT, DEFAULT_PRECISION, Shell, ShellOptions},
    utils::{InputError, check_exponent, validate_input},
};

pub mod calculator;
pub mod repl;
pub mod utils;

#[derive(Error, Debug)]
pub enum CalError {
    #[error("{0}")]
    Calculator(CalculatorError),
    #[error("{0}")]
    Input(InputError),
    #[error("{0}")]
    Readline(ReadlineError),
    #[error("{0}")]
    Io(io::Error),
}

impl From<CalculatorError> for CalError {
    fn from(value: CalculatorError) -> Self {
        Self::Calculator(value)
    }
}

impl From<InputError> for CalError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

impl From<ReadlineError> for CalError {
    fn from(value: ReadlineError) -> Self {
        Self::Readline(value)
    }
}

impl From<io::Error> for CalError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Evaluate `<a> <op> <b>` once instead of starting the shell
    #[arg(num_args = 3, value_names = ["A", "OP", "B"], allow_negative_numbers = true)]
    calculation: Option<Vec<String>>,

    /// Decimals shown for shell results
    #[arg(short, long, default_value_t = DEFAULT_PRECISION)]
    precision: usize,

    /// Largest power exponent dispatched, in the shell and one-shot mode
    #[arg(long, default_value_t = DEFAULT_MAX_EXPONENT)]
    max_exponent: u64,

    /// Log verbosity (-v debug, -vv trace), overridden by RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(io::stderr)
        .init();
}

fn evaluate(left: &str, operator: &str, right: &str, max_exponent: u64) -> Result<f64, CalError> {
    let operator = operator.trim();
    let left = validate_input(left)?;
    let right = validate_input(right)?;
    check_exponent(operator, right, max_exponent)?;
    Ok(Calculator::new().perform(left, right, operator)?)
}

fn repl(options: ShellOptions) -> Result<(), Box<dyn Error>> {
    let editor = DefaultEditor::new()?;
    Shell::new(editor, io::stdout(), options).run()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!(?args, "parsed arguments");

    if let Some(calculation) = args.calculation {
        let result = evaluate(
            &calculation[0],
            &calculation[1],
            &calculation[2],
            args.max_exponent,
        )?;
        println!("{}", result);
        Ok(())
    } else {
        repl(ShellOptions {
            precision: args.precision,
            max_exponent: args.max_exponent,
        })
    }
}
