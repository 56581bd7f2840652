//! `jl` command-line front end.
//!
//! Loads `jl.toml` (plus `APP_*` overrides), configures the shared logger,
//! and runs the selected command through the call tracer. The command's
//! result goes to stdout; trace lines go to the configured log destinations.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use jl::config::{AppConfig, apply_env_overrides, load_config};
use jl::core::calculator::Calculator;
use jl::core::fibonacci::Fibonacci;
use jl::core::primes::PrimeGenerator;
use jl::exit_codes;
use jl::logging;
use jl::temperature::{self, FaultyTemperatureConverter, TemperatureConverter};
use jl::trace::trace;
use jl::traced;

/// `recursive` beyond this is exponential enough to look like a hang.
const RECURSIVE_MAX_N: u64 = 40;

#[derive(Parser)]
#[command(
    name = "jl",
    version,
    about = "Temperature, calculator, Fibonacci and prime utilities with traced execution"
)]
struct Cli {
    /// TOML config file; a missing file means defaults.
    #[arg(long, global = true, default_value = "jl.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert Celsius to Fahrenheit.
    CelsiusToFahrenheit {
        #[arg(allow_negative_numbers = true)]
        celsius: f64,
    },
    /// Convert Fahrenheit to Celsius.
    FahrenheitToCelsius {
        #[arg(allow_negative_numbers = true)]
        fahrenheit: f64,
    },
    /// Convert between units `C`, `F` and `K`.
    Convert {
        #[arg(allow_negative_numbers = true)]
        temp: f64,
        from: String,
        to: String,
    },
    /// Convert with intentional errors (calibration offset from config).
    FaultyConvert {
        #[arg(allow_negative_numbers = true)]
        temp: f64,
        from: String,
        to: String,
    },
    /// Basic arithmetic on two numbers.
    Calc {
        #[arg(value_enum)]
        op: CalcOp,
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
    /// The n-th Fibonacci number.
    Fib {
        n: u64,
        #[arg(long, value_enum, default_value_t = FibMethod::Iterative)]
        method: FibMethod,
    },
    /// All primes up to and including LIMIT.
    Primes { limit: u64 },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CalcOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FibMethod {
    Recursive,
    Iterative,
    Memoization,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                exit_codes::INVALID
            } else {
                exit_codes::OK
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            process::exit(exit_codes::INVALID);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli.config)?;
    let config = apply_env_overrides(config, std::env::vars()).context("apply APP_* overrides")?;
    validate_command(&cli.command)?;

    let logger = logging::init(&config).context("configure logger")?;
    logger.info("Starting jl CLI...");

    let outcome = trace("execute", |command: &Command| execute(command, &config))
        .try_call((&cli.command,));
    match outcome {
        Ok(output) => {
            println!("{output}");
            Ok(exit_codes::OK)
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            Ok(exit_codes::FAILED)
        }
    }
}

fn validate_command(command: &Command) -> Result<()> {
    match *command {
        Command::Fib {
            n,
            method: FibMethod::Recursive,
        } if n > RECURSIVE_MAX_N => {
            bail!("fib: recursive method is limited to n <= {RECURSIVE_MAX_N}")
        }
        _ => Ok(()),
    }
}

fn execute(command: &Command, config: &AppConfig) -> Result<String> {
    let output = match command {
        Command::CelsiusToFahrenheit { celsius } => {
            let value = traced!(temperature::celsius_to_fahrenheit).call((*celsius,));
            value.to_string()
        }
        Command::FahrenheitToCelsius { fahrenheit } => {
            let value = traced!(temperature::fahrenheit_to_celsius).call((*fahrenheit,));
            value.to_string()
        }
        Command::Convert { temp, from, to } => {
            let converter = TemperatureConverter::new(config.env);
            let value = trace("convert", |temp: f64, from: &str, to: &str| {
                converter.convert(temp, from, to)
            })
            .method_of("TemperatureConverter")
            .try_call((*temp, from.as_str(), to.as_str()))?;
            value.to_string()
        }
        Command::FaultyConvert { temp, from, to } => {
            let converter = FaultyTemperatureConverter::from_config(config);
            let value = trace("convert", |temp: f64, from: &str, to: &str| {
                converter.convert(temp, from, to)
            })
            .method_of("FaultyTemperatureConverter")
            .try_call((*temp, from.as_str(), to.as_str()))?;
            value.to_string()
        }
        Command::Calc { op, a, b } => {
            let calc = Calculator::new("cli");
            let args = (*a, *b);
            let value = match op {
                CalcOp::Add => trace("add", |a: f64, b: f64| calc.add(a, b))
                    .method_of("Calculator")
                    .call(args),
                CalcOp::Subtract => trace("subtract", |a: f64, b: f64| calc.subtract(a, b))
                    .method_of("Calculator")
                    .call(args),
                CalcOp::Multiply => trace("multiply", |a: f64, b: f64| calc.multiply(a, b))
                    .method_of("Calculator")
                    .call(args),
                CalcOp::Divide => trace("divide", |a: f64, b: f64| calc.divide(a, b))
                    .method_of("Calculator")
                    .try_call(args)?,
            };
            value.to_string()
        }
        Command::Fib { n, method } => {
            let mut fib = Fibonacci::new();
            let value = match method {
                FibMethod::Recursive => trace("recursive", |n: u64| fib.recursive(n))
                    .method_of("Fibonacci")
                    .try_call((*n,))?,
                FibMethod::Iterative => trace("iterative", |n: u64| fib.iterative(n))
                    .method_of("Fibonacci")
                    .try_call((*n,))?,
                FibMethod::Memoization => trace("memoization", |n: u64| fib.memoization(n))
                    .method_of("Fibonacci")
                    .try_call((*n,))?,
            };
            value.to_string()
        }
        Command::Primes { limit } => {
            let generator = PrimeGenerator::new(*limit);
            let primes = trace("generate_primes", || generator.generate_primes())
                .method_of("PrimeGenerator")
                .call(());
            primes
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        }
    };
    Ok(output)
}
