//! Simple command that prints one or '-n count' ordinal identifier strings
//!
//! Set `RUST_LOG=ordinal_id=trace` to watch the generator bump sequences.

use std::{env, io, io::Write, process::ExitCode};

use tracing_subscriber::{fmt, EnvFilter};

fn main() -> io::Result<ExitCode> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let count = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(opt) => opt.unwrap_or(1),
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count]",
                    program.as_deref().unwrap_or("ordinal")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..count {
        match ordinal_id::ordinal_id() {
            Ok(id) => writeln!(buf, "{}", id)?,
            Err(err) => {
                buf.flush()?;
                eprintln!("Error: {}", err);
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    buf.flush()?;

    Ok(ExitCode::SUCCESS)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<usize>, String> {
    let mut count = None;
    while let Some(arg) = args.next() {
        if arg != "-n" {
            return Err(format!("unrecognized argument '{}'", arg));
        }
        if count.is_some() {
            return Err("option 'n' given more than once".to_owned());
        }
        let Some(n_arg) = args.next() else {
            return Err("argument to option 'n' missing".to_owned());
        };
        let Ok(c) = n_arg.parse() else {
            return Err(format!("invalid argument to option 'n': '{}'", n_arg));
        };
        count.replace(c);
    }
    Ok(count)
}
