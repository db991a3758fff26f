#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use mustuse_cli::args::{CliArgs, OutputFormat};
use mustuse_cli::reporter::{Reporter, render_json};
use mustuse_cli::{driver, tracing_config};

const EXIT_SUCCESS: i32 = 0;
/// Findings or parse errors were reported.
const EXIT_DIAGNOSTICS: i32 = 1;
/// Nothing could be checked: bad config, unreadable input, no types.
const EXIT_FATAL: i32 = 2;

fn main() {
    tracing_config::init_tracing();
    let args = CliArgs::parse();

    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            EXIT_FATAL
        }
    };
    std::process::exit(code);
}

fn run(args: &CliArgs) -> Result<i32> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    if args.list_files_only {
        for file in driver::list_files(args, &cwd)? {
            println!("{}", file.display());
        }
        return Ok(EXIT_SUCCESS);
    }

    let run = driver::check(args, &cwd)?;
    match args.format {
        OutputFormat::Json => println!("{}", render_json(&run.diagnostics)?),
        OutputFormat::Text => {
            let pretty = args.pretty().unwrap_or_else(|| std::io::stdout().is_terminal());
            let mut reporter = Reporter::new(pretty);
            for (file, text) in &run.sources {
                reporter.add_source(file.clone(), text.clone());
            }
            print!("{}", reporter.render(&run.diagnostics));
            if let Some(summary) = reporter.render_summary(&run.diagnostics) {
                println!("{summary}");
            }
        }
    }

    Ok(if run.has_errors() {
        EXIT_DIAGNOSTICS
    } else {
        EXIT_SUCCESS
    })
}
