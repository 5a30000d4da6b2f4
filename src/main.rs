#[cfg(not(feature = "cli"))]
compile_error!("The `fsvis` binary requires the `cli` feature. Build with `--features cli`.");

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::process;

use fsvis::cli;
use fsvis::cli::app::{Cli, ColorMode, Commands};
use fsvis::FsvisError;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {} // colored auto-detects tty
    }

    let writer_result: Result<Box<dyn Write>, FsvisError> = match &cli.output {
        Some(path) => File::create(path)
            .map(|f| Box::new(f) as Box<dyn Write>)
            .map_err(|e| FsvisError::Io(format!("Cannot create {}: {}", path, e))),
        None => Ok(Box::new(std::io::stdout()) as Box<dyn Write>),
    };

    let mut writer = match writer_result {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mmap = !cli.no_mmap;

    let result = match cli.command {
        Commands::Describe {
            file,
            offset,
            schema,
            paths,
            json,
        } => cli::describe::execute(
            &cli::describe::DescribeOptions {
                file,
                offset,
                schema,
                paths,
                json,
                mmap,
            },
            &mut writer,
        ),

        Commands::Dump {
            file,
            offset,
            schema,
            path,
            follow,
            raw,
        } => cli::dump::execute(
            &cli::dump::DumpOptions {
                file,
                offset,
                schema,
                path,
                follow,
                raw,
                mmap,
            },
            &mut writer,
        ),

        Commands::Layout { schema, json } => {
            cli::layout::execute(&cli::layout::LayoutOptions { schema, json }, &mut writer)
        }
    };

    if let Err(e) = result.and_then(|_| {
        writer
            .flush()
            .map_err(|e| FsvisError::Io(format!("Cannot flush output: {}", e)))
    }) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
