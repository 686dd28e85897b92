mod args;
mod payload;
mod stress;

use args::Args;
use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};
use std::error::Error;
use std::fs::File;

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    let config = args.table_config()?;
    stress::run(&args, &config)?;

    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if let Some(log_file) = &args.log_file {
        WriteLogger::init(level, Config::default(), File::create(log_file)?)?;
    } else {
        TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?;
    }

    Ok(args)
}
