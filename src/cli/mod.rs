use crate::driver::{CheckOptions, Driver, ResolveOptions};

use clap::AppSettings;
use colored::{Color, ColoredString, Colorize};
use log::Level;
use std::io;
use structopt::StructOpt;

mod check;
mod resolve;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "stiletto",
    about = "Resolves dependency-injection binding graphs",
    global_settings = &[AppSettings::ColoredHelp, AppSettings::VersionlessSubcommands]
)]
pub struct Cli {
    #[structopt(
        long, env = "LOG_LEVEL",
        help = "Sets the log level",
        default_value = "info",
        possible_values = &["off", "error", "warn", "info", "debug", "trace"],
        global = true
    )]
    log_level: log::LevelFilter,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Resolves each component and prints its binding graph
    Resolve(ResolveOptions),
    /// Resolves and validates each component, reporting every problem found
    Check(CheckOptions),
}

fn setup_logging(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = record.level();
            let color = match level {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Blue,
                Level::Debug => Color::Magenta,
                Level::Trace => Color::Green,
            };
            out.finish(format_args!(
                "{} {}",
                ColoredString::from((level.to_string().to_lowercase() + ":").as_str())
                    .color(color)
                    .to_string(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
}

pub fn run() {
    // get the subcommand
    let cli: Cli = Cli::from_args();

    // set up logging
    if let Err(err) = setup_logging(cli.log_level) {
        eprintln!("{} {}", "logging error:".red(), err);
    }

    let mut driver = Driver::new();
    let result = match cli.cmd {
        Command::Resolve(options) => resolve::action(&mut driver, options),
        Command::Check(options) => check::action(&mut driver, options),
    };

    if let Err(err) = result {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(2);
    }

    if driver.errors_emitted != 0 {
        std::process::exit(1);
    }
}
