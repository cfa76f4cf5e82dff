// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line tool for inspecting and driving GPIO lines via the GPIO uAPI v2.

use clap::Parser;
use std::process::ExitCode;

mod common;
mod edges;
mod hammer;
mod info;
mod watch;

fn main() -> ExitCode {
    let opt = match Opts::try_parse() {
        Ok(opt) => opt,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let level = if opt.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    let res = match opt.cmd {
        Command::Edges(cfg) => edges::cmd(&cfg),
        Command::Hammer(cfg) => hammer::cmd(&cfg),
        Command::Info(cfg) => info::cmd(&cfg),
        Command::Watch(cfg) => watch::cmd(&cfg),
    };
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if opt.verbose {
                eprintln!("{e:#}");
            } else {
                eprintln!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser)]
#[command(
    name = "gpiochip2",
    about = "A utility to inspect and drive GPIO lines on Linux using the GPIO uAPI v2.",
    version,
    propagate_version = true
)]
struct Opts {
    /// Provide more detailed error messages and logging.
    #[arg(short = 'v', long, global = true, display_order = 800)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
enum Command {
    /// Monitor GPIO lines for edge events.
    Edges(edges::Opts),

    /// Repeatedly toggle the values of output lines.
    Hammer(hammer::Opts),

    /// List the lines of a GPIO chip and their configuration.
    Info(info::Opts),

    /// Watch lines for changes to their info.
    Watch(watch::Opts),
}
