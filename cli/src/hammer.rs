// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, format_bits, format_offsets};
use anyhow::{Context, Result};
use clap::Parser;
use gpiochip2_uapi::config::LineConfigBuilder;
use gpiochip2_uapi::v2::{
    get_all_line_values, get_chip_info, get_line, lines_mask, set_all_line_values, LineFlags,
    LineRequest, Offset,
};
use std::io::Write;
use std::time::Duration;

const SWIRL: [char; 4] = ['-', '\\', '|', '/'];

#[derive(Debug, Parser)]
pub struct Opts {
    /// The offset of a line to toggle
    ///
    /// May be repeated to toggle several lines together.
    #[arg(short, long = "offset", value_name = "offset", required = true)]
    offsets: Vec<Offset>,

    /// The chip containing the lines
    ///
    /// The chip may be identified by number, name, or path.
    #[arg(short, long, value_name = "chip", env = "GPIOCHIP", default_value = "0")]
    chip: String,

    /// The number of times to toggle the lines
    ///
    /// Toggles indefinitely if zero.
    #[arg(short = 'n', long, value_name = "num", default_value_t = 0)]
    count: u32,

    /// The time between toggles
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(short, long, value_name = "period", default_value = "1s", value_parser = common::parse_duration)]
    period: Duration,
}

pub fn cmd(opts: &Opts) -> Result<()> {
    let cf = common::open_chip(&opts.chip)?;
    let ci = get_chip_info(&cf).context("unable to read chip info")?;
    let num_lines = opts.offsets.len();
    let mut builder = LineConfigBuilder::new(num_lines)?;
    builder.with_flags(LineFlags::OUTPUT);
    let lr = LineRequest::new(&opts.offsets, "gpiochip2-hammer", builder.build()?)?;
    let lf = get_line(&cf, &lr).with_context(|| {
        format!(
            "unable to request lines {} on {}",
            format_offsets(&opts.offsets),
            ci.name
        )
    })?;

    let mut bits = get_all_line_values(&lf, num_lines).context("unable to read line values")?;
    println!(
        "Hammer lines {} on {}, initial states: {}",
        format_offsets(&opts.offsets),
        ci.name,
        format_bits(bits, num_lines)
    );

    let mask = lines_mask(num_lines);
    let mut stdout = std::io::stdout();
    let mut i: u32 = 0;
    while opts.count == 0 || i < opts.count {
        let toggled = !bits & mask;
        set_all_line_values(&lf, num_lines, toggled).context("unable to set line values")?;
        bits = get_all_line_values(&lf, num_lines).context("unable to read line values")?;
        if bits != toggled {
            log::warn!("wrote {:#x}, read back {:#x}", toggled, bits);
        }
        print!(
            "[{}] {}\r",
            SWIRL[i as usize % SWIRL.len()],
            format_bits(bits, num_lines)
        );
        stdout.flush()?;
        std::thread::sleep(opts.period);
        i = i.wrapping_add(1);
    }
    println!();
    Ok(())
}
