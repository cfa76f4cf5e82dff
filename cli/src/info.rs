// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, line_attr_names};
use anyhow::{Context, Result};
use clap::Parser;
use gpiochip2_uapi::v2::{get_chip_info, get_line_info, ChipInfo, LineInfo, Offset};

#[derive(Debug, Parser)]
#[command(aliases(["i", "ls"]))]
pub struct Opts {
    /// The chip to list
    ///
    /// The chip may be identified by number, name, or path.
    /// e.g. the following all select the same chip:
    ///     0
    ///     gpiochip0
    ///     /dev/gpiochip0
    #[arg(
        value_name = "chip",
        env = "GPIOCHIP",
        default_value = "0",
        verbatim_doc_comment
    )]
    chip: String,

    /// Only list these lines
    ///
    /// If not specified then all lines on the chip are listed.
    #[arg(short, long = "offset", value_name = "offset")]
    offsets: Vec<Offset>,
}

pub fn cmd(opts: &Opts) -> Result<()> {
    let cf = common::open_chip(&opts.chip)?;
    let ci = get_chip_info(&cf).context("unable to read chip info")?;
    println!("{}", format_chip(&ci));
    let offsets: Vec<Offset> = if opts.offsets.is_empty() {
        (0..ci.num_lines).collect()
    } else {
        opts.offsets.clone()
    };
    for offset in offsets {
        let li = get_line_info(&cf, offset)
            .with_context(|| format!("unable to read info for line {offset}"))?;
        println!("{}", format_line(&li));
    }
    Ok(())
}

fn format_chip(ci: &ChipInfo) -> String {
    format!(
        "GPIO chip: {}, \"{}\", {} GPIO lines",
        ci.name, ci.label, ci.num_lines
    )
}

fn format_line(li: &LineInfo) -> String {
    let mut s = format!("\tline {:2}:", li.offset);
    if li.name.is_empty() {
        s.push_str(" unnamed");
    } else {
        s.push_str(&format!(" \"{}\"", li.name));
    }
    if li.consumer.is_empty() {
        s.push_str(" unused");
    } else {
        s.push_str(&format!(" \"{}\"", li.consumer));
    }
    let names = line_attr_names(li);
    if !names.is_empty() {
        s.push_str(&format!(" [{}]", names.join(", ")));
    }
    s
}
