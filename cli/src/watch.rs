// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common;
use anyhow::{Context, Result};
use clap::Parser;
use gpiochip2_uapi::v2::{
    unwatch_line_info, watch_line_info, InfoChangeKind, LineInfoChangeEvent, Offset,
};
use gpiochip2_uapi::EventBuffer;

#[derive(Debug, Parser)]
#[command(aliases(["w"]))]
pub struct Opts {
    /// The offsets of the lines to watch
    #[arg(value_name = "offset", required = true)]
    offsets: Vec<Offset>,

    /// The chip containing the lines
    ///
    /// The chip may be identified by number, name, or path.
    #[arg(short, long, value_name = "chip", env = "GPIOCHIP", default_value = "0")]
    chip: String,

    /// Exit after the specified number of changes
    ///
    /// If not specified then watching will continue indefinitely.
    #[arg(short, long, value_name = "num")]
    num_events: Option<u32>,
}

pub fn cmd(opts: &Opts) -> Result<()> {
    let cf = common::open_chip(&opts.chip)?;
    for &offset in &opts.offsets {
        watch_line_info(&cf, offset)
            .with_context(|| format!("unable to watch line {offset}"))?;
    }
    let mut buf: EventBuffer<LineInfoChangeEvent> = EventBuffer::new(opts.offsets.len());
    let mut count = 0;
    while opts.num_events.map_or(true, |n| count < n) {
        let evt = buf
            .read_event(&cf)
            .context("unable to read info change event")?;
        println!("{}", format_event(&evt));
        count += 1;
    }
    for &offset in &opts.offsets {
        unwatch_line_info(&cf, offset)
            .with_context(|| format!("unable to unwatch line {offset}"))?;
    }
    Ok(())
}

fn event_kind_name(kind: InfoChangeKind) -> &'static str {
    match kind {
        InfoChangeKind::Requested => "requested",
        InfoChangeKind::Released => "released",
        InfoChangeKind::Reconfigured => "config changed",
    }
}

fn format_event(evt: &LineInfoChangeEvent) -> String {
    format!(
        "line {}: {} at {}",
        evt.info.offset,
        event_kind_name(evt.kind),
        evt.timestamp_ns
    )
}
