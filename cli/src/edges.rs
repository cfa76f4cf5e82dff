// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common;
use anyhow::{Context, Result};
use clap::Parser;
use gpiochip2_uapi::config::LineConfigBuilder;
use gpiochip2_uapi::v2::{get_line, LineEdgeEvent, LineEdgeEventKind, LineFlags, LineRequest, Offset};
use gpiochip2_uapi::{wait_event, EventBuffer};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(aliases(["e", "mon"]))]
pub struct Opts {
    /// The offsets of the lines to monitor
    #[arg(value_name = "offset", required = true)]
    offsets: Vec<Offset>,

    /// The chip containing the lines
    ///
    /// The chip may be identified by number, name, or path.
    #[arg(short, long, value_name = "chip", env = "GPIOCHIP", default_value = "0")]
    chip: String,

    /// The debounce period for the monitored lines
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(short = 'p', long, value_name = "period", value_parser = common::parse_duration)]
    debounce_period: Option<Duration>,

    /// Exit if no events are received for the specified period.
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(long, value_name = "period", value_parser = common::parse_duration)]
    idle_timeout: Option<Duration>,

    /// Exit after the specified number of events
    ///
    /// If not specified then monitoring will continue indefinitely.
    #[arg(short, long, value_name = "num")]
    num_events: Option<u32>,

    /// Timestamp events using CLOCK_REALTIME rather than CLOCK_MONOTONIC
    #[arg(long)]
    realtime: bool,

    /// The consumer label applied to requested lines.
    #[arg(
        short = 'C',
        long,
        value_name = "name",
        default_value = "gpiochip2-edges"
    )]
    consumer: String,
}

impl Opts {
    fn line_request(&self) -> Result<LineRequest> {
        let mut flags = LineFlags::INPUT | LineFlags::EDGE_RISING | LineFlags::EDGE_FALLING;
        if self.realtime {
            flags |= LineFlags::EVENT_CLOCK_REALTIME;
        }
        let mut builder = LineConfigBuilder::new(self.offsets.len())?;
        builder.with_flags(flags);
        if let Some(period) = self.debounce_period {
            for idx in 0..self.offsets.len() {
                builder.with_debounce_period(idx, period)?;
            }
        }
        let lr = LineRequest::new(&self.offsets, &self.consumer, builder.build()?)?;
        Ok(lr)
    }
}

pub fn cmd(opts: &Opts) -> Result<()> {
    let cf = common::open_chip(&opts.chip)?;
    let lr = opts.line_request()?;
    let lf = get_line(&cf, &lr).with_context(|| {
        format!(
            "unable to request lines {}",
            common::format_offsets(&opts.offsets)
        )
    })?;
    let mut buf: EventBuffer<LineEdgeEvent> = EventBuffer::new(opts.offsets.len() * 16);
    let mut count = 0;
    while opts.num_events.map_or(true, |n| count < n) {
        if buf.is_empty() {
            if let Some(timeout) = opts.idle_timeout {
                if !wait_event(&lf, timeout).context("unable to wait for edge events")? {
                    log::info!("no events for {:?}, exiting", timeout);
                    return Ok(());
                }
            }
        }
        let evt = buf
            .read_event(&lf)
            .context("unable to read edge event")?;
        println!("{}", format_event(&evt));
        count += 1;
    }
    Ok(())
}

fn format_event(evt: &LineEdgeEvent) -> String {
    let kind = match evt.kind {
        LineEdgeEventKind::RisingEdge => "rising",
        LineEdgeEventKind::FallingEdge => "falling",
    };
    format!(
        "{}.{:09}\t{}\t{}\t(seqno {}, line seqno {})",
        evt.timestamp_ns / 1_000_000_000,
        evt.timestamp_ns % 1_000_000_000,
        kind,
        evt.offset,
        evt.seqno,
        evt.line_seqno
    )
}
