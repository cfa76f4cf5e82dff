// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{Context, Result};
use gpiochip2_uapi::v2::{LineFlags, LineInfo, Offset};
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

// common helper functions

pub fn chip_path_from_id(id: &str) -> PathBuf {
    if id.chars().all(char::is_numeric) {
        // from number
        return format!("/dev/gpiochip{id}").into();
    }
    if !id.chars().any(|x| x == '/') {
        // from name
        let mut p: PathBuf = "/dev".into();
        p.push(id);
        return p;
    }
    // from raw path
    id.into()
}

pub fn open_chip(id: &str) -> Result<File> {
    let p = chip_path_from_id(id);
    File::open(&p).with_context(|| format!("unable to open chip '{}'", p.display()))
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("'{0}' unknown units - use 's', 'ms' or 'us'.")]
    Units(String),
    #[error("'{0}' must start with a digit")]
    NoDigits(String),
    #[error("'{0}' {1}")]
    ParseDigits(String, std::num::ParseIntError),
    #[error("'{0}' is too long")]
    Overflow(String),
}

pub fn parse_duration(s: &str) -> std::result::Result<Duration, ParseDurationError> {
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    let (num, scale) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return Err(ParseDurationError::NoDigits(s.into())),
        Some(n) => {
            let (num, units) = s.split_at(n);
            let scale: u64 = match units {
                "us" => 1000,
                "ms" => 1000000,
                "s" => 1000000000,
                _ => return Err(ParseDurationError::Units(s.into())),
            };
            (num, scale)
        }
        None => (s, 1000000),
    };
    let t = num
        .parse::<u64>()
        .map_err(|e| ParseDurationError::ParseDigits(num.into(), e))?
        .checked_mul(scale)
        .ok_or_else(|| ParseDurationError::Overflow(s.into()))?;
    Ok(Duration::from_nanos(t))
}

// The names of the flags, and debounce, set on a line.
pub fn line_attr_names(li: &LineInfo) -> Vec<String> {
    const NAMES: [(LineFlags, &str); 10] = [
        (LineFlags::USED, "used"),
        (LineFlags::INPUT, "input"),
        (LineFlags::OUTPUT, "output"),
        (LineFlags::ACTIVE_LOW, "active-low"),
        (LineFlags::OPEN_DRAIN, "open-drain"),
        (LineFlags::OPEN_SOURCE, "open-source"),
        (LineFlags::BIAS_PULL_UP, "pull-up"),
        (LineFlags::BIAS_PULL_DOWN, "pull-down"),
        (LineFlags::BIAS_DISABLED, "bias-disabled"),
        (LineFlags::EVENT_CLOCK_REALTIME, "clock-realtime"),
    ];
    let mut names: Vec<String> = NAMES
        .iter()
        .filter(|(f, _)| li.flags.contains(*f))
        .map(|(_, n)| n.to_string())
        .collect();
    if li.flags.contains(LineFlags::EDGE_RISING | LineFlags::EDGE_FALLING) {
        names.push("both-edges".into());
    } else if li.flags.contains(LineFlags::EDGE_RISING) {
        names.push("rising-edges".into());
    } else if li.flags.contains(LineFlags::EDGE_FALLING) {
        names.push("falling-edges".into());
    }
    if let Some(period) = li.debounce_period() {
        names.push(format!("debounce_period={}usec", period.as_micros()));
    }
    names
}

// Format bits, one per line, lowest offset first, as "[1, 0, ...]".
pub fn format_bits(bits: u64, num_lines: usize) -> String {
    let v: Vec<&str> = (0..num_lines)
        .map(|i| if bits & (1 << i) != 0 { "1" } else { "0" })
        .collect();
    format!("[{}]", v.join(", "))
}

pub fn format_offsets(offsets: &[Offset]) -> String {
    let v: Vec<String> = offsets.iter().map(|o| o.to_string()).collect();
    format!("[{}]", v.join(", "))
}
