// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction of line configurations from per-line settings, and checks
//! that lines are configured as expected before they are requested.

use crate::v2::{
    get_line, get_line_info, Error, LineConfig, LineFlags, LineInfo, LineRequest, LineValues,
    Offset, Result, LINES_MAX,
};
use bitflags::bitflags;
use std::fs::File;
use std::time::Duration;

/// A builder of [`LineConfig`] for a set of requested lines.
///
/// Lines are identified by their index into the [`LineRequest.offsets`].
/// Settings applied to individual lines take precedence over the base flags.
///
/// Lines sharing the same per-line flags, or the same debounce period,
/// share a single attribute in the resulting configuration.
///
/// [`LineRequest.offsets`]: struct@LineRequest
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineConfigBuilder {
    num_lines: usize,
    flags: LineFlags,
    line_flags: Vec<Option<LineFlags>>,
    values: Vec<Option<bool>>,
    debounce_us: Vec<Option<u32>>,
}

impl LineConfigBuilder {
    /// Create a builder for a request of `num_lines` lines.
    pub fn new(num_lines: usize) -> Result<Self> {
        if num_lines > LINES_MAX {
            return Err(Error::CapacityExceeded {
                max: LINES_MAX,
                len: num_lines,
            });
        }
        Ok(LineConfigBuilder {
            num_lines,
            flags: LineFlags::empty(),
            line_flags: vec![None; num_lines],
            values: vec![None; num_lines],
            debounce_us: vec![None; num_lines],
        })
    }

    /// Set the flags applied to any line without per-line flags.
    pub fn with_flags(&mut self, flags: LineFlags) -> &mut Self {
        self.flags = flags;
        self
    }

    /// Set the flags for a particular line.
    pub fn with_line_flags(&mut self, idx: usize, flags: LineFlags) -> Result<&mut Self> {
        self.check_index(idx)?;
        self.line_flags[idx] = Some(flags);
        Ok(self)
    }

    /// Set the initial value of a particular output line.
    pub fn with_output_value(&mut self, idx: usize, active: bool) -> Result<&mut Self> {
        self.check_index(idx)?;
        self.values[idx] = Some(active);
        Ok(self)
    }

    /// Set the debounce period of a particular input line.
    ///
    /// The period is rounded up to the next microsecond.
    pub fn with_debounce_period(&mut self, idx: usize, period: Duration) -> Result<&mut Self> {
        self.check_index(idx)?;
        // periods beyond u32::MAX microseconds saturate
        let us = period
            .checked_add(Duration::from_nanos(999))
            .and_then(|p| u32::try_from(p.as_micros()).ok())
            .unwrap_or(u32::MAX);
        self.debounce_us[idx] = Some(us);
        Ok(self)
    }

    fn check_index(&self, idx: usize) -> Result<()> {
        if idx >= self.num_lines {
            return Err(Error::LineIndexOutOfRange {
                index: idx,
                num_lines: self.num_lines,
            });
        }
        Ok(())
    }

    /// The flags that will apply to a particular line.
    pub fn line_flags(&self, idx: usize) -> LineFlags {
        self.line_flags
            .get(idx)
            .copied()
            .flatten()
            .unwrap_or(self.flags)
    }

    /// Build the configuration.
    ///
    /// Attributes are ordered per-line flags, then output values, then debounce.
    /// Fails with [`Error::CapacityExceeded`] if the settings require more
    /// attributes than a [`LineConfig`] can hold.
    pub fn build(&self) -> Result<LineConfig> {
        let flags = group(&self.line_flags);
        let debounced = group(&self.debounce_us);
        let mut values = LineValues::default();
        for (idx, v) in self.values.iter().enumerate() {
            if let Some(active) = v {
                values.set(idx, *active);
            }
        }
        let num_attrs = flags.len() + debounced.len() + usize::from(values.mask != 0);
        if num_attrs > crate::v2::NUM_ATTRS_MAX {
            return Err(Error::CapacityExceeded {
                max: crate::v2::NUM_ATTRS_MAX,
                len: num_attrs,
            });
        }
        let mut lc = LineConfig {
            flags: self.flags,
            ..Default::default()
        };
        for (lflags, mask) in flags {
            lc.add_flags(lflags, mask)?;
        }
        if values.mask != 0 {
            lc.add_output_values(&values)?;
        }
        for (us, mask) in debounced {
            lc.add_debounce(us, mask)?;
        }
        Ok(lc)
    }
}

// Map distinct per-line settings to the mask of lines using them,
// in order of first use.
fn group<T: Copy + PartialEq>(settings: &[Option<T>]) -> Vec<(T, u64)> {
    let mut groups: Vec<(T, u64)> = Vec::new();
    for (idx, setting) in settings.iter().enumerate() {
        if let Some(v) = setting {
            match groups.iter().position(|(g, _)| g == v) {
                Some(i) => groups[i].1 |= 1 << idx,
                None => groups.push((*v, 1 << idx)),
            }
        }
    }
    groups
}

bitflags! {
    /// The groups of line flags expected to already be configured on a line
    /// prior to it being requested.
    ///
    /// Requesting a line that is not configured as the board intends can
    /// cause havoc, so a request may first check the lines it is about to take.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Expectation: u8 {
        /// The active level, i.e. [`LineFlags::ACTIVE_LOW`].
        const ACTIVE_LEVEL = 1;

        /// The direction, i.e. [`LineFlags::INPUT`] and [`LineFlags::OUTPUT`].
        const DIRECTION = 2;

        /// The edge detection, i.e. [`LineFlags::EDGE_RISING`] and [`LineFlags::EDGE_FALLING`].
        const EDGE = 4;

        /// The output drive, i.e. [`LineFlags::OPEN_DRAIN`] and [`LineFlags::OPEN_SOURCE`].
        const DRIVE = 8;

        /// The bias, i.e. the `BIAS_*` flags.
        const BIAS = 16;
    }
}

impl Expectation {
    /// The line flags covered by the expectation.
    pub fn mask(&self) -> LineFlags {
        let mut mask = LineFlags::empty();
        if self.contains(Expectation::ACTIVE_LEVEL) {
            mask |= LineFlags::ACTIVE_LOW;
        }
        if self.contains(Expectation::DIRECTION) {
            mask |= LineFlags::INPUT | LineFlags::OUTPUT;
        }
        if self.contains(Expectation::EDGE) {
            mask |= LineFlags::EDGE_RISING | LineFlags::EDGE_FALLING;
        }
        if self.contains(Expectation::DRIVE) {
            mask |= LineFlags::OPEN_DRAIN | LineFlags::OPEN_SOURCE;
        }
        if self.contains(Expectation::BIAS) {
            mask |= LineFlags::BIAS_PULL_UP | LineFlags::BIAS_PULL_DOWN | LineFlags::BIAS_DISABLED;
        }
        mask
    }
}

/// A line that is not configured as expected.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error(
    "line {offset} flags {:?} do not match expected {:?}",
    masked(.line_flags, .mask),
    masked(.requested, .mask)
)]
pub struct FlagMismatch {
    /// The offset of the line.
    pub offset: Offset,

    /// The current flags of the line.
    pub line_flags: LineFlags,

    /// The flags requested for the line.
    pub requested: LineFlags,

    /// The groups of flags that were expected to match.
    pub expectation: Expectation,

    /// The flags compared, as selected by the expectation.
    pub mask: LineFlags,
}

fn masked(flags: &LineFlags, mask: &LineFlags) -> LineFlags {
    *flags & *mask
}

/// Check that the current flags of a line match those requested, within the
/// groups selected by `expect`.
pub fn check_preconfigured(
    info: &LineInfo,
    requested: LineFlags,
    expect: Expectation,
) -> std::result::Result<(), FlagMismatch> {
    let mask = expect.mask();
    if info.flags & mask != requested & mask {
        return Err(FlagMismatch {
            offset: info.offset,
            line_flags: info.flags,
            requested,
            expectation: expect,
            mask,
        });
    }
    Ok(())
}

/// Check that the lines of a request are currently configured as the request
/// expects, with the expectation for each line provided by `expect`.
///
/// * `cf` - The open gpiochip device file.
/// * `lr` - The request to be checked.
/// * `expect` - Maps the index of a line in the request to its expectation.
pub fn verify_preconfigured<F>(cf: &File, lr: &LineRequest, expect: F) -> Result<()>
where
    F: Fn(usize) -> Expectation,
{
    for (idx, offset) in lr.offsets.iter().enumerate() {
        let expectation = expect(idx);
        if expectation.is_empty() {
            continue;
        }
        let info = get_line_info(cf, *offset)?;
        check_preconfigured(&info, lr.config.line_flags(idx), expectation)?;
    }
    Ok(())
}

/// Request lines after checking that all of them match the expectation.
///
/// * `cf` - The open gpiochip device file.
/// * `lr` - The line request.
/// * `expect` - The groups of flags that must match on every line.
pub fn get_line_preconfigured(cf: &File, lr: &LineRequest, expect: Expectation) -> Result<File> {
    verify_preconfigured(cf, lr, |_| expect)?;
    get_line(cf, lr)
}
