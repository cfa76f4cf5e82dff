// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::codec::{Mirror, Record};
use crate::ioctl::{self, Ioctl};
use bitflags::bitflags;
use std::fs::File;
use std::os::unix::prelude::FromRawFd;
use std::str::FromStr;
use std::time::Duration;
use zerocopy::{AsBytes, FromZeroes};

mod raw;

// common to all records.
pub use super::common::*;

bitflags! {
    /// Flags indicating the configuration of a line.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct LineFlags: u64 {
        /// The line is in use and is not available for request.
        const USED = 1;

        /// The line active state corresponds to a physical low.
        const ACTIVE_LOW = 2;

        /// The line is an input.
        const INPUT = 4;

        /// The line is an output.
        const OUTPUT = 8;

        /// The line detects rising (*inactive* to *active*) edges.
        const EDGE_RISING = 16;

        /// The line detects falling (*active* to *inactive*) edges.
        const EDGE_FALLING = 32;

        /// The line is an open drain output.
        const OPEN_DRAIN = 64;

        /// The line is an open source output.
        const OPEN_SOURCE = 128;

        /// The line has pull-up bias enabled.
        const BIAS_PULL_UP = 256;

        /// The line has pull-down bias enabled.
        const BIAS_PULL_DOWN = 512;

        /// The line has bias disabled.
        const BIAS_DISABLED = 1024;

        /// The line events contain **CLOCK_REALTIME** timestamps.
        const EVENT_CLOCK_REALTIME = 2048;

        /// The line events contain **HTE** timestamps.
        const EVENT_CLOCK_HTE = 4096;
    }
}

impl LineFlags {
    fn decode(field: &str, v: u64) -> std::result::Result<LineFlags, ValidationError> {
        LineFlags::from_bits(v).ok_or_else(|| {
            ValidationError::new(
                field,
                format!("unknown bits: {:#x}", v & !LineFlags::all().bits()),
            )
        })
    }
}

/// Information about a particular GPIO chip.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChipInfo {
    /// The Linux kernel name of this GPIO chip.
    pub name: Name,

    /// A functional name for this GPIO chip, such as a product number.
    ///
    /// May be empty.
    pub label: Name,

    /// The number of GPIO lines on this chip.
    pub num_lines: u32,
}

impl Mirror for ChipInfo {
    const RECORD: &'static str = "ChipInfo";
    type Raw = raw::ChipInfo;

    fn to_raw(&self) -> raw::ChipInfo {
        raw::ChipInfo {
            name: *self.name.as_field(),
            label: *self.label.as_field(),
            lines: self.num_lines,
        }
    }

    fn from_raw(raw: &raw::ChipInfo) -> Result<Self> {
        Ok(ChipInfo {
            name: Name::from_field(&raw.name),
            label: Name::from_field(&raw.label),
            num_lines: raw.lines,
        })
    }
}

/// Get the publicly available information for a chip.
///
/// * `cf` - The open gpiochip device file.
pub fn get_chip_info(cf: &File) -> Result<ChipInfo> {
    let mut raw = raw::ChipInfo::new_zeroed();
    ioctl::call(cf, Ioctl::GetChipInfo, raw.as_bytes_mut())?;
    ChipInfo::from_raw(&raw)
}

/// A mask selecting the first `num_lines` lines of a request.
#[inline]
pub fn lines_mask(num_lines: usize) -> u64 {
    if num_lines >= LINES_MAX {
        u64::MAX
    } else {
        (1 << num_lines) - 1
    }
}

/// Values of GPIO lines.
///
/// Bits in the bitmaps correspond to the index into [`LineRequest.offsets`].
/// The first requested line, `offsets[0]`, is bit 0.
///
/// [`LineRequest.offsets`]: struct@LineRequest
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct LineValues {
    /// The value of the lines, set to 1 for *active* and 0 for *inactive*.
    pub bits: u64,

    /// The lines in a request to access, set to 1 to access and 0 to ignore.
    pub mask: u64,
}

impl LineValues {
    /// Create values from a slice.
    ///
    /// The values are in the same order as [`LineRequest.offsets`].
    ///
    /// [`LineRequest.offsets`]: struct@LineRequest
    pub fn from_slice(s: &[bool]) -> Self {
        let mut lv: LineValues = Default::default();
        lv.copy_from_slice(s);
        lv
    }

    /// Copy values from a slice - in order of requested offsets.
    pub fn copy_from_slice(&mut self, s: &[bool]) {
        for (i, v) in s.iter().enumerate().take(LINES_MAX) {
            self.set(i, *v);
        }
    }

    /// Values selecting all the lines in a request, such as for reading them all.
    pub fn all(num_lines: usize) -> Self {
        LineValues {
            bits: 0,
            mask: lines_mask(num_lines),
        }
    }

    /// Values that set every line in a request.
    ///
    /// Bits beyond `num_lines` are discarded, so `!bits` may be used to invert.
    pub fn with_all(num_lines: usize, bits: u64) -> Self {
        let mask = lines_mask(num_lines);
        LineValues {
            bits: bits & mask,
            mask,
        }
    }

    /// Values that set the lines in `bits` *active*, leaving all other lines untouched.
    pub fn activating(bits: u64) -> Self {
        LineValues { bits, mask: bits }
    }

    /// Values that set the lines NOT in `keep` *inactive*, leaving the lines in `keep` untouched.
    pub fn deactivating(keep: u64) -> Self {
        LineValues {
            bits: 0,
            mask: !keep,
        }
    }

    /// Return the value of a line.
    ///
    /// Note that the [`LineValues`] need to be populated via a call to [`get_line_values`]
    /// to get values from the underlying hardware.
    ///
    /// Returns None if the line of interest is not set in the mask.
    ///
    /// * `idx` - The index into the [`LineRequest.offsets`] for the line of interest.
    ///
    /// [`LineRequest.offsets`]: struct@LineRequest
    #[inline]
    pub fn get(&self, idx: usize) -> Option<bool> {
        debug_assert!(idx < LINES_MAX);
        let mask = 0x01 << idx;
        if self.mask & mask == 0 {
            return None;
        }
        Some(self.bits & mask != 0)
    }

    /// Set the value of a line.
    ///
    /// Note that the values are not applied to hardware until passed to [`set_line_values`].
    ///
    /// * `idx` - The index into the [`LineRequest.offsets`] for the line of interest.
    /// * `active` - The logical state of the line to be set.
    ///
    /// [`LineRequest.offsets`]: struct@LineRequest
    #[inline]
    pub fn set(&mut self, idx: usize, active: bool) {
        debug_assert!(idx < LINES_MAX);
        let mask = 0x01 << idx;
        self.mask |= mask;
        if active {
            self.bits |= mask;
        } else {
            self.bits &= !mask;
        }
    }

    /// Clear the mask bit for a line.
    ///
    /// The line will be ignored in subsequent calls to [`get_line_values`] and
    /// [`set_line_values`].
    ///
    /// * `idx` - The index into the [`LineRequest.offsets`] for the line of interest.
    ///
    /// [`LineRequest.offsets`]: struct@LineRequest
    #[inline]
    pub fn unset_mask(&mut self, idx: usize) {
        debug_assert!(idx < LINES_MAX);
        let mask = 0x01 << idx;
        self.mask &= !mask;
    }
}

impl Mirror for LineValues {
    const RECORD: &'static str = "LineValues";
    type Raw = raw::LineValues;

    fn to_raw(&self) -> raw::LineValues {
        raw::LineValues {
            bits: self.bits,
            mask: self.mask,
        }
    }

    fn from_raw(raw: &raw::LineValues) -> Result<Self> {
        Ok(LineValues {
            bits: raw.bits,
            mask: raw.mask,
        })
    }
}

/// Read values of requested lines.
///
/// Only the lines selected by `lv.mask` are read.
/// The kernel clears the bits of any lines not selected.
///
/// * `lf` - The request file returned by [`get_line`].
/// * `lv` - The line values to be populated.
#[inline]
pub fn get_line_values(lf: &File, lv: &mut LineValues) -> Result<()> {
    let mut raw = lv.to_raw();
    ioctl::call(lf, Ioctl::GetLineValues, raw.as_bytes_mut())?;
    *lv = LineValues::from_raw(&raw)?;
    Ok(())
}

/// Set values of requested output lines.
///
/// Note that requesting a set on an input line is an error.
///
/// * `lf` - The request file returned by [`get_line`].
/// * `lv` - The line values to be set.
#[inline]
pub fn set_line_values(lf: &File, lv: &LineValues) -> Result<()> {
    let mut raw = lv.to_raw();
    ioctl::call(lf, Ioctl::SetLineValues, raw.as_bytes_mut())
}

// There are two ways to change output values.
//
// A read-modify-write, via modify_line_values, reads every line and writes
// every line back. It costs two ioctls and is not atomic with respect to other
// writers of the request, but the closure sees the current values.
//
// A write-only update, via set_all_line_values, activate_line_values or
// deactivate_line_values, is a single ioctl. The lines outside the mask are
// untouched by the kernel, so no read is needed to preserve them.

/// Read the values of all the lines in a request.
///
/// * `lf` - The request file returned by [`get_line`].
/// * `num_lines` - The number of lines in the request.
pub fn get_all_line_values(lf: &File, num_lines: usize) -> Result<u64> {
    let mut lv = LineValues::all(num_lines);
    get_line_values(lf, &mut lv)?;
    Ok(lv.bits)
}

/// Set the values of all the lines in a request, without reading them.
///
/// * `lf` - The request file returned by [`get_line`].
/// * `num_lines` - The number of lines in the request.
/// * `bits` - The values, bit 0 being the first requested line.
pub fn set_all_line_values(lf: &File, num_lines: usize, bits: u64) -> Result<()> {
    set_line_values(lf, &LineValues::with_all(num_lines, bits))
}

/// Read the values of all lines, transform them, and write them all back.
///
/// Returns the values written.
///
/// * `lf` - The request file returned by [`get_line`].
/// * `num_lines` - The number of lines in the request.
/// * `f` - Maps the current values to the new values.
pub fn modify_line_values<F>(lf: &File, num_lines: usize, f: F) -> Result<u64>
where
    F: FnOnce(u64) -> u64,
{
    let bits = f(get_all_line_values(lf, num_lines)?);
    let lv = LineValues::with_all(num_lines, bits);
    set_line_values(lf, &lv)?;
    Ok(lv.bits)
}

/// Set the lines in `bits` *active*, without reading or altering any other line.
pub fn activate_line_values(lf: &File, bits: u64) -> Result<()> {
    set_line_values(lf, &LineValues::activating(bits))
}

/// Set the lines not in `keep` *inactive*, without reading or altering the lines in `keep`.
pub fn deactivate_line_values(lf: &File, keep: u64) -> Result<()> {
    set_line_values(lf, &LineValues::deactivating(keep))
}

/// An identifier for which interpretation of a [`LineAttribute`] value is in use.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LineAttributeKind {
    /// The value is line flags.
    Flags = 1,

    /// The value is line output values.
    OutputValues = 2,

    /// The value is a debounce period in microseconds.
    Debounce = 3,
}

impl TryFrom<u32> for LineAttributeKind {
    type Error = String;

    fn try_from(v: u32) -> std::result::Result<Self, Self::Error> {
        use LineAttributeKind::*;
        Ok(match v {
            x if x == Flags as u32 => Flags,
            x if x == OutputValues as u32 => OutputValues,
            x if x == Debounce as u32 => Debounce,
            x => return Err(format!("invalid value: {x}")),
        })
    }
}

/// A configurable attribute of a line.
///
/// The variant selects the interpretation of the single 64-bit value
/// the kernel stores for the attribute.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LineAttribute {
    /// The line configuration flags.
    Flags(LineFlags),

    /// The values to which the lines will be set, with each bit number
    /// corresponding to the index into [`LineRequest.offsets`].
    ///
    /// [`LineRequest.offsets`]: struct@LineRequest
    OutputValues(u64),

    /// The debounce period, in microseconds.
    Debounce(u32),
}

impl Default for LineAttribute {
    fn default() -> Self {
        LineAttribute::Flags(LineFlags::empty())
    }
}

impl LineAttribute {
    /// The kind of attribute, as identified to the kernel.
    pub fn kind(&self) -> LineAttributeKind {
        match self {
            LineAttribute::Flags(_) => LineAttributeKind::Flags,
            LineAttribute::OutputValues(_) => LineAttributeKind::OutputValues,
            LineAttribute::Debounce(_) => LineAttributeKind::Debounce,
        }
    }

    /// The debounce period, if this is a debounce attribute.
    pub fn debounce_period(&self) -> Option<Duration> {
        match self {
            LineAttribute::Debounce(us) => Some(Duration::from_micros(*us as u64)),
            _ => None,
        }
    }

    /// The flags, if this is a flags attribute.
    pub fn flags(&self) -> Option<LineFlags> {
        match self {
            LineAttribute::Flags(flags) => Some(*flags),
            _ => None,
        }
    }

    /// The output values, if this is an output values attribute.
    pub fn output_values(&self) -> Option<u64> {
        match self {
            LineAttribute::OutputValues(values) => Some(*values),
            _ => None,
        }
    }
}

// The debounce period overlays the first word of the union.
fn debounce_to_union(us: u32) -> u64 {
    let mut b = [0; 8];
    b[..4].copy_from_slice(&us.to_ne_bytes());
    u64::from_ne_bytes(b)
}

fn debounce_from_union(value: u64) -> u32 {
    let b = value.to_ne_bytes();
    u32::from_ne_bytes([b[0], b[1], b[2], b[3]])
}

impl Mirror for LineAttribute {
    const RECORD: &'static str = "LineAttribute";
    type Raw = raw::LineAttribute;

    fn to_raw(&self) -> raw::LineAttribute {
        let value = match self {
            LineAttribute::Flags(flags) => flags.bits(),
            LineAttribute::OutputValues(values) => *values,
            LineAttribute::Debounce(us) => debounce_to_union(*us),
        };
        raw::LineAttribute {
            id: self.kind() as u32,
            padding: 0,
            value,
        }
    }

    fn from_raw(raw: &raw::LineAttribute) -> Result<Self> {
        let kind =
            LineAttributeKind::try_from(raw.id).map_err(|e| ValidationError::new("id", e))?;
        Ok(match kind {
            LineAttributeKind::Flags => {
                LineAttribute::Flags(LineFlags::decode("flags", raw.value)?)
            }
            LineAttributeKind::OutputValues => LineAttribute::OutputValues(raw.value),
            LineAttributeKind::Debounce => {
                LineAttribute::Debounce(debounce_from_union(raw.value))
            }
        })
    }
}

/// A configuration attribute associated with one or more of the requested lines.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct LineConfigAttribute {
    /// The configurable attribute.
    pub attr: LineAttribute,

    /// The lines to which the attribute applies, with each bit number corresponding
    /// to the index into [`LineRequest.offsets`].
    ///
    /// [`LineRequest.offsets`]: struct@LineRequest
    pub mask: u64,
}

impl Mirror for LineConfigAttribute {
    const RECORD: &'static str = "LineConfigAttribute";
    type Raw = raw::LineConfigAttribute;

    fn to_raw(&self) -> raw::LineConfigAttribute {
        raw::LineConfigAttribute {
            attr: self.attr.to_raw(),
            mask: self.mask,
        }
    }

    fn from_raw(raw: &raw::LineConfigAttribute) -> Result<Self> {
        Ok(LineConfigAttribute {
            attr: LineAttribute::from_raw(&raw.attr)?,
            mask: raw.mask,
        })
    }
}

/// The capacity of the attribute arrays in [`LineConfig`] and [`LineInfo`].
pub const NUM_ATTRS_MAX: usize = 10;

/// The set of additional configuration attributes for a line request.
///
/// Any attribute should only be associated with a particular line once.
/// If an attribute is associated with a line multiple times then the
/// first occurrence (i.e. lowest index) has precedence.
pub type LineConfigAttributes = Slots<LineConfigAttribute, NUM_ATTRS_MAX>;

/// Configuration for a set of requested lines.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineConfig {
    /// Flags for the GPIO lines.  This is the default for all requested lines but
    /// may be overridden for particular lines using `attrs`.
    pub flags: LineFlags,

    /// The configuration attributes associated with the requested lines.
    pub attrs: LineConfigAttributes,
}

impl LineConfig {
    /// The nth attribute in the attrs
    #[inline]
    pub fn attr(&self, idx: usize) -> &LineConfigAttribute {
        &self.attrs[idx]
    }

    /// The number of attributes in use.
    #[inline]
    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }

    /// Add a debounce attribute to the config.
    pub fn add_debounce(&mut self, period_us: u32, mask: u64) -> Result<()> {
        self.attrs.push(LineConfigAttribute {
            attr: LineAttribute::Debounce(period_us),
            mask,
        })
    }

    /// Add a flags attribute to the config.
    pub fn add_flags(&mut self, flags: LineFlags, mask: u64) -> Result<()> {
        self.attrs.push(LineConfigAttribute {
            attr: LineAttribute::Flags(flags),
            mask,
        })
    }

    /// Add an output values attribute to the config.
    pub fn add_output_values(&mut self, values: &LineValues) -> Result<()> {
        self.attrs.push(LineConfigAttribute {
            attr: LineAttribute::OutputValues(values.bits),
            mask: values.mask,
        })
    }

    /// The first attribute of the given kind that applies to a line.
    ///
    /// * `idx` - The index into the [`LineRequest.offsets`] for the line of interest.
    ///
    /// [`LineRequest.offsets`]: struct@LineRequest
    pub fn line_attr(&self, idx: usize, kind: LineAttributeKind) -> Option<&LineAttribute> {
        let mask = 0x01 << idx;
        self.attrs
            .iter()
            .find(|lca| lca.mask & mask != 0 && lca.attr.kind() == kind)
            .map(|lca| &lca.attr)
    }

    /// The effective flags for a line, accounting for any flags attribute.
    pub fn line_flags(&self, idx: usize) -> LineFlags {
        self.line_attr(idx, LineAttributeKind::Flags)
            .and_then(LineAttribute::flags)
            .unwrap_or(self.flags)
    }
}

impl Mirror for LineConfig {
    const RECORD: &'static str = "LineConfig";
    type Raw = raw::LineConfig;

    fn to_raw(&self) -> raw::LineConfig {
        let mut raw = raw::LineConfig::new_zeroed();
        raw.flags = self.flags.bits();
        raw.num_attrs = self.attrs.len() as u32;
        for (dst, lca) in raw.attrs.iter_mut().zip(self.attrs.iter()) {
            *dst = lca.to_raw();
        }
        raw
    }

    fn from_raw(raw: &raw::LineConfig) -> Result<Self> {
        let flags = LineFlags::decode("flags", raw.flags)?;
        let num_attrs = raw.num_attrs;
        if num_attrs as usize > NUM_ATTRS_MAX {
            let e = ValidationError::new("num_attrs", format!("out of range: {num_attrs}"));
            return Err(e.into());
        }
        let mut attrs = LineConfigAttributes::new();
        for (i, lca) in raw.attrs[..num_attrs as usize].iter().enumerate() {
            let lca = LineConfigAttribute::from_raw(lca)
                .map_err(|e| prefix_field(e, &format!("attrs[{i}]")))?;
            attrs.push(lca)?;
        }
        Ok(LineConfig { flags, attrs })
    }
}

// Qualify the field of a validation error with the containing array slot.
fn prefix_field(e: Error, prefix: &str) -> Error {
    match e {
        Error::MalformedBuffer(MalformedBuffer::Invalid(ve)) => {
            ValidationError::new(format!("{prefix}.{}", ve.field), ve.msg).into()
        }
        e => e,
    }
}

/// Update the configuration of an existing line request.
///
/// * `lf` - The request file returned by [`get_line`].
/// * `lc` - The configuration to be applied.
#[inline]
pub fn set_line_config(lf: &File, lc: &LineConfig) -> Result<()> {
    let mut raw = lc.to_raw();
    ioctl::call(lf, Ioctl::SetLineConfig, raw.as_bytes_mut())
}

/// Information about a request for GPIO lines.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineRequest {
    /// The requested lines, identified by offset on the associated GPIO chip.
    ///
    /// The number of lines requested is the number of offsets.
    pub offsets: Offsets,

    /// The requested consumer label for the selected GPIO lines such as
    /// "*my-bitbanged-relay*".
    pub consumer: Name,

    /// The requested configuration for the lines.
    pub config: LineConfig,

    /// A suggested minimum number of line events that the kernel should buffer.
    ///
    /// This is only relevant if edge detection is enabled in the configuration.
    ///
    /// Note that this is only a suggested value and the kernel may allocate a
    /// larger buffer or cap the size of the buffer.
    /// If this field is zero then the buffer size defaults to a minimum of `num_lines*16`.
    pub event_buffer_size: u32,

    /// The file descriptor for the request, as returned by the kernel.
    ///
    /// Only meaningful in a record decoded after a successful request.
    #[doc(hidden)]
    pub fd: i32,
}

impl LineRequest {
    /// Create a request for the given lines.
    ///
    /// Fails if there are more than [`LINES_MAX`] offsets or the consumer
    /// exceeds [`NAME_MAX`] bytes.
    pub fn new(offsets: &[Offset], consumer: &str, config: LineConfig) -> Result<Self> {
        Ok(LineRequest {
            offsets: Offsets::from_slice(offsets)?,
            consumer: Name::from_str(consumer)?,
            config,
            ..Default::default()
        })
    }

    /// The number of lines requested.
    #[inline]
    pub fn num_lines(&self) -> usize {
        self.offsets.len()
    }
}

impl Mirror for LineRequest {
    const RECORD: &'static str = "LineRequest";
    type Raw = raw::LineRequest;

    fn to_raw(&self) -> raw::LineRequest {
        let mut raw = raw::LineRequest::new_zeroed();
        raw.offsets[..self.offsets.len()].copy_from_slice(&self.offsets);
        raw.consumer = *self.consumer.as_field();
        raw.config = self.config.to_raw();
        raw.num_lines = self.offsets.len() as u32;
        raw.event_buffer_size = self.event_buffer_size;
        raw.fd = self.fd;
        raw
    }

    fn from_raw(raw: &raw::LineRequest) -> Result<Self> {
        let num_lines = raw.num_lines;
        if num_lines as usize > LINES_MAX {
            let e = ValidationError::new("num_lines", format!("out of range: {num_lines}"));
            return Err(e.into());
        }
        Ok(LineRequest {
            offsets: Offsets::from_slice(&raw.offsets[..num_lines as usize])?,
            consumer: Name::from_field(&raw.consumer),
            config: LineConfig::from_raw(&raw.config).map_err(|e| prefix_field(e, "config"))?,
            event_buffer_size: raw.event_buffer_size,
            fd: raw.fd,
        })
    }
}

/// Request a line or set of lines for exclusive access.
///
/// Returns the file for the request, which is used to access the lines.
///
/// * `cf` - The open gpiochip device file.
/// * `lr` - The line request.
pub fn get_line(cf: &File, lr: &LineRequest) -> Result<File> {
    let mut raw = lr.to_raw();
    ioctl::call(cf, Ioctl::GetLine, raw.as_bytes_mut())?;
    let fd = raw.fd;
    // SAFETY: the kernel has returned a new descriptor which nothing else owns.
    Ok(unsafe { File::from_raw_fd(fd) })
}

/// The set of potential configuration attributes for a line.
pub type LineAttributes = Slots<LineAttribute, NUM_ATTRS_MAX>;

/// Information about a certain GPIO line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineInfo {
    /// The name of this GPIO line, such as the output pin of the line on the chip,
    /// a rail or a pin header name on a board, as specified by the GPIO chip.
    ///
    /// May be empty.
    pub name: Name,

    /// A functional name for the consumer of this GPIO line as set by whatever is using it.
    ///
    /// Will be empty if there is no current user.
    /// May also be empty if the consumer requests doesn't set this up.
    pub consumer: Name,

    /// The local offset on this GPIO chip.
    pub offset: Offset,

    /// The configuration flags for this GPIO line.
    pub flags: LineFlags,

    /// Additional configuration attributes associated with the line.
    pub attrs: LineAttributes,
}

impl LineInfo {
    /// The nth attribute in the attrs
    #[inline]
    pub fn attr(&self, idx: usize) -> &LineAttribute {
        &self.attrs[idx]
    }

    /// The number of attributes in use.
    #[inline]
    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }

    /// The debounce period of the line, if debounced.
    pub fn debounce_period(&self) -> Option<Duration> {
        self.attrs.iter().find_map(LineAttribute::debounce_period)
    }
}

impl Mirror for LineInfo {
    const RECORD: &'static str = "LineInfo";
    type Raw = raw::LineInfo;

    fn to_raw(&self) -> raw::LineInfo {
        let mut raw = raw::LineInfo::new_zeroed();
        raw.name = *self.name.as_field();
        raw.consumer = *self.consumer.as_field();
        raw.offset = self.offset;
        raw.num_attrs = self.attrs.len() as u32;
        raw.flags = self.flags.bits();
        for (dst, attr) in raw.attrs.iter_mut().zip(self.attrs.iter()) {
            *dst = attr.to_raw();
        }
        raw
    }

    fn from_raw(raw: &raw::LineInfo) -> Result<Self> {
        let num_attrs = raw.num_attrs;
        if num_attrs as usize > NUM_ATTRS_MAX {
            let e = ValidationError::new("num_attrs", format!("out of range: {num_attrs}"));
            return Err(e.into());
        }
        let mut attrs = LineAttributes::new();
        for (i, attr) in raw.attrs[..num_attrs as usize].iter().enumerate() {
            let attr = LineAttribute::from_raw(attr)
                .map_err(|e| prefix_field(e, &format!("attrs[{i}]")))?;
            attrs.push(attr)?;
        }
        Ok(LineInfo {
            name: Name::from_field(&raw.name),
            consumer: Name::from_field(&raw.consumer),
            offset: raw.offset,
            flags: LineFlags::decode("flags", raw.flags)?,
            attrs,
        })
    }
}

/// Get the publicly available information for a line.
///
/// This does not include the line value.
/// The line must be requested to access the value.
///
/// * `cf` - The open gpiochip device file.
/// * `offset` - The offset of the line.
#[inline]
pub fn get_line_info(cf: &File, offset: Offset) -> Result<LineInfo> {
    line_info_ioctl(cf, Ioctl::GetLineInfo, offset)
}

/// Add a watch on changes to the [`LineInfo`] for a line.
///
/// Returns the current state of that information.
/// Changes are subsequently read from the chip file as [`LineInfoChangeEvent`]s.
///
/// * `cf` - The open gpiochip device file.
/// * `offset` - The offset of the line to watch.
#[inline]
pub fn watch_line_info(cf: &File, offset: Offset) -> Result<LineInfo> {
    line_info_ioctl(cf, Ioctl::WatchLineInfo, offset)
}

fn line_info_ioctl(cf: &File, ioc: Ioctl, offset: Offset) -> Result<LineInfo> {
    let mut raw = raw::LineInfo::new_zeroed();
    raw.offset = offset;
    ioctl::call(cf, ioc, raw.as_bytes_mut())?;
    LineInfo::from_raw(&raw)
}

/// Remove any watch on changes to the [`LineInfo`] for a line.
///
/// * `cf` - The open gpiochip device file.
/// * `offset` - The offset of the line to unwatch.
pub fn unwatch_line_info(cf: &File, offset: Offset) -> Result<()> {
    let mut buf = offset.to_ne_bytes();
    ioctl::call(cf, Ioctl::UnwatchLineInfo, &mut buf)
}

/// An event indicating a change to the info for a line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineInfoChangeEvent {
    /// The new line info.
    pub info: LineInfo,

    /// The best estimate of time of event occurrence, in nanoseconds.
    pub timestamp_ns: u64,

    /// The trigger for the change.
    pub kind: InfoChangeKind,
}

impl Mirror for LineInfoChangeEvent {
    const RECORD: &'static str = "LineInfoChangeEvent";
    type Raw = raw::LineInfoChanged;

    fn to_raw(&self) -> raw::LineInfoChanged {
        raw::LineInfoChanged {
            info: self.info.to_raw(),
            timestamp_ns: self.timestamp_ns,
            event_type: self.kind as u32,
            padding: [0; 5],
        }
    }

    fn from_raw(raw: &raw::LineInfoChanged) -> Result<Self> {
        let kind = InfoChangeKind::try_from(raw.event_type)
            .map_err(|e| ValidationError::new("kind", e))?;
        Ok(LineInfoChangeEvent {
            info: LineInfo::from_raw(&raw.info).map_err(|e| prefix_field(e, "info"))?,
            timestamp_ns: raw.timestamp_ns,
            kind,
        })
    }
}

/// Information about an edge event on a requested line.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LineEdgeEvent {
    /// The best estimate of time of event occurrence, in nanoseconds.
    ///
    /// By default the timestamp is read from **CLOCK_MONOTONIC** and is
    /// intended to allow the accurate measurement of the time between events.
    /// It does not provide the wall-clock time.
    ///
    /// If the [`LineFlags::EVENT_CLOCK_REALTIME`] flag is set then the
    /// timestamp is read from **CLOCK_REALTIME**.
    pub timestamp_ns: u64,

    /// The event trigger identifier.
    pub kind: LineEdgeEventKind,

    /// The offset of the line that triggered the event.
    pub offset: Offset,

    /// The sequence number for this event in the sequence of events for all
    /// the lines in this line request.
    pub seqno: u32,

    /// The sequence number for this event in the sequence of events on this
    /// particular line.
    pub line_seqno: u32,
}

impl Mirror for LineEdgeEvent {
    const RECORD: &'static str = "LineEdgeEvent";
    type Raw = raw::LineEvent;

    fn to_raw(&self) -> raw::LineEvent {
        raw::LineEvent {
            timestamp_ns: self.timestamp_ns,
            id: self.kind as u32,
            offset: self.offset,
            seqno: self.seqno,
            line_seqno: self.line_seqno,
            padding: [0; 6],
        }
    }

    fn from_raw(raw: &raw::LineEvent) -> Result<Self> {
        let kind =
            LineEdgeEventKind::try_from(raw.id).map_err(|e| ValidationError::new("kind", e))?;
        Ok(LineEdgeEvent {
            timestamp_ns: raw.timestamp_ns,
            kind,
            offset: raw.offset,
            seqno: raw.seqno,
            line_seqno: raw.line_seqno,
        })
    }
}
