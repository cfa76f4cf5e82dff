// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// The kernel structs of <linux/gpio.h>, laid out by the compiler.

use super::NUM_ATTRS_MAX;
use crate::common::{LINES_MAX, NAME_MAX};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

#[derive(AsBytes, Clone, Copy, FromBytes, FromZeroes)]
#[repr(C)]
pub struct ChipInfo {
    pub name: [u8; NAME_MAX],
    pub label: [u8; NAME_MAX],
    pub lines: u32,
}

#[derive(AsBytes, Clone, Copy, FromBytes, FromZeroes)]
#[repr(C)]
pub struct LineValues {
    pub bits: u64,
    pub mask: u64,
}

// The union of flags, values and debounce_period_us is carried as its
// 64-bit storage.
#[derive(AsBytes, Clone, Copy, FromBytes, FromZeroes)]
#[repr(C)]
pub struct LineAttribute {
    pub id: u32,
    pub padding: u32,
    pub value: u64,
}

#[derive(AsBytes, Clone, Copy, FromBytes, FromZeroes)]
#[repr(C)]
pub struct LineConfigAttribute {
    pub attr: LineAttribute,
    pub mask: u64,
}

#[derive(AsBytes, Clone, Copy, FromBytes, FromZeroes)]
#[repr(C)]
pub struct LineConfig {
    pub flags: u64,
    pub num_attrs: u32,
    pub padding: [u32; 5],
    pub attrs: [LineConfigAttribute; NUM_ATTRS_MAX],
}

#[derive(AsBytes, Clone, Copy, FromBytes, FromZeroes)]
#[repr(C)]
pub struct LineRequest {
    pub offsets: [u32; LINES_MAX],
    pub consumer: [u8; NAME_MAX],
    pub config: LineConfig,
    pub num_lines: u32,
    pub event_buffer_size: u32,
    pub padding: [u32; 5],
    pub fd: i32,
}

#[derive(AsBytes, Clone, Copy, FromBytes, FromZeroes)]
#[repr(C)]
pub struct LineInfo {
    pub name: [u8; NAME_MAX],
    pub consumer: [u8; NAME_MAX],
    pub offset: u32,
    pub num_attrs: u32,
    pub flags: u64,
    pub attrs: [LineAttribute; NUM_ATTRS_MAX],
    pub padding: [u32; 4],
}

#[derive(AsBytes, Clone, Copy, FromBytes, FromZeroes)]
#[repr(C)]
pub struct LineInfoChanged {
    pub info: LineInfo,
    pub timestamp_ns: u64,
    pub event_type: u32,
    pub padding: [u32; 5],
}

#[derive(AsBytes, Clone, Copy, FromBytes, FromZeroes)]
#[repr(C)]
pub struct LineEvent {
    pub timestamp_ns: u64,
    pub id: u32,
    pub offset: u32,
    pub seqno: u32,
    pub line_seqno: u32,
    pub padding: [u32; 6],
}

static_assertions::assert_eq_size!(ChipInfo, [u8; 68]);
static_assertions::assert_eq_size!(LineValues, [u8; 16]);
static_assertions::assert_eq_size!(LineAttribute, [u8; 16]);
static_assertions::assert_eq_size!(LineConfigAttribute, [u8; 24]);
static_assertions::assert_eq_size!(LineConfig, [u8; 272]);
static_assertions::assert_eq_size!(LineRequest, [u8; 592]);
static_assertions::assert_eq_size!(LineInfo, [u8; 256]);
static_assertions::assert_eq_size!(LineInfoChanged, [u8; 288]);
static_assertions::assert_eq_size!(LineEvent, [u8; 48]);
