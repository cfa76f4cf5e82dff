// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derivation of the ioctl request codes for the GPIO uAPI.
//!
//! A request code packs, from low to high bits, the sequence number (8 bits),
//! the subsystem magic (8 bits), the payload size and the direction.
//! The widths of the size and direction fields, and the direction values,
//! depend on the architecture, as they do in the kernel.

use crate::codec::Record;
use crate::common::{Error, Result, IOCTL_MAGIC};
use crate::v2::{ChipInfo, LineConfig, LineInfo, LineRequest, LineValues};
use std::fmt;
use std::fs::File;
use std::os::unix::io::AsRawFd;

#[cfg(any(
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "sparc",
    target_arch = "sparc64"
))]
mod arch {
    pub const SIZE_BITS: u32 = 13;
    pub const DIR_BITS: u32 = 3;
    pub const NONE: u32 = 1;
    pub const READ: u32 = 2;
    pub const WRITE: u32 = 4;
}

#[cfg(not(any(
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "sparc",
    target_arch = "sparc64"
)))]
mod arch {
    pub const SIZE_BITS: u32 = 14;
    pub const DIR_BITS: u32 = 2;
    pub const NONE: u32 = 0;
    pub const READ: u32 = 2;
    pub const WRITE: u32 = 1;
}

const SEQ_BITS: u32 = 8;
const MAGIC_BITS: u32 = 8;
const SEQ_SHIFT: u32 = 0;
const MAGIC_SHIFT: u32 = SEQ_SHIFT + SEQ_BITS;
const SIZE_SHIFT: u32 = MAGIC_SHIFT + MAGIC_BITS;
const DIR_SHIFT: u32 = SIZE_SHIFT + arch::SIZE_BITS;

/// The largest payload that can be described by a request code.
pub const PAYLOAD_SIZE_MAX: usize = (1 << arch::SIZE_BITS) - 1;

/// The direction of the data transfer, from the perspective of userspace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// No payload.
    None,
    /// The kernel writes the payload, which userspace reads.
    Read,
    /// Userspace writes the payload, which the kernel reads.
    Write,
    /// The payload is both read and written by the kernel.
    ReadWrite,
}

impl Direction {
    /// The value of the direction field for this direction.
    pub const fn bits(self) -> u32 {
        match self {
            Direction::None => arch::NONE,
            Direction::Read => arch::READ,
            Direction::Write => arch::WRITE,
            Direction::ReadWrite => arch::READ | arch::WRITE,
        }
    }

    const fn from_bits(bits: u32) -> Option<Direction> {
        match bits {
            x if x == arch::NONE => Some(Direction::None),
            x if x == arch::READ => Some(Direction::Read),
            x if x == arch::WRITE => Some(Direction::Write),
            x if x == arch::READ | arch::WRITE => Some(Direction::ReadWrite),
            _ => None,
        }
    }
}

/// An encoded ioctl request code.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct RequestCode(pub u32);

impl RequestCode {
    /// Encode a request code.
    ///
    /// Panics if `size` does not fit in the size field, which for a const
    /// evaluation is a compile time error.
    pub const fn new(dir: Direction, magic: u8, seq: u8, size: usize) -> RequestCode {
        assert!(size <= PAYLOAD_SIZE_MAX, "ioctl payload too large");
        RequestCode(
            (dir.bits() << DIR_SHIFT)
                | ((size as u32) << SIZE_SHIFT)
                | ((magic as u32) << MAGIC_SHIFT)
                | ((seq as u32) << SEQ_SHIFT),
        )
    }

    /// The sequence number identifying the operation within the subsystem.
    pub const fn seq(self) -> u8 {
        (self.0 >> SEQ_SHIFT) as u8
    }

    /// The magic number identifying the subsystem.
    pub const fn magic(self) -> u8 {
        (self.0 >> MAGIC_SHIFT) as u8
    }

    /// The size of the payload.
    pub const fn size(self) -> usize {
        ((self.0 >> SIZE_SHIFT) & ((1 << arch::SIZE_BITS) - 1)) as usize
    }

    /// The direction of the transfer.
    pub const fn direction(self) -> Option<Direction> {
        Direction::from_bits((self.0 >> DIR_SHIFT) & ((1 << arch::DIR_BITS) - 1))
    }
}

impl fmt::Debug for RequestCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// The GPIO uAPI v2 operations performed via ioctl.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Ioctl {
    GetChipInfo = 0x01,
    GetLineInfo = 0x05,
    WatchLineInfo = 0x06,
    GetLine = 0x07,
    UnwatchLineInfo = 0x0C,
    SetLineConfig = 0x0D,
    GetLineValues = 0x0E,
    SetLineValues = 0x0F,
}

impl Ioctl {
    /// All the operations, in sequence order.
    pub const ALL: [Ioctl; 8] = [
        Ioctl::GetChipInfo,
        Ioctl::GetLineInfo,
        Ioctl::WatchLineInfo,
        Ioctl::GetLine,
        Ioctl::UnwatchLineInfo,
        Ioctl::SetLineConfig,
        Ioctl::GetLineValues,
        Ioctl::SetLineValues,
    ];

    /// The direction of the payload transfer.
    pub const fn direction(self) -> Direction {
        match self {
            Ioctl::GetChipInfo => Direction::Read,
            _ => Direction::ReadWrite,
        }
    }

    /// The size of the payload record.
    pub const fn payload_size(self) -> usize {
        match self {
            Ioctl::GetChipInfo => <ChipInfo as Record>::SIZE,
            Ioctl::GetLineInfo | Ioctl::WatchLineInfo => <LineInfo as Record>::SIZE,
            Ioctl::GetLine => <LineRequest as Record>::SIZE,
            Ioctl::UnwatchLineInfo => std::mem::size_of::<u32>(),
            Ioctl::SetLineConfig => <LineConfig as Record>::SIZE,
            Ioctl::GetLineValues | Ioctl::SetLineValues => <LineValues as Record>::SIZE,
        }
    }

    /// The request code passed to ioctl.
    pub const fn code(self) -> RequestCode {
        RequestCode::new(
            self.direction(),
            IOCTL_MAGIC,
            self as u8,
            self.payload_size(),
        )
    }

    /// The name of the request, as used in the kernel header.
    pub const fn name(self) -> &'static str {
        match self {
            Ioctl::GetChipInfo => "GPIO_GET_CHIPINFO_IOCTL",
            Ioctl::GetLineInfo => "GPIO_V2_GET_LINEINFO_IOCTL",
            Ioctl::WatchLineInfo => "GPIO_V2_GET_LINEINFO_WATCH_IOCTL",
            Ioctl::GetLine => "GPIO_V2_GET_LINE_IOCTL",
            Ioctl::UnwatchLineInfo => "GPIO_GET_LINEINFO_UNWATCH_IOCTL",
            Ioctl::SetLineConfig => "GPIO_V2_LINE_SET_CONFIG_IOCTL",
            Ioctl::GetLineValues => "GPIO_V2_LINE_GET_VALUES_IOCTL",
            Ioctl::SetLineValues => "GPIO_V2_LINE_SET_VALUES_IOCTL",
        }
    }
}

pub const GET_CHIPINFO: RequestCode = Ioctl::GetChipInfo.code();
pub const GET_LINEINFO: RequestCode = Ioctl::GetLineInfo.code();
pub const GET_LINEINFO_WATCH: RequestCode = Ioctl::WatchLineInfo.code();
pub const GET_LINE: RequestCode = Ioctl::GetLine.code();
pub const LINEINFO_UNWATCH: RequestCode = Ioctl::UnwatchLineInfo.code();
pub const LINE_SET_CONFIG: RequestCode = Ioctl::SetLineConfig.code();
pub const LINE_GET_VALUES: RequestCode = Ioctl::GetLineValues.code();
pub const LINE_SET_VALUES: RequestCode = Ioctl::SetLineValues.code();

#[cfg(any(target_os = "android", target_env = "musl"))]
type IoctlRequest = libc::c_int;

#[cfg(not(any(target_os = "android", target_env = "musl")))]
type IoctlRequest = libc::c_ulong;

/// Issue the ioctl with the encoded payload.
///
/// The payload is updated in place for operations that return data.
pub(crate) fn call(f: &File, ioc: Ioctl, payload: &mut [u8]) -> Result<()> {
    debug_assert_eq!(payload.len(), ioc.payload_size());
    // SAFETY: payload is sized to match the size encoded in the request code,
    // so the kernel only accesses memory within it.
    let rc = unsafe {
        libc::ioctl(
            f.as_raw_fd(),
            ioc.code().0 as IoctlRequest,
            payload.as_mut_ptr(),
        )
    };
    if rc == -1 {
        let e = Error::from_errno();
        log::debug!("{} on fd {} failed: {}", ioc.name(), f.as_raw_fd(), e);
        return Err(e);
    }
    Ok(())
}
