// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: MIT

//! A byte-exact Rust layer around the Linux GPIO character device uAPI v2.
//!
//! The kernel records exchanged via ioctl, or read from chip and line request
//! files, are mirrored as plain Rust types which implement [`Record`] to encode
//! to, and decode from, the exact byte layout the kernel expects.
//!
//! The ioctl request codes are derived from the record sizes, as the kernel
//! headers do, and are available from the [`ioctl`] module.
//!
//! ```no_run
//! # fn main() -> gpiochip2_uapi::Result<()> {
//! use gpiochip2_uapi::v2::{get_line, set_all_line_values, LineConfig, LineFlags, LineRequest};
//!
//! let cf = std::fs::File::open("/dev/gpiochip0")?;
//! let config = LineConfig {
//!     flags: LineFlags::OUTPUT,
//!     ..Default::default()
//! };
//! let lr = LineRequest::new(&[17, 22], "blinky", config)?;
//! let lf = get_line(&cf, &lr)?;
//! set_all_line_values(&lf, lr.num_lines(), 0b01)?;
//! # Ok(())
//! # }
//! ```

pub(crate) mod codec;
pub(crate) mod common;

pub mod config;

mod event;

pub mod ioctl;

/// The records and ioctls of GPIO ABI v2, which is the current version of the
/// ABI, released in Linux v5.10.
pub mod v2;

pub use codec::Record;
pub use common::{
    has_event, wait_event, Errno, Error, MalformedBuffer, Name, Result, Slots, UnderReadError,
    ValidationError, LINES_MAX, NAME_MAX,
};
pub use event::EventBuffer;
