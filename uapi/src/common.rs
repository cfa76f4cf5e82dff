// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: MIT

use crate::config::FlagMismatch;
use libc::{c_long, pollfd, ppoll, sigset_t, time_t, timespec, POLLIN};
use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::ops::Deref;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::AsRawFd;
use std::str::FromStr;
use std::time::Duration;

/// Check if the file has an event available to read.
pub fn has_event(f: &File) -> Result<bool> {
    wait_event(f, Duration::ZERO)
}

/// Wait for the file to have an event available to read.
pub fn wait_event(f: &File, d: Duration) -> Result<bool> {
    let mut pfd = pollfd {
        fd: f.as_raw_fd(),
        events: POLLIN,
        revents: 0,
    };
    let timeout = timespec {
        tv_sec: d.as_secs() as time_t,
        tv_nsec: d.subsec_nanos() as c_long,
    };
    // SAFETY: pfd and timeout outlive the call and the signal mask is unused.
    match unsafe {
        ppoll(
            std::ptr::addr_of_mut!(pfd),
            1,
            std::ptr::addr_of!(timeout),
            std::ptr::null::<sigset_t>(),
        )
    } {
        -1 => Err(Error::from_errno()),
        0 => Ok(false),
        _ => Ok(true),
    }
}

/// The ioctl type identifying the GPIO subsystem.
pub const IOCTL_MAGIC: u8 = 0xb4;

/// The result returned by [`gpiochip2_uapi`] functions.
///
/// [`gpiochip2_uapi`]: crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`gpiochip2_uapi`] functions.
///
/// [`gpiochip2_uapi`]: crate
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// An error returned from an underlying system call.
    #[error(transparent)]
    Os(Errno),

    /// More entries were provided than fit in a fixed-size kernel array.
    #[error("{len} entries exceed the capacity of {max}")]
    CapacityExceeded {
        /// The capacity of the array.
        max: usize,
        /// The number of entries provided.
        len: usize,
    },

    /// A name, label or consumer is longer than its fixed-size field.
    #[error("string of {len} bytes exceeds the capacity of {max}")]
    StringTooLong {
        /// The capacity of the field.
        max: usize,
        /// The length of the provided string.
        len: usize,
    },

    /// A buffer could not be decoded as the expected record.
    #[error(transparent)]
    MalformedBuffer(#[from] MalformedBuffer),

    /// A per-line setting referenced a line outside the request.
    #[error("line index {index} is out of range for {num_lines} requested lines")]
    LineIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The number of lines in the request.
        num_lines: usize,
    },

    /// A line was not configured as expected prior to being requested.
    #[error(transparent)]
    FlagMismatch(#[from] FlagMismatch),
}

impl Error {
    /// Create an error from the current errno value.
    pub fn from_errno() -> Error {
        Error::Os(Errno::last())
    }
}

impl From<Errno> for Error {
    fn from(e: Errno) -> Self {
        Error::Os(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Os(Errno::from(e))
    }
}

impl From<UnderReadError> for Error {
    fn from(e: UnderReadError) -> Self {
        Error::MalformedBuffer(MalformedBuffer::UnderRead(e))
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::MalformedBuffer(MalformedBuffer::Invalid(e))
    }
}

/// A system error number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{}", os_error(.0))]
pub struct Errno(pub i32);

fn os_error(errno: &i32) -> std::io::Error {
    std::io::Error::from_raw_os_error(*errno)
}

impl Errno {
    /// The errno of the most recent failed system call on this thread.
    pub fn last() -> Errno {
        Errno::from(std::io::Error::last_os_error())
    }
}

impl From<std::io::Error> for Errno {
    fn from(e: std::io::Error) -> Self {
        Errno(e.raw_os_error().unwrap_or(libc::EIO))
    }
}

impl From<Errno> for std::io::Error {
    fn from(e: Errno) -> Self {
        std::io::Error::from_raw_os_error(e.0)
    }
}

/// The ways a buffer can fail to decode.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum MalformedBuffer {
    /// The buffer is shorter than the record.
    #[error(transparent)]
    UnderRead(#[from] UnderReadError),

    /// A field holds a value that has no meaning in the uAPI.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A buffer that is too short to contain the record being read from it.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("Reading {record} requires {expected} bytes, but only {found} were available")]
pub struct UnderReadError {
    /// The record being read.
    pub record: &'static str,
    /// The size of the record.
    pub expected: usize,
    /// The number of bytes available.
    pub found: usize,
}

impl UnderReadError {
    pub fn new(record: &'static str, expected: usize, found: usize) -> UnderReadError {
        UnderReadError {
            record,
            expected,
            found,
        }
    }
}

/// A failure to validate a field decoded from a buffer.
//
// Should only be seen if a kernel update adds a value we are unaware of.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("Kernel returned invalid {field}: {msg}")]
pub struct ValidationError {
    pub field: String,
    pub msg: String,
}

impl ValidationError {
    pub fn new<S: Into<String>, T: Into<String>>(field: S, msg: T) -> ValidationError {
        ValidationError {
            field: field.into(),
            msg: msg.into(),
        }
    }
}

/// The maximum number of bytes stored in a Name.
pub const NAME_MAX: usize = 32;

/// A uAPI name string, such as a chip label or a line consumer.
///
/// Stored zero-padded to [`NAME_MAX`] bytes.
/// A name that fills the field is not zero terminated.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Name([u8; NAME_MAX]);

impl Name {
    /// Construct a Name from a byte slice.
    ///
    /// Anything following an embedded zero is discarded, as it would be by the kernel.
    ///
    /// Fails with [`Error::StringTooLong`] if the slice exceeds [`NAME_MAX`] bytes.
    pub fn new(s: &[u8]) -> Result<Name> {
        if s.len() > NAME_MAX {
            return Err(Error::StringTooLong {
                max: NAME_MAX,
                len: s.len(),
            });
        }
        let mut n = Name::default();
        for (src, dst) in s.iter().take_while(|&&x| x != 0).zip(n.0.iter_mut()) {
            *dst = *src;
        }
        Ok(n)
    }

    /// Read a Name from a raw field, truncating at the first zero.
    pub(crate) fn from_field(field: &[u8]) -> Name {
        let mut n = Name::default();
        for (src, dst) in field.iter().take_while(|&&x| x != 0).zip(n.0.iter_mut()) {
            *dst = *src;
        }
        n
    }

    /// The zero padded field as written to the kernel.
    pub(crate) fn as_field(&self) -> &[u8; NAME_MAX] {
        &self.0
    }

    /// Checks whether the Name is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// The length of the contained name.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.iter().position(|&x| x == 0).unwrap_or(NAME_MAX)
    }

    /// The contained name, excluding any padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..self.len()]
    }

    /// Convert the contained name to an OsStr slice.
    pub fn as_os_str(&self) -> &OsStr {
        OsStr::from_bytes(self.as_bytes())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_os_str())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Name::new(s.as_bytes())
    }
}

impl TryFrom<&str> for Name {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Name::new(s.as_bytes())
    }
}

impl TryFrom<&[u8]> for Name {
    type Error = Error;

    fn try_from(s: &[u8]) -> Result<Self> {
        Name::new(s)
    }
}

/// A fixed-capacity array with an active length.
///
/// Mirrors the uAPI pattern of a fixed size array paired with a count of the
/// entries in use. Entries beyond the active length are never exposed.
#[derive(Clone, Copy)]
pub struct Slots<T, const N: usize> {
    items: [T; N],
    len: usize,
}

impl<T: Copy + Default, const N: usize> Slots<T, N> {
    /// Create an empty set of slots.
    pub fn new() -> Self {
        Slots {
            items: [T::default(); N],
            len: 0,
        }
    }

    /// Create slots populated from a slice.
    ///
    /// Fails with [`Error::CapacityExceeded`] if the slice has more than N entries.
    pub fn from_slice(s: &[T]) -> Result<Self> {
        if s.len() > N {
            return Err(Error::CapacityExceeded {
                max: N,
                len: s.len(),
            });
        }
        let mut slots = Self::new();
        slots.items[..s.len()].copy_from_slice(s);
        slots.len = s.len();
        Ok(slots)
    }

    /// Append an entry.
    ///
    /// Fails with [`Error::CapacityExceeded`] if all slots are in use.
    pub fn push(&mut self, v: T) -> Result<()> {
        if self.len >= N {
            return Err(Error::CapacityExceeded {
                max: N,
                len: N + 1,
            });
        }
        self.items[self.len] = v;
        self.len += 1;
        Ok(())
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.items = [T::default(); N];
        self.len = 0;
    }

    /// Checks whether all slots are in use.
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// The active entries.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.len]
    }
}

impl<T: Copy + Default, const N: usize> Default for Slots<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const N: usize> Deref for Slots<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<'a, T: Copy + Default, const N: usize> IntoIterator for &'a Slots<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T: Copy + Default + PartialEq, const N: usize> PartialEq for Slots<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + Default + Eq, const N: usize> Eq for Slots<T, N> {}

impl<T: Copy + Default + fmt::Debug, const N: usize> fmt::Debug for Slots<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// An identifier for a line on a particular chip.
///
/// Valid offsets are in the range 0..`num_lines` as reported in the [`ChipInfo`].
///
/// [`ChipInfo`]: crate::v2::ChipInfo
pub type Offset = u32;

/// The maximum number of lines that may be requested in a single request.
pub const LINES_MAX: usize = 64;

/// A collection of line offsets.
///
/// Typically used to identify the lines belonging to a particular request.
pub type Offsets = Slots<Offset, LINES_MAX>;

/// The trigger identifier for a [`LineInfoChangeEvent`].
///
/// [`LineInfoChangeEvent`]: crate::v2::LineInfoChangeEvent
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InfoChangeKind {
    /// The line has been requested.
    Requested = 1,
    /// The line has been released.
    Released = 2,
    /// The line has been reconfigured.
    Reconfigured = 3,
}

impl TryFrom<u32> for InfoChangeKind {
    type Error = String;

    fn try_from(v: u32) -> std::result::Result<Self, Self::Error> {
        use InfoChangeKind::*;
        match v {
            x if x == Requested as u32 => Ok(Requested),
            x if x == Released as u32 => Ok(Released),
            x if x == Reconfigured as u32 => Ok(Reconfigured),
            x => Err(format!("invalid value: {x}")),
        }
    }
}

/// The trigger identifier for a [`LineEdgeEvent`].
///
/// [`LineEdgeEvent`]: crate::v2::LineEdgeEvent
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LineEdgeEventKind {
    /// Indicates the line transitioned from *inactive* to *active*.
    RisingEdge = 1,
    /// Indicates the line transitioned from *active* to *inactive*.
    FallingEdge = 2,
}

impl TryFrom<u32> for LineEdgeEventKind {
    type Error = String;

    fn try_from(v: u32) -> std::result::Result<Self, Self::Error> {
        use LineEdgeEventKind::*;
        match v {
            x if x == RisingEdge as u32 => Ok(RisingEdge),
            x if x == FallingEdge as u32 => Ok(FallingEdge),
            _ => Err(format!("invalid value: {v}")),
        }
    }
}
