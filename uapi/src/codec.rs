// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::common::{Result, UnderReadError};
use zerocopy::{AsBytes, FromBytes};

/// A fixed-size record exchanged verbatim with the kernel.
///
/// The byte layout matches the kernel header field for field, including
/// padding, with all integers in native byte order.
pub trait Record: Sized {
    /// The name of the record, as used in error messages.
    const NAME: &'static str;

    /// The size of the record in bytes.
    const SIZE: usize;

    /// Encode the record into a new buffer.
    fn encode(&self) -> Vec<u8>;

    /// Encode the record into the start of the provided buffer.
    ///
    /// Fails, leaving the buffer untouched, if the buffer is shorter than SIZE.
    fn encode_into(&self, buf: &mut [u8]) -> Result<()>;

    /// Decode a record from the start of the provided buffer.
    ///
    /// Fails if the buffer is shorter than SIZE or contains values
    /// unknown to the uAPI.
    fn decode(buf: &[u8]) -> Result<Self>;
}

/// Conversion between a record and the `#[repr(C)]` mirror of its kernel struct.
pub trait Mirror: Sized {
    /// The name of the record, as used in error messages.
    const RECORD: &'static str;

    type Raw: AsBytes + FromBytes;

    fn to_raw(&self) -> Self::Raw;

    fn from_raw(raw: &Self::Raw) -> Result<Self>;
}

impl<T: Mirror> Record for T {
    const NAME: &'static str = T::RECORD;
    const SIZE: usize = std::mem::size_of::<T::Raw>();

    fn encode(&self) -> Vec<u8> {
        self.to_raw().as_bytes().to_vec()
    }

    fn encode_into(&self, buf: &mut [u8]) -> Result<()> {
        let found = buf.len();
        let buf = buf
            .get_mut(..Self::SIZE)
            .ok_or_else(|| UnderReadError::new(Self::NAME, Self::SIZE, found))?;
        buf.copy_from_slice(self.to_raw().as_bytes());
        Ok(())
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let raw = <T::Raw as FromBytes>::read_from_prefix(buf)
            .ok_or_else(|| UnderReadError::new(Self::NAME, Self::SIZE, buf.len()))?;
        T::from_raw(&raw)
    }
}

// Native endian field access for checking encoded layouts.
#[cfg(test)]
pub(crate) fn put_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_ne_bytes());
}

#[cfg(test)]
pub(crate) fn put_i32(buf: &mut [u8], at: usize, v: i32) {
    buf[at..at + 4].copy_from_slice(&v.to_ne_bytes());
}

#[cfg(test)]
pub(crate) fn put_u64(buf: &mut [u8], at: usize, v: u64) {
    buf[at..at + 8].copy_from_slice(&v.to_ne_bytes());
}

#[cfg(test)]
pub(crate) fn get_u32(buf: &[u8], at: usize) -> u32 {
    let mut b = [0; 4];
    b.copy_from_slice(&buf[at..at + 4]);
    u32::from_ne_bytes(b)
}

#[cfg(test)]
pub(crate) fn get_i32(buf: &[u8], at: usize) -> i32 {
    let mut b = [0; 4];
    b.copy_from_slice(&buf[at..at + 4]);
    i32::from_ne_bytes(b)
}

#[cfg(test)]
pub(crate) fn get_u64(buf: &[u8], at: usize) -> u64 {
    let mut b = [0; 8];
    b.copy_from_slice(&buf[at..at + 8]);
    u64::from_ne_bytes(b)
}
