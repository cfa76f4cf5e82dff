// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::codec::Record;
use crate::common::{Result, UnderReadError};
use std::cmp::{max, min};
use std::io::{ErrorKind, Read};
use std::marker::PhantomData;

/// A user space buffer for reading event records in bulk from a file.
///
/// Reads events from the kernel in bulk, where possible, while providing them
/// serially to the caller.
///
/// The kernel returns whole records, but a short read leaves the start of a
/// record in the buffer until the remainder arrives.
///
/// Used with [`LineEdgeEvent`]s read from a line request file, or with
/// [`LineInfoChangeEvent`]s read from a chip file.
///
/// [`LineEdgeEvent`]: crate::v2::LineEdgeEvent
/// [`LineInfoChangeEvent`]: crate::v2::LineInfoChangeEvent
pub struct EventBuffer<E> {
    /// The number of bytes currently written into the buffer
    filled: usize,

    /// The number of bytes currently read from the buffer.
    read: usize,

    /// The buffer for uAPI events, sized by event size and capacity
    buf: Vec<u8>,

    _record: PhantomData<E>,
}

impl<E: Record> EventBuffer<E> {
    /// Create a buffer able to hold `capacity` events.
    ///
    /// The buffer always holds at least one event.
    pub fn new(capacity: usize) -> EventBuffer<E> {
        EventBuffer {
            filled: 0,
            read: 0,
            buf: vec![0; max(capacity, 1) * E::SIZE],
            _record: PhantomData,
        }
    }

    /// The number of events that can be stored in the buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len() / E::SIZE
    }

    /// The number of unread events currently stored in this buffer.
    ///
    /// This does not include events which may be buffered in the kernel.
    pub fn len(&self) -> usize {
        (self.filled - self.read) / E::SIZE
    }

    /// Returns true if there are no complete unread events in the buffer.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of bytes of a partially received event.
    pub fn pending(&self) -> usize {
        (self.filled - self.read) % E::SIZE
    }

    // Move unread bytes to the start of the buffer.
    fn compact(&mut self) {
        if self.read == 0 {
            return;
        }
        self.buf.copy_within(self.read..self.filled, 0);
        self.filled -= self.read;
        self.read = 0;
    }

    fn note_partial(&self) {
        let pending = self.pending();
        if pending != 0 {
            log::trace!(
                "retaining {} of {} bytes of {} awaiting the remainder",
                pending,
                E::SIZE,
                E::NAME
            );
        }
    }

    /// Add raw bytes to the buffer.
    ///
    /// Returns the number of bytes accepted, which is limited by the free space.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> usize {
        self.compact();
        let n = min(bytes.len(), self.buf.len() - self.filled);
        self.buf[self.filled..self.filled + n].copy_from_slice(&bytes[..n]);
        self.filled += n;
        self.note_partial();
        n
    }

    /// Perform a single read from the reader into the free space in the buffer.
    ///
    /// Returns the number of bytes read, which is zero if the reader is at
    /// end of file or the buffer is full.
    /// Reads interrupted by a signal are retried.
    pub fn fill_from<R: Read>(&mut self, mut r: R) -> Result<usize> {
        self.compact();
        if self.filled == self.buf.len() {
            return Ok(0);
        }
        let n = loop {
            match r.read(&mut self.buf[self.filled..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        self.filled += n;
        self.note_partial();
        Ok(n)
    }

    /// Returns the next event from the buffer, if a complete one is available.
    ///
    /// Never reads from the kernel.
    pub fn next_event(&mut self) -> Option<Result<E>> {
        if self.filled - self.read < E::SIZE {
            return None;
        }
        let end = self.read + E::SIZE;
        let evt = E::decode(&self.buf[self.read..end]);
        self.read = end;
        Some(evt)
    }

    /// Returns the next event, reading from the reader if the buffer has none.
    ///
    /// If the buffer is empty this may block until the kernel has an event.
    /// Use [`wait_event`] on the file first to avoid blocking.
    ///
    /// Fails if the reader reaches end of file before a complete event is read.
    ///
    /// [`wait_event`]: crate::wait_event
    pub fn read_event<R: Read>(&mut self, mut r: R) -> Result<E> {
        loop {
            if let Some(evt) = self.next_event() {
                return evt;
            }
            if self.fill_from(&mut r)? == 0 {
                return Err(UnderReadError::new(E::NAME, E::SIZE, self.pending()).into());
            }
        }
    }
}
