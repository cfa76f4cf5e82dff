// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;
use crate::common::{wait_propagation_delay, EVENT_WAIT_TIMEOUT};

#[test]
fn both_edges() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(
        &[1, 2],
        "both_edges",
        LineFlags::INPUT | LineFlags::EDGE_RISING | LineFlags::EDGE_FALLING,
    );
    let l = get_line(&f, &lr).unwrap();
    let mut buf: EventBuffer<LineEdgeEvent> = EventBuffer::new(2);
    assert!(!has_event(&l).unwrap());

    s.set_pull(2, Level::High).unwrap();
    assert!(wait_event(&l, EVENT_WAIT_TIMEOUT).unwrap());
    let evt = buf.read_event(&l).unwrap();
    assert_eq!(evt.kind, LineEdgeEventKind::RisingEdge);
    assert_eq!(evt.offset, 2);
    assert_eq!(evt.seqno, 1);
    assert_eq!(evt.line_seqno, 1);

    s.set_pull(1, Level::High).unwrap();
    s.set_pull(2, Level::Low).unwrap();
    wait_propagation_delay();
    // both events are returned by a single read
    let evt = buf.read_event(&l).unwrap();
    assert_eq!(buf.len(), 1);
    assert_eq!(evt.kind, LineEdgeEventKind::RisingEdge);
    assert_eq!(evt.offset, 1);
    assert_eq!(evt.seqno, 2);
    assert_eq!(evt.line_seqno, 1);
    let prev_ts = evt.timestamp_ns;
    let evt = buf.next_event().unwrap().unwrap();
    assert_eq!(evt.kind, LineEdgeEventKind::FallingEdge);
    assert_eq!(evt.offset, 2);
    assert_eq!(evt.seqno, 3);
    assert_eq!(evt.line_seqno, 2);
    assert!(evt.timestamp_ns >= prev_ts);
    assert!(buf.is_empty());
    assert!(!has_event(&l).unwrap());
}

#[test]
fn rising_only() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(
        &[0],
        "rising_only",
        LineFlags::INPUT | LineFlags::EDGE_RISING,
    );
    let l = get_line(&f, &lr).unwrap();
    let mut buf: EventBuffer<LineEdgeEvent> = EventBuffer::new(4);

    s.set_pull(0, Level::High).unwrap();
    s.set_pull(0, Level::Low).unwrap();
    assert!(wait_event(&l, EVENT_WAIT_TIMEOUT).unwrap());
    let evt = buf.read_event(&l).unwrap();
    assert_eq!(evt.kind, LineEdgeEventKind::RisingEdge);
    assert!(!wait_event(&l, EVENT_WAIT_TIMEOUT).unwrap());
}
