// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;
use crate::common::EVENT_WAIT_TIMEOUT;

fn read_change(f: &fs::File, buf: &mut EventBuffer<LineInfoChangeEvent>) -> LineInfoChangeEvent {
    assert!(wait_event(f, EVENT_WAIT_TIMEOUT).expect("wait_event should succeed"));
    buf.read_event(f).expect("read_event should succeed")
}

#[test]
fn watch() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).expect("gpiosim chip should exist");
    let offset = 2;
    let mut buf = EventBuffer::new(4);

    let info = watch_line_info(&f, offset).expect("watch_line_info should succeed");
    assert_eq!(info.offset, offset);
    assert!(!info.flags.contains(LineFlags::USED));

    // request
    let lr = crate::common::request(&[offset], "watch", LineFlags::OUTPUT);
    let l = get_line(&f, &lr).expect("get_line should succeed");
    let event = read_change(&f, &mut buf);
    assert_eq!(event.info.offset, offset);
    assert_eq!(event.kind, InfoChangeKind::Requested);
    assert_eq!(event.info.consumer.as_os_str().to_string_lossy(), "watch");

    // reconfigure
    let lc = LineConfig {
        flags: LineFlags::INPUT,
        ..Default::default()
    };
    set_line_config(&l, &lc).expect("set_line_config should succeed");
    let event = read_change(&f, &mut buf);
    assert_eq!(event.info.offset, offset);
    assert_eq!(event.kind, InfoChangeKind::Reconfigured);
    assert!(event.info.flags.contains(LineFlags::INPUT));

    // release
    drop(l);
    let event = read_change(&f, &mut buf);
    assert_eq!(event.info.offset, offset);
    assert_eq!(event.kind, InfoChangeKind::Released);

    // while already watched on this fd
    assert_eq!(
        watch_line_info(&f, offset),
        Err(Error::Os(Errno(libc::EBUSY)))
    );
}

#[test]
fn unwatch() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).expect("gpiosim chip should exist");
    let offset = 3;
    let mut buf = EventBuffer::new(1);

    watch_line_info(&f, offset).expect("watch_line_info should succeed");
    let lr = crate::common::request(&[offset], "unwatch", LineFlags::INPUT);
    let l = get_line(&f, &lr).expect("get_line should succeed");
    assert_eq!(read_change(&f, &mut buf).kind, InfoChangeKind::Requested);
    drop(l);
    assert_eq!(read_change(&f, &mut buf).kind, InfoChangeKind::Released);

    assert_eq!(unwatch_line_info(&f, offset), Ok(()));
    let l = get_line(&f, &lr).expect("get_line should succeed");
    assert!(!wait_event(&f, EVENT_WAIT_TIMEOUT).expect("wait_event should succeed"));
    drop(l);

    // no longer watched
    assert_eq!(
        unwatch_line_info(&f, offset),
        Err(Error::Os(Errno(libc::EBUSY)))
    );
}
