// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;
use std::time::Duration;

#[test]
fn check_info() {
    require_sim!();
    let s = crate::common::detailed_sim();

    for sc in s.chips() {
        let f = fs::File::open(sc.dev_path()).unwrap();
        // names, offsets and used
        for (offset, name) in &sc.config().names {
            let info = get_line_info(&f, *offset).unwrap();
            assert_eq!(info.name.as_os_str().to_string_lossy(), *name);
            assert_eq!(info.offset, *offset);
            assert_eq!(
                info.flags.contains(LineFlags::USED),
                sc.config().hogs.contains_key(offset)
            );
            assert!(!info.flags.intersects(
                LineFlags::ACTIVE_LOW
                    | LineFlags::OPEN_DRAIN
                    | LineFlags::OPEN_SOURCE
                    | LineFlags::BIAS_PULL_UP
                    | LineFlags::BIAS_PULL_DOWN
                    | LineFlags::BIAS_DISABLED
            ));
        }

        // consumer, direction and used
        for (offset, hog) in &sc.config().hogs {
            let info = get_line_info(&f, *offset).unwrap();
            assert_eq!(info.consumer.as_os_str().to_string_lossy(), hog.consumer);
            assert_eq!(info.offset, *offset);
            match &hog.direction {
                Direction::Input => assert!(!info.flags.contains(LineFlags::OUTPUT)),
                Direction::OutputLow | Direction::OutputHigh => {
                    assert!(info.flags.contains(LineFlags::OUTPUT))
                }
            }
            assert!(info.flags.contains(LineFlags::USED));
        }
    }
}

#[test]
fn requested_flags() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let offset = 2;
    let xflags = LineFlags::USED | LineFlags::OUTPUT;

    for extra in [
        LineFlags::ACTIVE_LOW,
        LineFlags::OPEN_DRAIN,
        LineFlags::OPEN_SOURCE,
        LineFlags::BIAS_PULL_UP,
        LineFlags::BIAS_PULL_DOWN,
        LineFlags::BIAS_DISABLED,
    ] {
        let lr = crate::common::request(&[offset], "requested_flags", LineFlags::OUTPUT | extra);
        let l = get_line(&f, &lr).unwrap();
        let info = get_line_info(&f, offset).unwrap();
        assert_eq!(info.consumer.as_os_str().to_string_lossy(), "requested_flags");
        assert_eq!(info.flags, xflags | extra);
        drop(l);
    }
}

#[test]
fn debounced() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let offset = 1;
    let mut lr = crate::common::request(&[offset], "debounced", LineFlags::INPUT);
    lr.config.add_debounce(1234, 0b1).unwrap();
    let l = get_line(&f, &lr).unwrap();
    let info = get_line_info(&f, offset).unwrap();
    assert_eq!(info.num_attrs(), 1);
    assert_eq!(*info.attr(0), LineAttribute::Debounce(1234));
    assert_eq!(info.debounce_period(), Some(Duration::from_micros(1234)));
    drop(l);
}

#[test]
fn with_offset_out_of_range() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    assert_eq!(get_line_info(&f, 4), Err(Error::Os(Errno(libc::EINVAL))));
}
