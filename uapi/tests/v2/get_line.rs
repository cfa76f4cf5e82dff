// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;
use gpiochip2_uapi::config::{
    get_line_preconfigured, verify_preconfigured, Expectation, FlagMismatch, LineConfigBuilder,
};

#[test]
fn as_input() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(&[3, 1], "as_input", LineFlags::INPUT);
    let l = get_line(&f, &lr).unwrap();
    for offset in [1, 3] {
        let info = get_line_info(&f, offset).unwrap();
        assert_eq!(info.flags, LineFlags::USED | LineFlags::INPUT);
        assert_eq!(info.consumer.as_os_str().to_string_lossy(), "as_input");
    }
    assert!(!get_line_info(&f, 0)
        .unwrap()
        .flags
        .contains(LineFlags::USED));
    drop(l);
    let info = get_line_info(&f, 3).unwrap();
    assert!(!info.flags.contains(LineFlags::USED));
    assert!(info.consumer.is_empty());
}

#[test]
fn with_output_values() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let mut b = LineConfigBuilder::new(3).unwrap();
    b.with_flags(LineFlags::OUTPUT)
        .with_output_value(0, true)
        .unwrap()
        .with_output_value(2, true)
        .unwrap();
    let lr = LineRequest::new(&[0, 1, 2], "with_output_values", b.build().unwrap()).unwrap();
    let l = get_line(&f, &lr).unwrap();
    crate::common::wait_propagation_delay();
    assert_eq!(s.get_level(0).unwrap(), Level::High);
    assert_eq!(s.get_level(1).unwrap(), Level::Low);
    assert_eq!(s.get_level(2).unwrap(), Level::High);
    drop(l);
}

#[test]
fn with_mixed_flags() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let mut b = LineConfigBuilder::new(2).unwrap();
    b.with_flags(LineFlags::OUTPUT)
        .with_line_flags(1, LineFlags::INPUT | LineFlags::ACTIVE_LOW)
        .unwrap();
    let lr = LineRequest::new(&[0, 3], "with_mixed_flags", b.build().unwrap()).unwrap();
    let l = get_line(&f, &lr).unwrap();
    assert_eq!(
        get_line_info(&f, 0).unwrap().flags,
        LineFlags::USED | LineFlags::OUTPUT
    );
    assert_eq!(
        get_line_info(&f, 3).unwrap().flags,
        LineFlags::USED | LineFlags::INPUT | LineFlags::ACTIVE_LOW
    );
    drop(l);
}

#[test]
fn while_busy() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(&[2], "while_busy", LineFlags::INPUT);
    let l = get_line(&f, &lr).unwrap();
    assert_eq!(
        get_line(&f, &lr).map(|_| ()),
        Err(Error::Os(Errno(libc::EBUSY)))
    );
    drop(l);
    assert!(get_line(&f, &lr).is_ok());
}

#[test]
fn with_offset_out_of_range() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(&[0, 4], "out_of_range", LineFlags::INPUT);
    assert_eq!(
        get_line(&f, &lr).map(|_| ()),
        Err(Error::Os(Errno(libc::EINVAL)))
    );
}

#[test]
fn with_conflicting_flags() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(
        &[1],
        "conflicting",
        LineFlags::OUTPUT | LineFlags::OPEN_DRAIN | LineFlags::OPEN_SOURCE,
    );
    assert_eq!(
        get_line(&f, &lr).map(|_| ()),
        Err(Error::Os(Errno(libc::EINVAL)))
    );
}

#[test]
fn preconfigured() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();

    // the sim lines start as inputs
    let lr = crate::common::request(&[1, 2], "preconfigured", LineFlags::OUTPUT);
    assert_eq!(
        get_line_preconfigured(&f, &lr, Expectation::DIRECTION).map(|_| ()),
        Err(Error::FlagMismatch(FlagMismatch {
            offset: 1,
            line_flags: LineFlags::INPUT,
            requested: LineFlags::OUTPUT,
            expectation: Expectation::DIRECTION,
            mask: LineFlags::INPUT | LineFlags::OUTPUT,
        }))
    );
    // nothing was requested
    assert!(!get_line_info(&f, 1).unwrap().flags.contains(LineFlags::USED));

    // direction is not compared
    let l = get_line_preconfigured(&f, &lr, Expectation::BIAS | Expectation::DRIVE).unwrap();
    drop(l);

    // per line expectations, on lines not previously requested
    let mut b = LineConfigBuilder::new(2).unwrap();
    b.with_flags(LineFlags::OUTPUT)
        .with_line_flags(0, LineFlags::INPUT)
        .unwrap();
    let lr = LineRequest::new(&[0, 3], "preconfigured", b.build().unwrap()).unwrap();
    assert!(verify_preconfigured(&f, &lr, |idx| match idx {
        0 => Expectation::DIRECTION,
        _ => Expectation::empty(),
    })
    .is_ok());
    assert!(matches!(
        verify_preconfigured(&f, &lr, |_| Expectation::DIRECTION),
        Err(Error::FlagMismatch(FlagMismatch { offset: 3, .. }))
    ));
}
