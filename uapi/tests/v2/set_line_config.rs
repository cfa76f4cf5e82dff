// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;
use crate::common::wait_propagation_delay;

#[test]
fn input_to_output() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(&[1, 2], "input_to_output", LineFlags::INPUT);
    let l = get_line(&f, &lr).unwrap();

    let mut lc = LineConfig {
        flags: LineFlags::OUTPUT,
        ..Default::default()
    };
    lc.add_output_values(&LineValues::from_slice(&[false, true]))
        .unwrap();
    assert_eq!(set_line_config(&l, &lc), Ok(()));
    wait_propagation_delay();
    assert_eq!(s.get_level(1).unwrap(), Level::Low);
    assert_eq!(s.get_level(2).unwrap(), Level::High);
    assert_eq!(
        get_line_info(&f, 2).unwrap().flags,
        LineFlags::USED | LineFlags::OUTPUT
    );
}

#[test]
fn with_line_override() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(&[0, 1, 3], "with_line_override", LineFlags::OUTPUT);
    let l = get_line(&f, &lr).unwrap();

    let mut lc = LineConfig {
        flags: LineFlags::OUTPUT,
        ..Default::default()
    };
    lc.add_flags(LineFlags::INPUT | LineFlags::EDGE_FALLING, 0b100)
        .unwrap();
    assert_eq!(set_line_config(&l, &lc), Ok(()));
    assert_eq!(
        get_line_info(&f, 3).unwrap().flags,
        LineFlags::USED | LineFlags::INPUT | LineFlags::EDGE_FALLING
    );
    for offset in [0, 1] {
        assert_eq!(
            get_line_info(&f, offset).unwrap().flags,
            LineFlags::USED | LineFlags::OUTPUT
        );
    }
}

#[test]
fn with_invalid_flags() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(&[1], "with_invalid_flags", LineFlags::INPUT);
    let l = get_line(&f, &lr).unwrap();

    // edge detection on an output
    let lc = LineConfig {
        flags: LineFlags::OUTPUT | LineFlags::EDGE_RISING,
        ..Default::default()
    };
    assert_eq!(
        set_line_config(&l, &lc),
        Err(Error::Os(Errno(libc::EINVAL)))
    );
    // unchanged
    assert_eq!(
        get_line_info(&f, 1).unwrap().flags,
        LineFlags::USED | LineFlags::INPUT
    );
}
