// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;
use crate::common::wait_propagation_delay;

fn levels(s: &Simpleton, num_lines: u32) -> Vec<Level> {
    (0..num_lines).map(|o| s.get_level(o).unwrap()).collect()
}

#[test]
fn on_input() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(&[0, 1, 2, 3], "on_input", LineFlags::INPUT);
    let l = get_line(&f, &lr).unwrap();

    // sim defaults to pulling low
    let mut values = LineValues::from_slice(&[true, true, true, true]);
    get_line_values(&l, &mut values).unwrap();
    assert_eq!(values.bits, 0);

    s.set_pull(0, Level::High).unwrap();
    s.set_pull(3, Level::High).unwrap();
    wait_propagation_delay();
    get_line_values(&l, &mut values).unwrap();
    assert_eq!(values.get(0), Some(true));
    assert_eq!(values.get(1), Some(false));
    assert_eq!(values.get(2), Some(false));
    assert_eq!(values.get(3), Some(true));
    assert_eq!(get_all_line_values(&l, 4), Ok(0b1001));

    // the kernel clears the bits of unselected lines
    values.unset_mask(0);
    get_line_values(&l, &mut values).unwrap();
    assert_eq!(values.get(0), None);
    assert_eq!(values.bits & 0b1, 0);
    assert_eq!(values.get(3), Some(true));

    // setting inputs is not permitted
    assert_eq!(
        set_all_line_values(&l, 4, 0b1111),
        Err(Error::Os(Errno(libc::EPERM)))
    );
}

#[test]
fn on_output() {
    require_sim!();
    let s = Simpleton::new(4);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(&[0, 1, 2, 3], "on_output", LineFlags::OUTPUT);
    let l = get_line(&f, &lr).unwrap();

    // uAPI defaults outputs to inactive
    assert_eq!(levels(&s, 4), [Level::Low; 4]);

    let values = LineValues::from_slice(&[true, false, false, true]);
    assert_eq!(set_line_values(&l, &values), Ok(()));
    wait_propagation_delay();
    assert_eq!(
        levels(&s, 4),
        [Level::High, Level::Low, Level::Low, Level::High]
    );
    assert_eq!(get_all_line_values(&l, 4), Ok(0b1001));

    // a partial mask leaves the other lines untouched
    let mut values = LineValues::default();
    values.set(1, true);
    assert_eq!(set_line_values(&l, &values), Ok(()));
    wait_propagation_delay();
    assert_eq!(
        levels(&s, 4),
        [Level::High, Level::High, Level::Low, Level::High]
    );
}

#[test]
fn access_forms() {
    require_sim!();
    let s = Simpleton::new(3);
    let f = fs::File::open(s.dev_path()).unwrap();
    let lr = crate::common::request(&[0, 1, 2], "access_forms", LineFlags::OUTPUT);
    let l = get_line(&f, &lr).unwrap();
    let num_lines = lr.num_lines();

    // write-only, bits beyond the request are discarded
    assert_eq!(set_all_line_values(&l, num_lines, !0b010), Ok(()));
    assert_eq!(get_all_line_values(&l, num_lines), Ok(0b101));

    // read-modify-write
    assert_eq!(modify_line_values(&l, num_lines, |v| !v), Ok(0b010));
    assert_eq!(get_all_line_values(&l, num_lines), Ok(0b010));
    assert_eq!(modify_line_values(&l, num_lines, |v| v << 1), Ok(0b100));
    assert_eq!(get_all_line_values(&l, num_lines), Ok(0b100));

    // activate only touches the selected lines
    assert_eq!(activate_line_values(&l, 0b001), Ok(()));
    assert_eq!(get_all_line_values(&l, num_lines), Ok(0b101));

    // deactivate only touches the lines not kept
    assert_eq!(deactivate_line_values(&l, 0b100), Ok(()));
    assert_eq!(get_all_line_values(&l, num_lines), Ok(0b100));
    wait_propagation_delay();
    assert_eq!(levels(&s, 3), [Level::Low, Level::Low, Level::High]);
}
