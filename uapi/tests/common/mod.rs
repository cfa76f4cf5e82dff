// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gpiochip2_uapi::v2::{LineConfig, LineFlags, LineRequest, Offset};
use std::sync::OnceLock;
use std::time::Duration;

// return from the calling test if no simulated chip can be created
macro_rules! require_sim {
    () => {
        if !crate::common::sim_available() {
            eprintln!("skipping: gpio-sim is not available");
            return;
        }
    };
}

// whether gpio-sim is loaded and configfs is writable
pub fn sim_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        gpiosim::builder()
            .with_bank(&gpiosim::Bank::new(1, "availability"))
            .live()
            .is_ok()
    })
}

// max time to wait for an event - expected or not
pub const EVENT_WAIT_TIMEOUT: Duration = Duration::from_millis(25);

// max time to allow events to propagate from the sim to cdev
const PROPAGATION_DELAY: Duration = Duration::from_millis(10);

pub fn wait_propagation_delay() {
    std::thread::sleep(PROPAGATION_DELAY);
}

// a collection of chips with named and hogged lines for info tests
pub fn detailed_sim() -> gpiosim::Sim {
    use gpiosim::{Bank, Direction};
    gpiosim::builder()
        .with_bank(
            Bank::new(8, "fruit")
                .name(3, "banana")
                .name(5, "apple")
                .name(7, "pear")
                .hog(2, "bowl", Direction::OutputLow)
                .hog(5, "pie", Direction::Input),
        )
        .with_bank(
            Bank::new(41, "vegetables")
                .name(3, "arugula")
                .name(4, "celery")
                .name(6, "pumpkin")
                .hog(3, "salad", Direction::OutputHigh),
        )
        .live()
        .expect("gpiosim should go live")
}

pub fn request(offsets: &[Offset], consumer: &str, flags: LineFlags) -> LineRequest {
    let config = LineConfig {
        flags,
        ..Default::default()
    };
    LineRequest::new(offsets, consumer, config).expect("request should be valid")
}
