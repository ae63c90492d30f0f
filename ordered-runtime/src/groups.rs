//! Well-known group ids fired by the conductor at startup.

pub const FIRST_START: &str = "first_start";
pub const SECOND_START: &str = "second_start";
pub const THIRD_START: &str = "third_start";

/// Default firing order of the start phases.
pub const START_PHASES: [&str; 3] = [FIRST_START, SECOND_START, THIRD_START];
