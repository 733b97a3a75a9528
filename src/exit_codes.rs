//! Exit code constants for the muxguard CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config, invalid guard name)
//! - 2: Guard busy (acquisition timed out)
//! - 3: Guard usage error (release without acquire, foreign release)
//! - 4: Lock file failure
//! - 5: Another instance is already running

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or invalid guard name.
pub const USER_ERROR: i32 = 1;

/// The guard was held elsewhere and the acquisition timed out.
pub const GUARD_BUSY: i32 = 2;

/// A guard was released without being held, or by a non-owner.
pub const USAGE_ERROR: i32 = 3;

/// Lock file could not be opened, locked, read, or written.
pub const LOCK_FAILURE: i32 = 4;

/// The single-instance check found another live instance.
pub const ALREADY_RUNNING: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            GUARD_BUSY,
            USAGE_ERROR,
            LOCK_FAILURE,
            ALREADY_RUNNING,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_fit_in_a_byte() {
        for code in [SUCCESS, USER_ERROR, GUARD_BUSY, USAGE_ERROR, LOCK_FAILURE, ALREADY_RUNNING] {
            assert!((0..=255).contains(&code));
        }
    }
}
