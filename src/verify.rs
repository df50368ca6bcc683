//! Programmer-error checks that are fatal in development builds and
//! non-fatal in shipping builds.
//!
//! Bookkeeping mistakes in the pose tree (duplicate origin IDs, parenting a
//! pose to its own descendant, malformed rotations) abort immediately while
//! developing. With the `shipping` feature, or without debug assertions, the
//! failure is logged and the caller degrades: returns `false`, skips the
//! mutation, or falls back to a sentinel.

/// Whether a failed check aborts the process in this build configuration.
pub const FATAL_CHECKS: bool = cfg!(all(debug_assertions, not(feature = "shipping")));

/// Check `condition`; on failure log `event` and either panic (development
/// builds) or return `false` (shipping builds).
///
/// Returns `condition` so call sites read as
/// `if !verify(..) { return false; }`.
#[track_caller]
pub fn verify(condition: bool, event: &str, details: std::fmt::Arguments<'_>) -> bool {
    if !condition {
        tracing::error!(check = event, "{}", details);
        if FATAL_CHECKS {
            panic!("{}: {}", event, details);
        }
    }
    condition
}

/// Shorthand for [`verify`] with `format!`-style details.
///
/// ```ignore
/// if !dev_assert!(!self.origins.contains_key(&id), "PoseOriginList.AddOriginWithID.IdExists", "id {}", id) {
///     return false;
/// }
/// ```
#[macro_export]
macro_rules! dev_assert {
    ($cond:expr, $event:expr) => {
        $crate::verify::verify($cond, $event, format_args!(""))
    };
    ($cond:expr, $event:expr, $($arg:tt)+) => {
        $crate::verify::verify($cond, $event, format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passing_check_returns_true() {
        assert!(verify(true, "Verify.Test.Pass", format_args!("unused")));
        assert!(dev_assert!(1 + 1 == 2, "Verify.Test.Macro"));
    }

    #[test]
    #[cfg_attr(
        all(debug_assertions, not(feature = "shipping")),
        should_panic(expected = "Verify.Test.Fail")
    )]
    fn test_failing_check() {
        let ok = dev_assert!(false, "Verify.Test.Fail", "value {}", 3);
        assert!(!ok);
    }
}
