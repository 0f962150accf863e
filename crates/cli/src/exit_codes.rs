//! CLI Exit Code Registry
//!
//! Single source of truth for `pubcheck` exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | General error (unspecified)              |
//! | 2       | Universal | CLI usage error (bad args)               |
//! | 60-69   | recon     | Reconciliation config/runtime/verdict    |

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, conflicting options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Recon (60-69)
// =============================================================================

/// Config file failed to parse or validate.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 60;

/// Input could not be read or loaded, or output could not be written.
pub const EXIT_RECON_RUNTIME: u8 = 61;

/// `--strict` run left website-only or catalog-only records.
pub const EXIT_RECON_UNMATCHED: u8 = 62;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recon_codes_are_distinct_and_in_range() {
        let codes = [EXIT_RECON_INVALID_CONFIG, EXIT_RECON_RUNTIME, EXIT_RECON_UNMATCHED];
        for code in codes {
            assert!((60..70).contains(&code));
        }
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }
}
