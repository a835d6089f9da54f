//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (bad query, bad data)      |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 10-19   | ai               | AI provider/keychain codes               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use sheetquery_engine::EngineError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - the query or the data was rejected.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options, unreadable file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// AI (10-19)
// =============================================================================

/// AI disabled (provider=none) but the command needs a model.
pub const EXIT_AI_DISABLED: u8 = 10;

/// AI provider configured but API key missing.
pub const EXIT_AI_MISSING_KEY: u8 = 11;

/// Model call failed (network, HTTP error, bad completion).
pub const EXIT_AI_UPSTREAM: u8 = 12;

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &EngineError) -> u8 {
    match err.kind() {
        "upstream" => EXIT_AI_UPSTREAM,
        _ => EXIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_mapping() {
        let err = EngineError::UnknownOperation("open".into());
        assert_eq!(engine_exit_code(&err), EXIT_ERROR);

        let err = EngineError::Upstream("503".into());
        assert_eq!(engine_exit_code(&err), EXIT_AI_UPSTREAM);

        let err = EngineError::MissingTable { slot: "primary" };
        assert_eq!(engine_exit_code(&err), EXIT_ERROR);
    }
}
