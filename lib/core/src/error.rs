//! Error handling foundation for the Vibe Flow site.
//!
//! This module provides only the `Result` type alias using rootcause.
//! Each crate defines its own domain-specific error types in its own
//! error module and attaches layer-appropriate context with `.context()`
//! as errors propagate up the stack.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_alias_carries_values() {
        let ok: Result<&str> = Ok("granted");
        assert_eq!(ok.expect("should be ok"), "granted");
    }
}
