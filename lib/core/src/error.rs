//! Error handling foundation for the CIRIS crates.
//!
//! Only the `Result` alias lives here. Each crate defines its own error
//! enums and wraps lower-layer causes with rootcause's `.context()` as they
//! cross a layer boundary.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
///
/// The context type `C` is what callers match on via
/// `Report::current_context`; causes from lower layers stay attached below it.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
