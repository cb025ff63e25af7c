//! Small tools shared by the rest of the crate and by host glue.

use core::error::Error;
use core::fmt;

pub mod log;

/// Formatting wrapper which prints an [`Error`] together with its
/// `source()` chain, with at least one newline between each.
///
/// The text begins with the [`fmt::Display`] format of the error.
/// Tick providers use this when reporting callback failures, since a
/// [`StepError`](crate::frame::StepError) usually wraps the host's own error.
#[derive(Clone, Copy, Debug)]
#[expect(clippy::exhaustive_structs)]
pub struct ErrorChain<'a>(pub &'a (dyn Error + 'a));

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut error = self.0;
        // Write the error's own message. This is expected NOT to contain the sources itself.
        write!(fmt, "{error}")?;

        while let Some(source) = error.source() {
            error = source;
            write!(fmt, "\n\nCaused by:\n    {error}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] Inner);

    #[derive(Debug, thiserror::Error)]
    #[error("inner")]
    struct Inner;

    #[test]
    fn error_chain_lists_sources() {
        assert_eq!(
            ErrorChain(&Outer(Inner)).to_string(),
            "outer\n\nCaused by:\n    inner"
        );
    }
}
