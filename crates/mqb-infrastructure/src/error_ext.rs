//! Error extension utilities
//!
//! Maps foreign errors (figment, std::io, tokio signals) into the domain
//! [`Error`], prefixing the message with what was being attempted.

use mqb_domain::error::{Error, Result};
use std::fmt::Display;

/// Context adapters for `Result`s carrying a foreign error
///
/// ```ignore
/// use mqb_infrastructure::error_ext::ErrorContext;
///
/// let config: AppConfig = figment.extract().config_context("Invalid configuration")?;
/// tokio::signal::ctrl_c().await.io_context("Failed to listen for ctrl-c")?;
/// ```
pub trait ErrorContext<T>: Sized {
    /// Wrap as [`Error::Internal`]
    fn context(self, context: impl Display) -> Result<T>;

    /// Like [`context`](Self::context), building the message only on failure
    fn with_context<C: Display>(self, f: impl FnOnce() -> C) -> Result<T>;

    /// Wrap as [`Error::Io`], keeping the source
    fn io_context(self, context: impl Display) -> Result<T>;

    /// Wrap as [`Error::Configuration`], keeping the source
    fn config_context(self, context: impl Display) -> Result<T>;

    /// Wrap as [`Error::Transport`], keeping the source
    fn transport_context(self, context: impl Display) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Display) -> Result<T> {
        self.map_err(|err| Error::internal(format!("{context}: {err}")))
    }

    fn with_context<C: Display>(self, f: impl FnOnce() -> C) -> Result<T> {
        self.map_err(|err| Error::internal(format!("{}: {err}", f())))
    }

    fn io_context(self, context: impl Display) -> Result<T> {
        self.map_err(|err| Error::io_with_source(format!("{context}: {err}"), err))
    }

    fn config_context(self, context: impl Display) -> Result<T> {
        self.map_err(|err| Error::configuration_with_source(format!("{context}: {err}"), err))
    }

    fn transport_context(self, context: impl Display) -> Result<T> {
        self.map_err(|err| Error::transport_with_source(format!("{context}: {err}"), err))
    }
}
