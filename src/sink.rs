//! Debug diagnostics for the locator and synthesizer.
//!
//! Nothing in the core logs on its own; callers pass a sink explicitly.

use std::fmt;

/// Receiver for debug-level diagnostics.
pub trait DiagnosticSink {
    fn debug(&self, args: fmt::Arguments<'_>);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn debug(&self, args: fmt::Arguments<'_>) {
        (**self).debug(args)
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    #[inline]
    fn debug(&self, _args: fmt::Arguments<'_>) {}
}

/// Forwards to `tracing` at DEBUG level under the `goiferr` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(target: "goiferr", "{}", args);
    }
}
