// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable audit output.
//!
//! [`PrettyPrintSink`] implements [`AuditSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use accretion_core::audit::{AuditSink, FrameRateRejectedEvent, StripEvent, UnmergedEvent};

/// Writes human-readable audit lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AuditSink for PrettyPrintSink<W> {
    fn on_stripped(&mut self, e: &StripEvent) {
        let _ = writeln!(self.writer, "[strip] {e}");
    }

    fn on_frame_rate_rejected(&mut self, e: &FrameRateRejectedEvent) {
        let _ = writeln!(
            self.writer,
            "[frame-rate] {} layer={} rate={:.2}Hz compatibility={} strategy={}: {}",
            e.context,
            e.layer_id,
            e.request.rate,
            e.request.compatibility.0,
            e.request.change_strategy.0,
            e.reason,
        );
    }

    fn on_unmerged(&mut self, e: &UnmergedEvent) {
        let _ = writeln!(self.writer, "[unmerged] {e}");
    }
}
