// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Audit notifications from sanitize and merge.
//!
//! This module provides an [`AuditSink`] trait with one method per event kind.
//! Sanitize calls it for every change it strips; merge calls it when an
//! incoming change kind was not folded. All method bodies default to no-ops.
//!
//! [`Auditor`] wraps an optional `&mut dyn AuditSink`. When the `audit`
//! feature is **off**, every `Auditor` method compiles to nothing. When **on**
//! (the default), each method performs a single `Option` branch before
//! dispatching.

use core::fmt;

use crate::change::{DisplayField, LayerField};
use crate::flags::LayerFlags;
use crate::frame_rate::{FrameRateRejection, FrameRateRequest};
use crate::permission::Permissions;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// The record an audited change belonged to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuditTarget {
    /// A layer, identified by its numeric id hint.
    Layer {
        /// The update's `layer_id`.
        layer_id: i32,
    },
    /// A display.
    Display,
}

/// What a sanitize pass removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrippedChange {
    /// A whole layer change kind.
    Layer(LayerField),
    /// A single boolean sub-flag inside the layer flags group.
    LayerFlag(LayerFlags),
    /// A whole display change kind.
    Display(DisplayField),
}

impl StrippedChange {
    /// Returns a short stable name for the stripped change.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Layer(field) => field.name(),
            Self::Display(field) => field.name(),
            Self::LayerFlag(flag) => {
                if *flag == LayerFlags::DISPLAY_DECORATION {
                    "display-decoration"
                } else {
                    "layer-flag"
                }
            }
        }
    }
}

/// Emitted once per change removed by sanitize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripEvent {
    /// Record the change belonged to.
    pub target: AuditTarget,
    /// What was removed.
    pub change: StrippedChange,
    /// Permissions that would have allowed the change. Empty when the change
    /// was removed for its content rather than for a missing permission.
    pub missing: Permissions,
}

impl StripEvent {
    /// Returns the one-line human-readable message for this strip.
    #[must_use]
    pub fn message(&self) -> StripMessage<'_> {
        StripMessage(self)
    }
}

/// Display adapter returned by [`StripEvent::message`].
#[derive(Clone, Copy, Debug)]
pub struct StripMessage<'a>(&'a StripEvent);

impl fmt::Display for StripMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stripped attempt to set {}", self.0.change.name())
    }
}

impl fmt::Display for StripEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.message(), self.target)?;
        if !self.missing.is_empty() {
            write!(f, " (missing {:?})", self.missing)?;
        }
        Ok(())
    }
}

/// Emitted when the frame-rate validator rejects a request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRateRejectedEvent {
    /// The update's `layer_id`.
    pub layer_id: i32,
    /// The operation that asked for validation, as passed to the validator.
    pub context: &'static str,
    /// The rejected request.
    pub request: FrameRateRequest,
    /// Why it was rejected.
    pub reason: FrameRateRejection,
}

/// Emitted when merge leaves incoming change bits unhandled.
///
/// This is an implementation defect, never a caller error. For a display
/// target the bit fields hold [`DisplayChanges`](crate::change::DisplayChanges)
/// bits widened to 64.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnmergedEvent {
    /// Record the merge was folding into.
    pub target: AuditTarget,
    /// The incoming `what` bits.
    pub incoming: u64,
    /// The accumulator's `what` bits after the merge.
    pub merged: u64,
    /// Incoming bits that no merge arm handled.
    pub unmerged: u64,
}

impl fmt::Display for AuditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layer { layer_id } => write!(f, "layer {layer_id}"),
            Self::Display => f.write_str("display"),
        }
    }
}

impl fmt::Display for UnmergedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.target {
            AuditTarget::Layer { .. } => "layer",
            AuditTarget::Display => "display",
        };
        write!(
            f,
            "unmerged {kind} changes on {}: incoming={:#x} merged={:#x} unmerged={:#x}",
            self.target, self.incoming, self.merged, self.unmerged
        )
    }
}

// ---------------------------------------------------------------------------
// AuditSink trait
// ---------------------------------------------------------------------------

/// Receives audit events.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about. Sinks must not fail: audit delivery
/// never affects the outcome of the pass that emitted it.
pub trait AuditSink {
    /// Called once per change removed by sanitize.
    fn on_stripped(&mut self, e: &StripEvent) {
        _ = e;
    }

    /// Called when the frame-rate validator rejects a request. A matching
    /// [`on_stripped`](Self::on_stripped) call follows.
    fn on_frame_rate_rejected(&mut self, e: &FrameRateRejectedEvent) {
        _ = e;
    }

    /// Called when merge left incoming change bits unhandled.
    fn on_unmerged(&mut self, e: &UnmergedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// An [`AuditSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl AuditSink for NoopSink {}

// ---------------------------------------------------------------------------
// Auditor wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`AuditSink`].
///
/// When the `audit` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Auditor<'a> {
    #[cfg(feature = "audit")]
    sink: Option<&'a mut dyn AuditSink>,
    #[cfg(not(feature = "audit"))]
    _marker: core::marker::PhantomData<&'a mut dyn AuditSink>,
}

impl fmt::Debug for Auditor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auditor").finish_non_exhaustive()
    }
}

impl<'a> Auditor<'a> {
    /// Creates an auditor that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn AuditSink) -> Self {
        #[cfg(feature = "audit")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "audit"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates an auditor that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "audit")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "audit"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`StripEvent`].
    #[inline]
    pub fn stripped(&mut self, e: &StripEvent) {
        #[cfg(feature = "audit")]
        if let Some(s) = &mut self.sink {
            s.on_stripped(e);
        }
        #[cfg(not(feature = "audit"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameRateRejectedEvent`].
    #[inline]
    pub fn frame_rate_rejected(&mut self, e: &FrameRateRejectedEvent) {
        #[cfg(feature = "audit")]
        if let Some(s) = &mut self.sink {
            s.on_frame_rate_rejected(e);
        }
        #[cfg(not(feature = "audit"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UnmergedEvent`].
    #[inline]
    pub fn unmerged(&mut self, e: &UnmergedEvent) {
        #[cfg(feature = "audit")]
        if let Some(s) = &mut self.sink {
            s.on_unmerged(e);
        }
        #[cfg(not(feature = "audit"))]
        {
            _ = e;
        }
    }
}

impl Default for Auditor<'_> {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn strip(change: StrippedChange) -> StripEvent {
        StripEvent {
            target: AuditTarget::Layer { layer_id: 3 },
            change,
            missing: Permissions::ELEVATED,
        }
    }

    #[test]
    fn messages_name_the_stripped_change() {
        let e = strip(StrippedChange::Layer(LayerField::InputInfo));
        assert_eq!(
            e.message().to_string(),
            "stripped attempt to set input-info"
        );
        let e = strip(StrippedChange::LayerFlag(LayerFlags::DISPLAY_DECORATION));
        assert_eq!(
            e.message().to_string(),
            "stripped attempt to set display-decoration"
        );
        let e = strip(StrippedChange::Display(DisplayField::Projection));
        assert_eq!(e.message().to_string(), "stripped attempt to set projection");
    }

    #[test]
    fn full_display_includes_target_and_permissions() {
        let e = strip(StrippedChange::Layer(LayerField::TrustedOverlay));
        let text = e.to_string();
        assert!(text.starts_with("stripped attempt to set trusted-overlay on layer 3"));
        assert!(text.contains("ELEVATED"), "{text}");
    }

    #[test]
    fn unmerged_display_names_its_target() {
        let layer = UnmergedEvent {
            target: AuditTarget::Layer { layer_id: 4 },
            incoming: 0x3,
            merged: 0x1,
            unmerged: 0x2,
        };
        assert_eq!(
            layer.to_string(),
            "unmerged layer changes on layer 4: incoming=0x3 merged=0x1 unmerged=0x2"
        );
        let display = UnmergedEvent {
            target: AuditTarget::Display,
            ..layer
        };
        assert!(
            display
                .to_string()
                .starts_with("unmerged display changes on display:")
        );
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        let mut auditor = Auditor::new(&mut sink);
        auditor.stripped(&strip(StrippedChange::Layer(LayerField::Matrix)));
        auditor.unmerged(&UnmergedEvent {
            target: AuditTarget::Layer { layer_id: 0 },
            incoming: 1,
            merged: 0,
            unmerged: 1,
        });
    }

    #[test]
    fn auditor_none_does_nothing() {
        let mut auditor = Auditor::none();
        auditor.stripped(&strip(StrippedChange::Layer(LayerField::Matrix)));
    }

    #[cfg(feature = "audit")]
    #[test]
    fn auditor_dispatches_to_sink() {
        #[derive(Default)]
        struct CountingSink {
            stripped: u32,
            unmerged: u32,
        }

        impl AuditSink for CountingSink {
            fn on_stripped(&mut self, _e: &StripEvent) {
                self.stripped += 1;
            }

            fn on_unmerged(&mut self, _e: &UnmergedEvent) {
                self.unmerged += 1;
            }
        }

        let mut sink = CountingSink::default();
        {
            let mut auditor = Auditor::new(&mut sink);
            auditor.stripped(&strip(StrippedChange::Layer(LayerField::Matrix)));
            auditor.stripped(&strip(StrippedChange::Layer(LayerField::InputInfo)));
        }
        assert_eq!(sink.stripped, 2);
        assert_eq!(sink.unmerged, 0);
    }
}
