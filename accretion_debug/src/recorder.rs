// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary audit recording and decoding.
//!
//! [`RecorderSink`] implements [`AuditSink`] and encodes events into a
//! `Vec<u8>` as little-endian records, each starting with a tag byte.
//! [`decode`] reads them back as an iterator of [`RecordedEvent`].
//!
//! Change kinds are stored as their bit in the `what` mask, so a recording
//! stays readable when kinds are appended.

use accretion_core::audit::{
    AuditSink, AuditTarget, FrameRateRejectedEvent, StripEvent, StrippedChange, UnmergedEvent,
};
use accretion_core::change::{DisplayField, LayerField};
use accretion_core::flags::LayerFlags;
use accretion_core::frame_rate::{
    ChangeFrameRateStrategy, FrameRateCompatibility, FrameRateRejection, FrameRateRequest,
};
use accretion_core::permission::Permissions;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_STRIPPED: u8 = 1;
const TAG_FRAME_RATE_REJECTED: u8 = 2;
const TAG_UNMERGED: u8 = 3;

const TARGET_LAYER: u8 = 0;
const TARGET_DISPLAY: u8 = 1;

const CHANGE_LAYER: u8 = 0;
const CHANGE_LAYER_FLAG: u8 = 1;
const CHANGE_DISPLAY: u8 = 2;

const REASON_RATE: u8 = 0;
const REASON_COMPATIBILITY: u8 = 1;
const REASON_STRATEGY: u8 = 2;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// An [`AuditSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_i8(&mut self, v: i8) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        let Ok(len) = u32::try_from(s.len()) else {
            self.write_u32(0);
            return;
        };
        self.write_u32(len);
        self.buf.extend_from_slice(s.as_bytes());
    }

    fn write_target(&mut self, target: AuditTarget) {
        match target {
            AuditTarget::Layer { layer_id } => {
                self.write_u8(TARGET_LAYER);
                self.write_i32(layer_id);
            }
            AuditTarget::Display => {
                self.write_u8(TARGET_DISPLAY);
                self.write_i32(-1);
            }
        }
    }

    fn write_change(&mut self, change: StrippedChange) {
        match change {
            StrippedChange::Layer(field) => {
                self.write_u8(CHANGE_LAYER);
                self.write_u64(field.flag().bits());
            }
            StrippedChange::LayerFlag(flag) => {
                self.write_u8(CHANGE_LAYER_FLAG);
                self.write_u64(u64::from(flag.bits()));
            }
            StrippedChange::Display(field) => {
                self.write_u8(CHANGE_DISPLAY);
                self.write_u64(u64::from(field.flag().bits()));
            }
        }
    }

    fn write_request(&mut self, request: &FrameRateRequest) {
        self.write_u32(request.rate.to_bits());
        self.write_i8(request.compatibility.0);
        self.write_i8(request.change_strategy.0);
    }

    fn write_reason(&mut self, reason: FrameRateRejection) {
        match reason {
            FrameRateRejection::InvalidRate => {
                self.write_u8(REASON_RATE);
                self.write_i8(0);
                self.write_u8(0);
            }
            FrameRateRejection::InvalidCompatibility { value, privileged } => {
                self.write_u8(REASON_COMPATIBILITY);
                self.write_i8(value.0);
                self.write_u8(u8::from(privileged));
            }
            FrameRateRejection::InvalidChangeStrategy(strategy) => {
                self.write_u8(REASON_STRATEGY);
                self.write_i8(strategy.0);
                self.write_u8(0);
            }
        }
    }
}

impl AuditSink for RecorderSink {
    fn on_stripped(&mut self, e: &StripEvent) {
        self.write_u8(TAG_STRIPPED);
        self.write_target(e.target);
        self.write_change(e.change);
        self.write_u32(e.missing.bits());
    }

    fn on_frame_rate_rejected(&mut self, e: &FrameRateRejectedEvent) {
        self.write_u8(TAG_FRAME_RATE_REJECTED);
        self.write_i32(e.layer_id);
        self.write_str(e.context);
        self.write_request(&e.request);
        self.write_reason(e.reason);
    }

    fn on_unmerged(&mut self, e: &UnmergedEvent) {
        self.write_u8(TAG_UNMERGED);
        self.write_target(e.target);
        self.write_u64(e.incoming);
        self.write_u64(e.merged);
        self.write_u64(e.unmerged);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`StripEvent`].
    Stripped(StripEvent),
    /// A [`FrameRateRejectedEvent`].
    FrameRateRejected(RecordedFrameRateRejection),
    /// An [`UnmergedEvent`].
    Unmerged(UnmergedEvent),
}

/// A decoded [`FrameRateRejectedEvent`], owning its context string.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedFrameRateRejection {
    /// The update's `layer_id`.
    pub layer_id: i32,
    /// The operation that asked for validation.
    pub context: String,
    /// The rejected request.
    pub request: FrameRateRequest,
    /// Why it was rejected.
    pub reason: FrameRateRejection,
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first truncated or unrecognized record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.take::<1>()?[0])
    }

    fn read_i8(&mut self) -> Option<i8> {
        Some(i8::from_le_bytes(self.take()?))
    }

    fn read_i32(&mut self) -> Option<i32> {
        Some(i32::from_le_bytes(self.take()?))
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take()?))
    }

    fn read_string(&mut self) -> Option<String> {
        let len = usize::try_from(self.read_u32()?).ok()?;
        let bytes = self.data.get(self.pos..self.pos.checked_add(len)?)?;
        let s = std::str::from_utf8(bytes).ok()?.to_owned();
        self.pos += len;
        Some(s)
    }

    fn read_target(&mut self) -> Option<AuditTarget> {
        let tag = self.read_u8()?;
        let layer_id = self.read_i32()?;
        match tag {
            TARGET_LAYER => Some(AuditTarget::Layer { layer_id }),
            TARGET_DISPLAY => Some(AuditTarget::Display),
            _ => None,
        }
    }

    fn read_change(&mut self) -> Option<StrippedChange> {
        let tag = self.read_u8()?;
        let bits = self.read_u64()?;
        match tag {
            CHANGE_LAYER => LayerField::ALL
                .iter()
                .copied()
                .find(|kind| kind.flag().bits() == bits)
                .map(StrippedChange::Layer),
            CHANGE_LAYER_FLAG => {
                let bits = u32::try_from(bits).ok()?;
                Some(StrippedChange::LayerFlag(LayerFlags::from_bits_retain(bits)))
            }
            CHANGE_DISPLAY => DisplayField::ALL
                .iter()
                .copied()
                .find(|kind| u64::from(kind.flag().bits()) == bits)
                .map(StrippedChange::Display),
            _ => None,
        }
    }

    fn read_request(&mut self) -> Option<FrameRateRequest> {
        Some(FrameRateRequest {
            rate: f32::from_bits(self.read_u32()?),
            compatibility: FrameRateCompatibility(self.read_i8()?),
            change_strategy: ChangeFrameRateStrategy(self.read_i8()?),
        })
    }

    fn read_reason(&mut self) -> Option<FrameRateRejection> {
        let tag = self.read_u8()?;
        let value = self.read_i8()?;
        let privileged = self.read_u8()? != 0;
        match tag {
            REASON_RATE => Some(FrameRateRejection::InvalidRate),
            REASON_COMPATIBILITY => Some(FrameRateRejection::InvalidCompatibility {
                value: FrameRateCompatibility(value),
                privileged,
            }),
            REASON_STRATEGY => Some(FrameRateRejection::InvalidChangeStrategy(
                ChangeFrameRateStrategy(value),
            )),
            _ => None,
        }
    }

    fn decode_stripped(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Stripped(StripEvent {
            target: self.read_target()?,
            change: self.read_change()?,
            missing: Permissions::from_bits_retain(self.read_u32()?),
        }))
    }

    fn decode_frame_rate_rejected(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameRateRejected(RecordedFrameRateRejection {
            layer_id: self.read_i32()?,
            context: self.read_string()?,
            request: self.read_request()?,
            reason: self.read_reason()?,
        }))
    }

    fn decode_unmerged(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Unmerged(UnmergedEvent {
            target: self.read_target()?,
            incoming: self.read_u64()?,
            merged: self.read_u64()?,
            unmerged: self.read_u64()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_STRIPPED => self.decode_stripped(),
            TAG_FRAME_RATE_REJECTED => self.decode_frame_rate_rejected(),
            TAG_UNMERGED => self.decode_unmerged(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use accretion_core::audit::Auditor;
    use accretion_core::display::DisplayUpdate;
    use accretion_core::frame_rate::StandardFrameRateValidator;
    use accretion_core::geometry::Matrix22;
    use accretion_core::handle::{ObjectId, RemoteRef};
    use accretion_core::layer::LayerUpdate;

    #[test]
    fn records_a_sanitize_pass() {
        let mut u = LayerUpdate::new(None, 9);
        u.set_matrix(Matrix22::new(0.6, 0.8, -0.8, 0.6))
            .set_trusted_overlay(true)
            .set_frame_rate(FrameRateRequest {
                rate: 30.0,
                compatibility: FrameRateCompatibility::NO_VOTE,
                change_strategy: ChangeFrameRateStrategy::ALWAYS,
            });

        let mut rec = RecorderSink::new();
        u.sanitize_with(
            Permissions::empty(),
            &StandardFrameRateValidator,
            &mut Auditor::new(&mut rec),
        );

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        match &events[0] {
            RecordedEvent::Stripped(e) => {
                assert_eq!(e.target, AuditTarget::Layer { layer_id: 9 });
                assert_eq!(e.change, StrippedChange::Layer(LayerField::Matrix));
                assert_eq!(e.missing, Permissions::ROTATE);
            }
            other => panic!("expected Stripped, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::FrameRateRejected(e) => {
                assert_eq!(e.layer_id, 9);
                assert_eq!(e.context, LayerUpdate::SANITIZE_CONTEXT);
                assert_eq!(e.request.rate, 30.0);
                assert_eq!(
                    e.reason,
                    FrameRateRejection::InvalidCompatibility {
                        value: FrameRateCompatibility::NO_VOTE,
                        privileged: false,
                    }
                );
            }
            other => panic!("expected FrameRateRejected, got {other:?}"),
        }
        assert!(matches!(
            &events[3],
            RecordedEvent::Stripped(StripEvent {
                change: StrippedChange::Layer(LayerField::TrustedOverlay),
                ..
            })
        ));
    }

    #[test]
    fn round_trip_display_and_flag_strips() {
        let mut rec = RecorderSink::new();
        let mut d = DisplayUpdate::new(RemoteRef::new(ObjectId(1)));
        d.set_surface(None);
        d.sanitize_with(Permissions::empty(), &mut Auditor::new(&mut rec));

        let flag = StripEvent {
            target: AuditTarget::Layer { layer_id: 2 },
            change: StrippedChange::LayerFlag(LayerFlags::DISPLAY_DECORATION),
            missing: Permissions::SYSTEM_WINDOW,
        };
        rec.on_stripped(&flag);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::Stripped(StripEvent {
                    target: AuditTarget::Display,
                    change: StrippedChange::Display(DisplayField::Surface),
                    missing: Permissions::ELEVATED,
                }),
                RecordedEvent::Stripped(flag),
            ]
        );
    }

    #[test]
    fn round_trip_unmerged() {
        let mut rec = RecorderSink::new();
        let e = UnmergedEvent {
            target: AuditTarget::Layer { layer_id: 4 },
            incoming: (1 << 60) | 1,
            merged: 1,
            unmerged: 1 << 60,
        };
        let display = UnmergedEvent {
            target: AuditTarget::Display,
            ..e
        };
        rec.on_unmerged(&e);
        rec.on_unmerged(&display);
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [RecordedEvent::Unmerged(e), RecordedEvent::Unmerged(display)]
        );
    }

    #[test]
    fn truncated_recording_stops_cleanly() {
        let mut rec = RecorderSink::new();
        rec.on_unmerged(&UnmergedEvent {
            target: AuditTarget::Layer { layer_id: 0 },
            incoming: 1,
            merged: 0,
            unmerged: 1,
        });
        let bytes = rec.into_bytes();
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 0);
        assert_eq!(decode(&[0xff]).count(), 0);
    }
}
