// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded audits and update summaries.
//!
//! [`export`] reads bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes a JSON array with one object per event. [`describe_layer`] and
//! [`describe_display`] summarize which groups of an update are
//! authoritative, for logging alongside the audit trail.

use std::io::{self, Write};

use serde_json::{Value, json};

use accretion_core::audit::{AuditTarget, StrippedChange};
use accretion_core::display::DisplayUpdate;
use accretion_core::layer::LayerUpdate;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a pretty-printed JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(|e| event_json(&e)).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn event_json(recorded: &RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::Stripped(e) => json!({
            "event": "stripped",
            "target": target_json(e.target),
            "change": e.change.name(),
            "kind": match e.change {
                StrippedChange::Layer(_) => "layer",
                StrippedChange::LayerFlag(_) => "layer-flag",
                StrippedChange::Display(_) => "display",
            },
            "missing": format!("{:?}", e.missing),
            "message": e.message().to_string(),
        }),
        RecordedEvent::FrameRateRejected(e) => json!({
            "event": "frame-rate-rejected",
            "target": target_json(AuditTarget::Layer { layer_id: e.layer_id }),
            "context": e.context,
            "rate": e.request.rate,
            "compatibility": e.request.compatibility.0,
            "change_strategy": e.request.change_strategy.0,
            "reason": e.reason.to_string(),
        }),
        RecordedEvent::Unmerged(e) => json!({
            "event": "unmerged",
            "target": target_json(e.target),
            "incoming": format!("{:#x}", e.incoming),
            "merged": format!("{:#x}", e.merged),
            "unmerged": format!("{:#x}", e.unmerged),
        }),
    }
}

fn target_json(target: AuditTarget) -> Value {
    match target {
        AuditTarget::Layer { layer_id } => json!({ "layer": layer_id }),
        AuditTarget::Display => json!("display"),
    }
}

/// Returns `{ "layer_id": id, "what": [names] }` for a layer update.
///
/// Names appear in canonical change-kind order.
#[must_use]
pub fn describe_layer(update: &LayerUpdate) -> Value {
    let what: Vec<&str> = update.what.kinds().map(|kind| kind.name()).collect();
    json!({
        "layer_id": update.layer_id,
        "what": what,
    })
}

/// Returns `{ "what": [names] }` for a display update.
#[must_use]
pub fn describe_display(update: &DisplayUpdate) -> Value {
    let what: Vec<&str> = update.what.kinds().map(|kind| kind.name()).collect();
    json!({ "what": what })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use accretion_core::audit::{AuditSink, StripEvent, UnmergedEvent};
    use accretion_core::change::LayerField;
    use accretion_core::geometry::Rect;
    use accretion_core::permission::Permissions;

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_stripped(&StripEvent {
            target: AuditTarget::Layer { layer_id: 5 },
            change: StrippedChange::Layer(LayerField::DropInputMode),
            missing: Permissions::ELEVATED,
        });
        rec.on_unmerged(&UnmergedEvent {
            target: AuditTarget::Display,
            incoming: 0x30,
            merged: 0x10,
            unmerged: 0x20,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 2);

        assert_eq!(parsed[0]["event"], "stripped");
        assert_eq!(parsed[0]["change"], "drop-input-mode");
        assert_eq!(parsed[0]["target"]["layer"], 5);
        assert_eq!(
            parsed[0]["message"],
            "stripped attempt to set drop-input-mode"
        );

        assert_eq!(parsed[1]["event"], "unmerged");
        assert_eq!(parsed[1]["target"], "display");
        assert_eq!(parsed[1]["unmerged"], "0x20");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn describe_lists_kinds_in_canonical_order() {
        let mut u = LayerUpdate::new(None, 3);
        u.set_crop(Rect::from_size(4, 4)).set_position(1.0, 1.0);
        assert_eq!(
            describe_layer(&u),
            json!({ "layer_id": 3, "what": ["position", "crop"] })
        );
        assert_eq!(
            describe_display(&DisplayUpdate::default()),
            json!({ "what": [] })
        );
    }
}
