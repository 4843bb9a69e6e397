// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse state updates for compositor layers and displays.
//!
//! `accretion_core` tracks, combines, and transmits *partial* updates to
//! scene-graph layers and displays. A client describes a change as a sparse
//! record: only the attribute groups named in its `what` mask are
//! authoritative. Many such records accumulate before the compositor applies
//! them atomically, so the crate provides the four passes that operate on a
//! single record. It is `no_std` compatible (with `alloc`).
//!
//! # Data flow
//!
//! ```text
//!   client builds LayerUpdate / DisplayUpdate (only touched flags set)
//!       │
//!       ▼
//!   sanitize(permissions) ──► disallowed flags stripped, AuditSink notified
//!       │
//!       ▼
//!   accumulator.merge(update) ──► one folded update per target
//!       │
//!       ▼
//!   snapshot.diff(&accumulator) ──► flags that are real semantic changes
//!       │
//!       ▼
//!   Wire::write(&mut Parcel) ──► crosses the process boundary ──► Wire::read
//! ```
//!
//! **[`change`]**: The closed sets of change kinds ([`LayerField`],
//! [`DisplayField`]) and their bit-set forms. Every pass matches these kinds
//! exhaustively, so adding an attribute without handling it everywhere is a
//! compile error.
//!
//! **[`layer`]**: [`LayerUpdate`] and its merge, diff, sanitize, and wire
//! passes.
//!
//! **[`display`]**: [`DisplayUpdate`], the much smaller per-display record.
//!
//! **[`input`]**: [`InputWindowCommands`], an order-sensitive command batch
//! merged by concatenation rather than by flags.
//!
//! **[`wire`]**: The abstract transport contract ([`Writer`](wire::Writer),
//! [`Reader`](wire::Reader)) and [`Parcel`](wire::Parcel), an in-memory
//! implementation.
//!
//! **[`audit`]**: [`AuditSink`](audit::AuditSink) trait and the zero-overhead
//! [`Auditor`](audit::Auditor) wrapper that receives strip and merge-defect
//! notifications.
//!
//! **[`payload`]**: Opaque payload records carried by some fields (buffers,
//! metadata, input info, effects).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `audit` (enabled by default): Enables `Auditor` method bodies (one branch
//!   per call site).
//!
//! [`LayerField`]: change::LayerField
//! [`DisplayField`]: change::DisplayField
//! [`LayerUpdate`]: layer::LayerUpdate
//! [`DisplayUpdate`]: display::DisplayUpdate
//! [`InputWindowCommands`]: input::InputWindowCommands

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod attributes;
pub mod audit;
pub mod capture;
pub mod change;
pub mod display;
pub mod flags;
pub mod frame_rate;
pub mod geometry;
pub mod handle;
pub mod input;
pub mod layer;
pub mod payload;
pub mod permission;
pub mod wire;
