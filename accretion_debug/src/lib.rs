// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Printing, recording, and JSON export for accretion audit events.
//!
//! This crate provides [`AuditSink`](accretion_core::audit::AuditSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: one human-readable line per event.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::export`]: writes recorded events as a JSON array, and
//!   [`json::describe_layer`] lists which groups of an update are
//!   authoritative.

pub mod json;
pub mod pretty;
pub mod recorder;
