// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Payload records carried by individual change kinds.
//!
//! These records are forwarded, compared, and encoded, but never interpreted.
//! Handles inside them are [`RemoteRef`](crate::handle::RemoteRef)s.

mod buffer;
mod callbacks;
mod effects;
mod metadata;
mod presentation;
mod window;

pub use buffer::{BufferData, BufferDataChange, CachedBuffer, ReleaseCallbackId};
pub use callbacks::{CallbackId, CallbackKind, ListenerCallbacks};
pub use effects::{BlurRegion, Cta8613, HdrMetadata, HdrMetadataTypes, Smpte2086, StretchEffect};
pub use metadata::LayerMetadata;
pub use presentation::{TrustedPresentationListener, TrustedPresentationThresholds};
pub use window::WindowInfo;
