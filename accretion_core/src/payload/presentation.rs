// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trusted-presentation thresholds and listener.

use crate::handle::RemoteRef;
use crate::wire::{Reader, Wire, WireError, Writer};

/// When a layer counts as presented in a trusted way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrustedPresentationThresholds {
    /// Minimum effective alpha; negative when unset.
    pub min_alpha: f32,
    /// Minimum visible fraction of the layer; negative when unset.
    pub min_fraction_rendered: f32,
    /// How long both thresholds must hold, in milliseconds.
    pub stability_requirement_ms: i32,
}

impl Default for TrustedPresentationThresholds {
    fn default() -> Self {
        Self {
            min_alpha: -1.0,
            min_fraction_rendered: -1.0,
            stability_requirement_ms: 0,
        }
    }
}

impl TrustedPresentationThresholds {
    /// Returns whether both thresholds have been set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.min_alpha >= 0.0 && self.min_fraction_rendered >= 0.0
    }
}

impl Wire for TrustedPresentationThresholds {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_f32(self.min_alpha)?;
        out.write_f32(self.min_fraction_rendered)?;
        out.write_i32(self.stability_requirement_ms)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            min_alpha: input.read_f32()?,
            min_fraction_rendered: input.read_f32()?,
            stability_requirement_ms: input.read_i32()?,
        })
    }
}

/// Who to notify when trusted presentation starts or stops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustedPresentationListener {
    /// Callback interface.
    pub callback: Option<RemoteRef>,
    /// Id passed back with every notification.
    pub callback_id: i32,
}

impl Default for TrustedPresentationListener {
    fn default() -> Self {
        Self {
            callback: None,
            callback_id: -1,
        }
    }
}

impl TrustedPresentationListener {
    /// Drops the registration.
    pub fn clear(&mut self) {
        self.callback = None;
        self.callback_id = -1;
    }
}

impl Wire for TrustedPresentationListener {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_object(self.callback.as_ref())?;
        out.write_i32(self.callback_id)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            callback: input.read_object()?,
            callback_id: input.read_i32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ObjectId;

    #[test]
    fn default_thresholds_are_unset() {
        assert!(!TrustedPresentationThresholds::default().is_set());
        let t = TrustedPresentationThresholds {
            min_alpha: 0.9,
            min_fraction_rendered: 0.5,
            stability_requirement_ms: 500,
        };
        assert!(t.is_set());
    }

    #[test]
    fn clear_drops_the_callback() {
        let mut l = TrustedPresentationListener {
            callback: Some(RemoteRef::new(ObjectId(2))),
            callback_id: 4,
        };
        l.clear();
        assert_eq!(l.callback, None);
        assert_eq!(l.callback_id, -1);
    }
}
