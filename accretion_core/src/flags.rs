// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boolean layer sub-flags and their masked-write container.
//!
//! A layer update does not replace the whole flag word. It carries a value
//! and a mask, and only the bits set in the mask are written. [`MaskedFlags`]
//! makes that partial-overwrite rule a type instead of two loose integers.
//!
//! Arithmetic works on raw bits so that bits a newer peer defined survive a
//! merge untouched.

use crate::wire::{Reader, Wire, WireError, Writer};

bitflags::bitflags! {
    /// Boolean attributes of a layer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayerFlags: u32 {
        /// Layer is not drawn.
        const HIDDEN = 0x01;
        /// Layer content is fully opaque.
        const OPAQUE = 0x02;
        /// Layer is left out of screenshots.
        const SKIP_SCREENSHOT = 0x40;
        /// Layer content is protected from capture.
        const SECURE = 0x80;
        /// Producer waits for the previous buffer to latch.
        const ENABLE_BACKPRESSURE = 0x100;
        /// Layer is a display decoration (cutout or rounded corner overlay).
        const DISPLAY_DECORATION = 0x200;
        /// Ignore the destination frame when sizing the layer.
        const IGNORE_DESTINATION_FRAME = 0x400;
        /// Layer is the refresh-rate indicator overlay.
        const REFRESH_RATE_INDICATOR = 0x800;
    }
}

/// A flag word plus the mask of bits it actually governs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaskedFlags {
    /// Flag values. Bits outside `mask` carry no meaning.
    pub value: LayerFlags,
    /// Bits of `value` that are authoritative.
    pub mask: LayerFlags,
}

impl MaskedFlags {
    /// Creates a masked word from a value and mask.
    #[must_use]
    pub const fn new(value: LayerFlags, mask: LayerFlags) -> Self {
        Self { value, mask }
    }

    /// Returns a copy with `flag` set to `enabled` and marked authoritative.
    #[must_use]
    pub fn with(mut self, flag: LayerFlags, enabled: bool) -> Self {
        self.set(flag, enabled);
        self
    }

    /// Sets `flag` to `enabled` and marks it authoritative.
    pub fn set(&mut self, flag: LayerFlags, enabled: bool) {
        let bits = flag.bits();
        let value = if enabled {
            self.value.bits() | bits
        } else {
            self.value.bits() & !bits
        };
        self.value = LayerFlags::from_bits_retain(value);
        self.mask = LayerFlags::from_bits_retain(self.mask.bits() | bits);
    }

    /// Folds a later masked write into this one.
    ///
    /// Bits governed by `incoming.mask` take the incoming value; all other
    /// bits keep their current value. The mask becomes the union of both.
    pub fn merge(&mut self, incoming: Self) {
        let mask = incoming.mask.bits();
        let value = (self.value.bits() & !mask) | (incoming.value.bits() & mask);
        self.value = LayerFlags::from_bits_retain(value);
        self.mask = LayerFlags::from_bits_retain(self.mask.bits() | mask);
    }

    /// Returns whether applying `self` would change any bit of `previous`'s
    /// value, looking only at the bits `self` governs.
    #[must_use]
    pub fn differs_from(&self, previous: &Self) -> bool {
        let mask = self.mask.bits();
        (previous.value.bits() & mask) != (self.value.bits() & mask)
    }

    /// Returns whether `flag` is governed and set.
    #[must_use]
    pub fn sets(&self, flag: LayerFlags) -> bool {
        self.mask.contains(flag) && self.value.contains(flag)
    }

    /// Removes `flag` from both value and mask, dropping the write entirely.
    pub fn strip(&mut self, flag: LayerFlags) {
        let bits = flag.bits();
        self.value = LayerFlags::from_bits_retain(self.value.bits() & !bits);
        self.mask = LayerFlags::from_bits_retain(self.mask.bits() & !bits);
    }
}

impl Wire for MaskedFlags {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_u32(self.value.bits())?;
        out.write_u32(self.mask.bits())
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let value = LayerFlags::from_bits_retain(input.read_u32()?);
        let mask = LayerFlags::from_bits_retain(input.read_u32()?);
        Ok(Self::new(value, mask))
    }
}
