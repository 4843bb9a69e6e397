// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small scalar attribute types shared by layer, display, and capture records.

/// Color-space tag of a buffer or fill color.
///
/// The value is forwarded to the compositor unchanged; this crate assigns no
/// meaning beyond [`UNKNOWN`](Self::UNKNOWN).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dataspace(pub u32);

impl Dataspace {
    /// No dataspace has been set.
    pub const UNKNOWN: Self = Self(0);
}

/// Identifier of a layer stack (the set of layers shown on one display).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerStack(pub u32);

impl LayerStack {
    /// Not assigned to any stack.
    pub const INVALID: Self = Self(u32::MAX);

    /// Returns whether this is a real stack id.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Pixel format requested for a capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelFormat(pub i32);

impl PixelFormat {
    /// 8-bit RGBA.
    pub const RGBA_8888: Self = Self(1);
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::RGBA_8888
    }
}

bitflags::bitflags! {
    /// Flip and rotation applied to buffer content.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BufferTransform: u32 {
        /// Mirror horizontally.
        const FLIP_H = 0x01;
        /// Mirror vertically.
        const FLIP_V = 0x02;
        /// Rotate 90° clockwise.
        const ROT_90 = 0x04;
        /// Rotate 180°.
        const ROT_180 = Self::FLIP_H.bits() | Self::FLIP_V.bits();
        /// Rotate 270° clockwise.
        const ROT_270 = Self::ROT_180.bits() | Self::ROT_90.bits();
    }
}

/// Fixed orientation hint for a layer's buffers.
///
/// Holds [`BufferTransform`] bits, or [`INVALID`](Self::INVALID) when the
/// producer has not requested a fixed orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransformHint(pub u32);

impl TransformHint {
    /// No fixed orientation.
    pub const INVALID: Self = Self(0x80);

    /// Returns the hint as transform bits, if one is set.
    #[must_use]
    pub fn transform(self) -> Option<BufferTransform> {
        (self != Self::INVALID).then(|| BufferTransform::from_bits_retain(self.0))
    }
}

impl Default for TransformHint {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Generates a `u32`/`i32`-backed enum with a checked wire decoding.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $repr:ident ($write:ident, $read:ident) {
            $( $(#[$doc:meta])* $variant:ident = $value:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$doc])* $variant = $value, )*
        }

        impl $name {
            /// Decodes a raw value, or `None` if it names no variant.
            #[must_use]
            pub const fn from_raw(raw: $repr) -> Option<Self> {
                match raw {
                    $( $value => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn to_raw(self) -> $repr {
                self as $repr
            }
        }

        impl $crate::wire::Wire for $name {
            fn write<W: $crate::wire::Writer + ?Sized>(
                &self,
                out: &mut W,
            ) -> Result<(), $crate::wire::WireError> {
                out.$write(self.to_raw())
            }

            fn read<R: $crate::wire::Reader + ?Sized>(
                input: &mut R,
            ) -> Result<Self, $crate::wire::WireError> {
                let raw = input.$read()?;
                Self::from_raw(raw).ok_or($crate::wire::WireError::InvalidDiscriminant {
                    kind: stringify!($name),
                    value: i64::from(raw),
                })
            }
        }
    };
}

pub(crate) use wire_enum;

wire_enum! {
    /// How input events reaching a layer are filtered.
    pub enum DropInputMode as u32 (write_u32, read_u32) {
        /// Deliver input normally.
        #[default]
        None = 0,
        /// Drop all input.
        All = 1,
        /// Drop input while the layer is obscured.
        Obscured = 2,
    }
}

wire_enum! {
    /// Whether the compositor may cache the layer's composition result.
    pub enum CachingHint as i32 (write_i32, read_i32) {
        /// Never cache.
        Disabled = 0,
        /// Caching allowed.
        #[default]
        Enabled = 1,
    }
}

wire_enum! {
    /// Display orientation in quarter turns.
    pub enum Rotation as u32 (write_u32, read_u32) {
        /// Natural orientation.
        #[default]
        Rotation0 = 0,
        /// 90°.
        Rotation90 = 1,
        /// 180°.
        Rotation180 = 2,
        /// 270°.
        Rotation270 = 3,
    }
}
