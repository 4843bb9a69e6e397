// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual effect payloads: blur regions, stretch, and HDR metadata.

use alloc::vec::Vec;

use crate::geometry::Rect;
use crate::wire::{Reader, Wire, WireError, Writer};

/// A blurred sub-rectangle of a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlurRegion {
    /// Blur radius in pixels.
    pub blur_radius: u32,
    /// Corner radii: top-left, top-right, bottom-left, bottom-right.
    pub corner_radii: [f32; 4],
    /// Opacity of the blurred content.
    pub alpha: f32,
    /// Area to blur, in layer space.
    pub rect: Rect,
}

impl Wire for BlurRegion {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_u32(self.blur_radius)?;
        for r in self.corner_radii {
            out.write_f32(r)?;
        }
        out.write_f32(self.alpha)?;
        self.rect.write(out)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let blur_radius = input.read_u32()?;
        let mut corner_radii = [0.0_f32; 4];
        for r in &mut corner_radii {
            *r = input.read_f32()?;
        }
        Ok(Self {
            blur_radius,
            corner_radii,
            alpha: input.read_f32()?,
            rect: Rect::read(input)?,
        })
    }
}

/// Overscroll stretch applied to a layer and its children.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StretchEffect {
    /// Width of the stretched area.
    pub width: f32,
    /// Height of the stretched area.
    pub height: f32,
    /// Stretch direction and strength along x.
    pub vector_x: f32,
    /// Stretch direction and strength along y.
    pub vector_y: f32,
    /// Largest stretch along x.
    pub max_amount_x: f32,
    /// Largest stretch along y.
    pub max_amount_y: f32,
    /// Child bounds after mapping into the stretched space.
    pub mapped_child_bounds: kurbo::Rect,
}

impl StretchEffect {
    /// Returns whether the effect stretches nothing.
    #[must_use]
    pub fn is_no_op(&self) -> bool {
        self.vector_x.abs() <= f32::EPSILON && self.vector_y.abs() <= f32::EPSILON
    }
}

impl Wire for StretchEffect {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_f32(self.width)?;
        out.write_f32(self.height)?;
        out.write_f32(self.vector_x)?;
        out.write_f32(self.vector_y)?;
        out.write_f32(self.max_amount_x)?;
        out.write_f32(self.max_amount_y)?;
        self.mapped_child_bounds.write(out)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            width: input.read_f32()?,
            height: input.read_f32()?,
            vector_x: input.read_f32()?,
            vector_y: input.read_f32()?,
            max_amount_x: input.read_f32()?,
            max_amount_y: input.read_f32()?,
            mapped_child_bounds: kurbo::Rect::read(input)?,
        })
    }
}

bitflags::bitflags! {
    /// Which parts of [`HdrMetadata`] are present.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HdrMetadataTypes: u32 {
        /// Mastering display color volume.
        const SMPTE2086 = 1 << 0;
        /// Content light levels.
        const CTA861_3 = 1 << 1;
        /// Dynamic HDR10+ metadata.
        const HDR10PLUS = 1 << 2;
    }
}

/// Mastering display color volume.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Smpte2086 {
    /// Red, green, blue, and white chromaticity points as `[x, y]`.
    pub primaries: [[f32; 2]; 4],
    /// Peak luminance in nits.
    pub max_luminance: f32,
    /// Minimum luminance in nits.
    pub min_luminance: f32,
}

/// Content light levels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cta8613 {
    /// Maximum content light level.
    pub max_content_light_level: f32,
    /// Maximum frame-average light level.
    pub max_frame_average_light_level: f32,
}

/// HDR static and dynamic metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HdrMetadata {
    /// Which of the following fields are meaningful.
    pub valid_types: HdrMetadataTypes,
    /// Mastering display data.
    pub smpte2086: Smpte2086,
    /// Content light levels.
    pub cta8613: Cta8613,
    /// Opaque HDR10+ blob.
    pub hdr10plus: Vec<u8>,
}

impl Wire for HdrMetadata {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_u32(self.valid_types.bits())?;
        for [x, y] in self.smpte2086.primaries {
            out.write_f32(x)?;
            out.write_f32(y)?;
        }
        out.write_f32(self.smpte2086.max_luminance)?;
        out.write_f32(self.smpte2086.min_luminance)?;
        out.write_f32(self.cta8613.max_content_light_level)?;
        out.write_f32(self.cta8613.max_frame_average_light_level)?;
        out.write_blob(&self.hdr10plus)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let valid_types = HdrMetadataTypes::from_bits_retain(input.read_u32()?);
        let mut primaries = [[0.0_f32; 2]; 4];
        for [x, y] in &mut primaries {
            *x = input.read_f32()?;
            *y = input.read_f32()?;
        }
        Ok(Self {
            valid_types,
            smpte2086: Smpte2086 {
                primaries,
                max_luminance: input.read_f32()?,
                min_luminance: input.read_f32()?,
            },
            cta8613: Cta8613 {
                max_content_light_level: input.read_f32()?,
                max_frame_average_light_level: input.read_f32()?,
            },
            hdr10plus: input.read_blob()?,
        })
    }
}
