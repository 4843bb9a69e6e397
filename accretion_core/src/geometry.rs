// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric value types carried by updates.
//!
//! Integer rectangles and regions describe crops and damage in buffer pixels.
//! Float rectangles use [`kurbo::Rect`] directly. [`Matrix22`] is the linear
//! part of a layer transform; its rectangle-preservation test maps the unit
//! axes through a [`kurbo::Affine`].

use alloc::vec::Vec;

use kurbo::{Affine, Point};

use crate::wire::{Reader, Wire, WireError, Writer};

/// An integer rectangle with exclusive right/bottom edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl Rect {
    /// The "unset" rectangle, with negative extent.
    pub const INVALID: Self = Self::new(0, 0, -1, -1);

    /// The empty rectangle at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle from its four edges.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle at the origin with the given size.
    #[must_use]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width; negative for an invalid rectangle.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    /// Height; negative for an invalid rectangle.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Returns whether the rectangle has non-negative extent.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.width() >= 0 && self.height() >= 0
    }

    /// Returns whether the rectangle covers no area.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::INVALID
    }
}

impl Wire for Rect {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_i32(self.left)?;
        out.write_i32(self.top)?;
        out.write_i32(self.right)?;
        out.write_i32(self.bottom)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self::new(
            input.read_i32()?,
            input.read_i32()?,
            input.read_i32()?,
            input.read_i32()?,
        ))
    }
}

impl Wire for kurbo::Rect {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float rectangles travel as 32-bit floats"
    )]
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_f32(self.x0 as f32)?;
        out.write_f32(self.y0 as f32)?;
        out.write_f32(self.x1 as f32)?;
        out.write_f32(self.y1 as f32)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let x0 = f64::from(input.read_f32()?);
        let y0 = f64::from(input.read_f32()?);
        let x1 = f64::from(input.read_f32()?);
        let y1 = f64::from(input.read_f32()?);
        Ok(Self::new(x0, y0, x1, y1))
    }
}

/// A set of pixels described by a list of rectangles.
///
/// The list is kept as given; two regions with different lists may still
/// cover the same pixels. Use [`has_same_rects`](Self::has_same_rects) to
/// compare geometric content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Creates an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Creates a region covering a single rectangle.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        region.add(rect);
        region
    }

    /// Adds a rectangle to the region. Empty rectangles are ignored.
    pub fn add(&mut self, rect: Rect) {
        if !rect.is_empty() {
            self.rects.push(rect);
        }
    }

    /// Returns the rectangles in insertion order.
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Returns whether the region covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Returns whether both regions cover exactly the same pixels,
    /// regardless of how each splits its area into rectangles.
    #[must_use]
    pub fn has_same_rects(&self, other: &Self) -> bool {
        self.rects == other.rects || self.bands() == other.bands()
    }

    /// Returns the covered pixels in canonical banded form.
    ///
    /// Bands are sorted top to bottom and each holds sorted, disjoint,
    /// non-touching x spans. Vertically adjacent bands with the same spans are
    /// coalesced, so equal coverage always yields equal bands.
    fn bands(&self) -> Vec<Band> {
        let mut by_top: Vec<&Rect> = self.rects.iter().collect();
        by_top.sort_unstable_by_key(|r| r.top);
        let mut ys: Vec<i32> = self.rects.iter().flat_map(|r| [r.top, r.bottom]).collect();
        ys.sort_unstable();
        ys.dedup();

        let mut bands: Vec<Band> = Vec::new();
        let mut active: Vec<&Rect> = Vec::new();
        let mut edges: Vec<(i32, i32)> = Vec::new();
        let mut next = 0;
        for yw in ys.windows(2) {
            let (y0, y1) = (yw[0], yw[1]);
            active.retain(|r| r.bottom > y0);
            while let Some(&r) = by_top.get(next)
                && r.top <= y0
            {
                active.push(r);
                next += 1;
            }

            edges.clear();
            edges.extend(active.iter().map(|r| (r.left, r.right)));
            edges.sort_unstable();
            let mut spans: Vec<(i32, i32)> = Vec::with_capacity(edges.len());
            for &(left, right) in &edges {
                match spans.last_mut() {
                    Some(last) if left <= last.1 => last.1 = last.1.max(right),
                    _ => spans.push((left, right)),
                }
            }
            if spans.is_empty() {
                continue;
            }

            match bands.last_mut() {
                Some(band) if band.bottom == y0 && band.spans == spans => band.bottom = y1,
                _ => bands.push(Band {
                    top: y0,
                    bottom: y1,
                    spans,
                }),
            }
        }
        bands
    }
}

/// One horizontal strip of a normalized [`Region`].
#[derive(PartialEq, Eq)]
struct Band {
    top: i32,
    bottom: i32,
    spans: Vec<(i32, i32)>,
}

impl Wire for Region {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        crate::wire::write_seq(&self.rects, out)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let rects: Vec<Rect> = crate::wire::read_seq(input)?;
        let mut region = Self::new();
        for rect in rects {
            region.add(rect);
        }
        Ok(region)
    }
}

/// The 2×2 linear part of a layer transform.
///
/// `dsdx`/`dsdy` are on the diagonal, `dtdx`/`dtdy` off it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix22 {
    /// x scale.
    pub dsdx: f32,
    /// Off-diagonal term applied to x.
    pub dtdx: f32,
    /// Off-diagonal term applied to y.
    pub dtdy: f32,
    /// y scale.
    pub dsdy: f32,
}

impl Matrix22 {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    /// Creates a matrix from its four terms.
    #[must_use]
    pub const fn new(dsdx: f32, dtdx: f32, dtdy: f32, dsdy: f32) -> Self {
        Self {
            dsdx,
            dtdx,
            dtdy,
            dsdy,
        }
    }

    /// Returns the matrix as an affine transform without translation.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::new([
            f64::from(self.dsdx),
            f64::from(self.dtdx),
            f64::from(self.dtdy),
            f64::from(self.dsdy),
            0.0,
            0.0,
        ])
    }

    /// Returns whether every axis-aligned rectangle maps to an axis-aligned
    /// rectangle: pure scales, flips, and multiples of 90° rotation.
    #[must_use]
    pub fn preserves_rects(self) -> bool {
        let affine = self.to_affine();
        let x_edge = affine * Point::new(1.0, 0.0);
        let y_edge = affine * Point::new(0.0, 1.0);
        let axis_aligned = x_edge.y == 0.0 && y_edge.x == 0.0;
        let swapped = x_edge.x == 0.0 && y_edge.y == 0.0;
        axis_aligned || swapped
    }
}

impl Default for Matrix22 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Wire for Matrix22 {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_f32(self.dsdx)?;
        out.write_f32(self.dtdx)?;
        out.write_f32(self.dtdy)?;
        out.write_f32(self.dsdy)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self::new(
            input.read_f32()?,
            input.read_f32()?,
            input.read_f32()?,
            input.read_f32()?,
        ))
    }
}

/// A linear RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from its four channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the color channels without alpha.
    #[must_use]
    pub const fn rgb(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Replaces the color channels, keeping alpha.
    pub const fn set_rgb(&mut self, [r, g, b]: [f32; 3]) {
        self.r = r;
        self.g = g;
        self.b = b;
    }
}

impl Wire for Color {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_f32(self.r)?;
        out.write_f32(self.g)?;
        out.write_f32(self.b)?;
        out.write_f32(self.a)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self::new(
            input.read_f32()?,
            input.read_f32()?,
            input.read_f32()?,
            input.read_f32()?,
        ))
    }
}

/// A 4×4 column-major color transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorTransform(pub [f32; 16]);

impl ColorTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Wire for ColorTransform {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        for v in self.0 {
            out.write_f32(v)?;
        }
        Ok(())
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let mut m = [0.0_f32; 16];
        for v in &mut m {
            *v = input.read_f32()?;
        }
        Ok(Self(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_rect_is_default() {
        assert_eq!(Rect::default(), Rect::INVALID);
        assert!(!Rect::INVALID.is_valid());
        assert!(Rect::EMPTY.is_valid());
        assert!(Rect::EMPTY.is_empty());
    }

    #[test]
    fn regions_with_same_coverage_match() {
        let mut whole = Region::new();
        whole.add(Rect::new(0, 0, 10, 10));

        let mut halves = Region::new();
        halves.add(Rect::new(0, 0, 10, 5));
        halves.add(Rect::new(0, 5, 10, 10));

        assert_ne!(whole, halves);
        assert!(whole.has_same_rects(&halves));
        assert!(halves.has_same_rects(&whole));
    }

    #[test]
    fn overlapping_rects_compare_by_coverage() {
        let mut overlapping = Region::new();
        overlapping.add(Rect::new(0, 0, 6, 10));
        overlapping.add(Rect::new(4, 0, 10, 10));
        assert!(overlapping.has_same_rects(&Region::from_rect(Rect::new(0, 0, 10, 10))));
    }

    #[test]
    fn regions_with_different_coverage_differ() {
        let a = Region::from_rect(Rect::new(0, 0, 10, 10));
        let b = Region::from_rect(Rect::new(0, 0, 10, 11));
        assert!(!a.has_same_rects(&b));
        assert!(!a.has_same_rects(&Region::new()));
    }

    #[test]
    fn reordered_large_region_matches_its_own_bands() {
        let diagonal: Vec<Rect> = (0..4000).map(|i| Rect::new(i, i, i + 2, i + 1)).collect();
        let mut forward = Region::new();
        for &r in &diagonal {
            forward.add(r);
        }
        let mut reversed = Region::new();
        for &r in diagonal.iter().rev() {
            reversed.add(r);
        }
        assert_ne!(forward, reversed);
        assert!(forward.has_same_rects(&reversed));

        reversed.add(Rect::new(5000, 0, 5001, 1));
        assert!(!forward.has_same_rects(&reversed));
    }

    #[test]
    fn stacked_bands_coalesce() {
        let mut stacked = Region::new();
        stacked.add(Rect::new(0, 0, 4, 2));
        stacked.add(Rect::new(6, 0, 10, 2));
        stacked.add(Rect::new(6, 2, 10, 4));
        stacked.add(Rect::new(0, 2, 4, 4));

        let mut tall = Region::new();
        tall.add(Rect::new(6, 0, 10, 4));
        tall.add(Rect::new(0, 0, 4, 4));
        assert!(stacked.has_same_rects(&tall));

        let mut bridged = tall.clone();
        bridged.add(Rect::new(4, 1, 6, 3));
        assert!(!stacked.has_same_rects(&bridged));
    }

    #[test]
    fn empty_rects_are_dropped() {
        let mut r = Region::new();
        r.add(Rect::EMPTY);
        r.add(Rect::INVALID);
        assert!(r.is_empty());
        assert!(r.has_same_rects(&Region::new()));
    }

    #[test]
    fn scale_and_right_angles_preserve_rects() {
        assert!(Matrix22::IDENTITY.preserves_rects());
        assert!(Matrix22::new(2.0, 0.0, 0.0, 0.5).preserves_rects());
        assert!(Matrix22::new(-1.0, 0.0, 0.0, 1.0).preserves_rects());
        // 90° rotation.
        assert!(Matrix22::new(0.0, 1.0, -1.0, 0.0).preserves_rects());
    }

    #[test]
    fn shear_and_arbitrary_rotation_do_not_preserve_rects() {
        let (s, c) = (core::f32::consts::FRAC_1_SQRT_2, core::f32::consts::FRAC_1_SQRT_2);
        assert!(!Matrix22::new(c, s, -s, c).preserves_rects());
        assert!(!Matrix22::new(1.0, 0.0, 0.3, 1.0).preserves_rects());
    }

    #[test]
    fn rgb_update_keeps_alpha() {
        let mut c = Color::new(0.1, 0.2, 0.3, 0.4);
        c.set_rgb([1.0, 1.0, 1.0]);
        assert_eq!(c, Color::new(1.0, 1.0, 1.0, 0.4));
    }
}
