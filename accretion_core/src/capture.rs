// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screenshot request records.
//!
//! [`DisplayCaptureArgs`] and [`LayerCaptureArgs`] both start with the
//! common [`CaptureArgs`] record on the wire and append their own fields.

use crate::attributes::{Dataspace, PixelFormat};
use crate::geometry::Rect;
use crate::handle::{HandleSet, RemoteRef};
use crate::wire::{Reader, Wire, WireError, Writer};

/// Options shared by every capture request.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureArgs {
    /// Format of the output buffer.
    pub pixel_format: PixelFormat,
    /// Area to capture; empty captures everything.
    pub source_crop: Rect,
    /// Horizontal output scale.
    pub frame_scale_x: f32,
    /// Vertical output scale.
    pub frame_scale_y: f32,
    /// Include layers marked secure.
    pub capture_secure_layers: bool,
    /// Only capture layers owned by this uid; `-1` for all.
    pub uid: i32,
    /// Requested output dataspace.
    pub dataspace: Dataspace,
    /// Allow capturing protected content.
    pub allow_protected: bool,
    /// Convert the result to grayscale.
    pub grayscale: bool,
    /// Layers left out of the capture, with their children.
    pub exclude_handles: HandleSet,
    /// The capture will be shown in place of the live content.
    pub hint_for_seamless_transition: bool,
}

impl Default for CaptureArgs {
    fn default() -> Self {
        Self {
            pixel_format: PixelFormat::RGBA_8888,
            source_crop: Rect::EMPTY,
            frame_scale_x: 1.0,
            frame_scale_y: 1.0,
            capture_secure_layers: false,
            uid: -1,
            dataspace: Dataspace::UNKNOWN,
            allow_protected: false,
            grayscale: false,
            exclude_handles: HandleSet::new(),
            hint_for_seamless_transition: false,
        }
    }
}

impl CaptureArgs {
    /// Excludes a layer; returns `false` if it was already excluded.
    pub fn exclude(&mut self, handle: RemoteRef) -> bool {
        self.exclude_handles.insert(handle)
    }
}

impl Wire for CaptureArgs {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_i32(self.pixel_format.0)?;
        self.source_crop.write(out)?;
        out.write_f32(self.frame_scale_x)?;
        out.write_f32(self.frame_scale_y)?;
        out.write_bool(self.capture_secure_layers)?;
        out.write_i32(self.uid)?;
        out.write_u32(self.dataspace.0)?;
        out.write_bool(self.allow_protected)?;
        out.write_bool(self.grayscale)?;
        out.write_len(self.exclude_handles.len())?;
        for handle in &self.exclude_handles {
            out.write_object(Some(handle))?;
        }
        out.write_bool(self.hint_for_seamless_transition)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let mut args = Self {
            pixel_format: PixelFormat(input.read_i32()?),
            source_crop: Rect::read(input)?,
            frame_scale_x: input.read_f32()?,
            frame_scale_y: input.read_f32()?,
            capture_secure_layers: input.read_bool()?,
            uid: input.read_i32()?,
            dataspace: Dataspace(input.read_u32()?),
            allow_protected: input.read_bool()?,
            grayscale: input.read_bool()?,
            exclude_handles: HandleSet::new(),
            hint_for_seamless_transition: false,
        };
        let len = input.read_len()?;
        for _ in 0..len {
            args.exclude(input.read_required_object()?);
        }
        args.hint_for_seamless_transition = input.read_bool()?;
        Ok(args)
    }
}

/// Capture of a whole display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayCaptureArgs {
    /// Shared options.
    pub args: CaptureArgs,
    /// Display to capture.
    pub display_token: Option<RemoteRef>,
    /// Output width; zero uses the display width.
    pub width: u32,
    /// Output height; zero uses the display height.
    pub height: u32,
    /// Ignore the display's orientation.
    pub use_identity_transform: bool,
}

impl Wire for DisplayCaptureArgs {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        self.args.write(out)?;
        out.write_object(self.display_token.as_ref())?;
        out.write_u32(self.width)?;
        out.write_u32(self.height)?;
        out.write_bool(self.use_identity_transform)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            args: CaptureArgs::read(input)?,
            display_token: input.read_object()?,
            width: input.read_u32()?,
            height: input.read_u32()?,
            use_identity_transform: input.read_bool()?,
        })
    }
}

/// Capture of one layer subtree.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerCaptureArgs {
    /// Shared options.
    pub args: CaptureArgs,
    /// Root of the captured subtree.
    pub layer_handle: Option<RemoteRef>,
    /// Capture only the children, not the root itself.
    pub children_only: bool,
}

impl Default for LayerCaptureArgs {
    fn default() -> Self {
        Self {
            args: CaptureArgs::default(),
            layer_handle: None,
            children_only: true,
        }
    }
}

impl Wire for LayerCaptureArgs {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        self.args.write(out)?;
        out.write_object(self.layer_handle.as_ref())?;
        out.write_bool(self.children_only)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            args: CaptureArgs::read(input)?,
            layer_handle: input.read_object()?,
            children_only: input.read_bool()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ObjectId;
    use crate::wire::Parcel;
    use alloc::vec::Vec;

    fn args() -> CaptureArgs {
        let mut args = CaptureArgs {
            source_crop: Rect::new(0, 0, 640, 480),
            frame_scale_x: 0.5,
            frame_scale_y: 0.5,
            uid: 10_042,
            grayscale: true,
            ..CaptureArgs::default()
        };
        args.exclude(RemoteRef::new(ObjectId(11)));
        args
    }

    #[test]
    fn excludes_are_a_set() {
        let handle = RemoteRef::new(ObjectId(4));
        let mut a = CaptureArgs::default();
        assert!(a.exclude(handle.clone()));
        assert!(!a.exclude(handle));
        assert_eq!(a.exclude_handles.len(), 1);
    }

    #[test]
    fn repeated_excludes_on_the_wire_collapse() {
        let handles: Vec<RemoteRef> = (0..5_000).map(|i| RemoteRef::new(ObjectId(i))).collect();
        let mut sent = CaptureArgs::default();
        sent.exclude_handles.extend(handles.iter().cloned());

        // Same common record, but every handle appears twice.
        let mut p = Parcel::new();
        p.write_i32(sent.pixel_format.0).unwrap();
        sent.source_crop.write(&mut p).unwrap();
        p.write_f32(1.0).unwrap();
        p.write_f32(1.0).unwrap();
        p.write_bool(false).unwrap();
        p.write_i32(-1).unwrap();
        p.write_u32(sent.dataspace.0).unwrap();
        p.write_bool(false).unwrap();
        p.write_bool(false).unwrap();
        p.write_len(handles.len() * 2).unwrap();
        for handle in handles.iter().chain(&handles) {
            p.write_object(Some(handle)).unwrap();
        }
        p.write_bool(false).unwrap();

        let read = CaptureArgs::read(&mut p).unwrap();
        assert_eq!(read.exclude_handles.len(), handles.len());
        assert_eq!(read, sent);
    }

    #[test]
    fn display_args_write_common_record_first() {
        let d = DisplayCaptureArgs {
            args: args(),
            display_token: Some(RemoteRef::new(ObjectId(1))),
            width: 320,
            height: 240,
            use_identity_transform: true,
        };
        let mut p = Parcel::new();
        d.write(&mut p).unwrap();

        assert_eq!(CaptureArgs::read(&mut p).unwrap(), d.args);
        p.rewind();
        assert_eq!(DisplayCaptureArgs::read(&mut p).unwrap(), d);
    }

    #[test]
    fn layer_args_round_trip() {
        let l = LayerCaptureArgs {
            args: args(),
            layer_handle: Some(RemoteRef::new(ObjectId(2))),
            children_only: false,
        };
        let mut p = Parcel::new();
        l.write(&mut p).unwrap();
        assert_eq!(LayerCaptureArgs::read(&mut p).unwrap(), l);
    }

    #[test]
    fn layer_capture_defaults_to_children_only() {
        assert!(LayerCaptureArgs::default().children_only);
        assert_eq!(CaptureArgs::default().uid, -1);
    }
}
