// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input routing info attached to a layer.

use alloc::string::String;

use crate::geometry::{Rect, Region};
use crate::handle::RemoteRef;
use crate::wire::{Reader, Wire, WireError, Writer};

/// What the input dispatcher needs to route events to a layer's window.
///
/// Only the parts the compositor forwards are modeled; the content is
/// never compared, so a set [`InputInfo`](crate::change::LayerField::InputInfo)
/// change always counts as a real change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WindowInfo {
    /// Window token used by the input dispatcher.
    pub token: Option<RemoteRef>,
    /// Debug name.
    pub name: String,
    /// Input configuration flags.
    pub input_config: u32,
    /// Window frame in display space.
    pub frame: Rect,
    /// Area that accepts touches.
    pub touchable_region: Region,
    /// Effective opacity for occlusion checks.
    pub alpha: f32,
    /// Display the window is on.
    pub display_id: i32,
}

impl Wire for WindowInfo {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_object(self.token.as_ref())?;
        out.write_str(&self.name)?;
        out.write_u32(self.input_config)?;
        self.frame.write(out)?;
        self.touchable_region.write(out)?;
        out.write_f32(self.alpha)?;
        out.write_i32(self.display_id)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            token: input.read_object()?,
            name: input.read_string()?,
            input_config: input.read_u32()?,
            frame: Rect::read(input)?,
            touchable_region: Region::read(input)?,
            alpha: input.read_f32()?,
            display_id: input.read_i32()?,
        })
    }
}
