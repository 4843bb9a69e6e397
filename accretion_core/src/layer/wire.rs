// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-order encoding of a layer update.
//!
//! Every slot is written regardless of `what`. Only the sideband stream and
//! the buffer data are preceded by a presence flag.

use alloc::sync::Arc;

use super::LayerUpdate;
use crate::attributes::{
    BufferTransform, CachingHint, Dataspace, DropInputMode, LayerStack, TransformHint,
};
use crate::change::LayerChanges;
use crate::flags::MaskedFlags;
use crate::frame_rate::{
    ChangeFrameRateStrategy, FrameRateCategory, FrameRateCompatibility, FrameRateRequest,
    FrameRateSelectionStrategy,
};
use crate::geometry::{Color, ColorTransform, Matrix22, Rect, Region};
use crate::payload::{
    BufferData, HdrMetadata, LayerMetadata, StretchEffect, TrustedPresentationListener,
    TrustedPresentationThresholds, WindowInfo,
};
use crate::wire::{Reader, Wire, WireError, Writer, read_seq, write_seq};

impl Wire for LayerUpdate {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        let Self {
            surface,
            layer_id,
            what,
            x,
            y,
            z,
            layer_stack,
            flags,
            matrix,
            crop,
            relative_layer,
            reparent,
            color,
            window_info,
            transparent_region,
            buffer_transform,
            transform_to_display_inverse,
            border_enabled,
            border_width,
            border_color,
            dataspace,
            hdr_metadata,
            surface_damage_region,
            api,
            sideband_stream,
            color_transform,
            corner_radius,
            background_blur_radius,
            metadata,
            background_color,
            background_dataspace,
            color_space_agnostic,
            listeners,
            shadow_radius,
            frame_rate_selection_priority,
            frame_rate,
            default_frame_rate_compatibility,
            frame_rate_category,
            frame_rate_category_smooth_switch_only,
            frame_rate_selection_strategy,
            fixed_transform_hint,
            auto_refresh,
            dimming_enabled,
            blur_regions,
            stretch_effect,
            buffer_crop,
            destination_frame,
            is_trusted_overlay,
            drop_input_mode,
            buffer_data,
            trusted_presentation_thresholds,
            trusted_presentation_listener,
            current_hdr_sdr_ratio,
            desired_hdr_sdr_ratio,
            caching_hint,
        } = self;

        out.write_object(surface.as_ref())?;
        out.write_i32(*layer_id)?;
        out.write_u64(what.bits())?;
        out.write_f32(*x)?;
        out.write_f32(*y)?;
        out.write_i32(*z)?;
        out.write_u32(layer_stack.0)?;
        flags.write(out)?;
        matrix.write(out)?;
        crop.write(out)?;
        out.write_object(relative_layer.as_ref())?;
        out.write_object(reparent.as_ref())?;
        color.write(out)?;
        window_info.write(out)?;
        transparent_region.write(out)?;
        out.write_u32(buffer_transform.bits())?;
        out.write_bool(*transform_to_display_inverse)?;
        out.write_bool(*border_enabled)?;
        out.write_f32(*border_width)?;
        border_color.write(out)?;
        out.write_u32(dataspace.0)?;
        hdr_metadata.write(out)?;
        surface_damage_region.write(out)?;
        out.write_i32(*api)?;

        out.write_bool(sideband_stream.is_some())?;
        if let Some(stream) = sideband_stream {
            out.write_object(Some(stream))?;
        }

        color_transform.write(out)?;
        out.write_f32(*corner_radius)?;
        out.write_u32(*background_blur_radius)?;
        metadata.write(out)?;
        background_color.write(out)?;
        out.write_u32(background_dataspace.0)?;
        out.write_bool(*color_space_agnostic)?;
        write_seq(listeners, out)?;
        out.write_f32(*shadow_radius)?;
        out.write_i32(*frame_rate_selection_priority)?;
        out.write_f32(frame_rate.rate)?;
        out.write_i8(frame_rate.compatibility.0)?;
        out.write_i8(frame_rate.change_strategy.0)?;
        out.write_i8(default_frame_rate_compatibility.0)?;
        out.write_i8(frame_rate_category.0)?;
        out.write_bool(*frame_rate_category_smooth_switch_only)?;
        out.write_i8(frame_rate_selection_strategy.0)?;
        out.write_u32(fixed_transform_hint.0)?;
        out.write_bool(*auto_refresh)?;
        out.write_bool(*dimming_enabled)?;
        write_seq(blur_regions, out)?;
        stretch_effect.write(out)?;
        buffer_crop.write(out)?;
        destination_frame.write(out)?;
        out.write_bool(*is_trusted_overlay)?;
        drop_input_mode.write(out)?;

        out.write_bool(buffer_data.is_some())?;
        if let Some(data) = buffer_data {
            data.write(out)?;
        }

        trusted_presentation_thresholds.write(out)?;
        trusted_presentation_listener.write(out)?;
        out.write_f32(*current_hdr_sdr_ratio)?;
        out.write_f32(*desired_hdr_sdr_ratio)?;
        caching_hint.write(out)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let surface = input.read_object()?;
        let layer_id = input.read_i32()?;
        let bits = input.read_u64()?;
        let what = LayerChanges::from_bits(bits)
            .ok_or(WireError::UnknownChangeBits(bits & !LayerChanges::all().bits()))?;

        Ok(Self {
            surface,
            layer_id,
            what,
            x: input.read_f32()?,
            y: input.read_f32()?,
            z: input.read_i32()?,
            layer_stack: LayerStack(input.read_u32()?),
            flags: MaskedFlags::read(input)?,
            matrix: Matrix22::read(input)?,
            crop: Rect::read(input)?,
            relative_layer: input.read_object()?,
            reparent: input.read_object()?,
            color: Color::read(input)?,
            window_info: WindowInfo::read(input)?,
            transparent_region: Region::read(input)?,
            buffer_transform: BufferTransform::from_bits_retain(input.read_u32()?),
            transform_to_display_inverse: input.read_bool()?,
            border_enabled: input.read_bool()?,
            border_width: input.read_f32()?,
            border_color: Color::read(input)?,
            dataspace: Dataspace(input.read_u32()?),
            hdr_metadata: HdrMetadata::read(input)?,
            surface_damage_region: Region::read(input)?,
            api: input.read_i32()?,
            sideband_stream: if input.read_bool()? {
                Some(input.read_required_object()?)
            } else {
                None
            },
            color_transform: ColorTransform::read(input)?,
            corner_radius: input.read_f32()?,
            background_blur_radius: input.read_u32()?,
            metadata: LayerMetadata::read(input)?,
            background_color: Color::read(input)?,
            background_dataspace: Dataspace(input.read_u32()?),
            color_space_agnostic: input.read_bool()?,
            listeners: read_seq(input)?,
            shadow_radius: input.read_f32()?,
            frame_rate_selection_priority: input.read_i32()?,
            frame_rate: FrameRateRequest {
                rate: input.read_f32()?,
                compatibility: FrameRateCompatibility(input.read_i8()?),
                change_strategy: ChangeFrameRateStrategy(input.read_i8()?),
            },
            default_frame_rate_compatibility: FrameRateCompatibility(input.read_i8()?),
            frame_rate_category: FrameRateCategory(input.read_i8()?),
            frame_rate_category_smooth_switch_only: input.read_bool()?,
            frame_rate_selection_strategy: FrameRateSelectionStrategy(input.read_i8()?),
            fixed_transform_hint: TransformHint(input.read_u32()?),
            auto_refresh: input.read_bool()?,
            dimming_enabled: input.read_bool()?,
            blur_regions: read_seq(input)?,
            stretch_effect: StretchEffect::read(input)?,
            buffer_crop: Rect::read(input)?,
            destination_frame: Rect::read(input)?,
            is_trusted_overlay: input.read_bool()?,
            drop_input_mode: DropInputMode::read(input)?,
            buffer_data: if input.read_bool()? {
                Some(Arc::new(BufferData::read(input)?))
            } else {
                None
            },
            trusted_presentation_thresholds: TrustedPresentationThresholds::read(input)?,
            trusted_presentation_listener: TrustedPresentationListener::read(input)?,
            current_hdr_sdr_ratio: input.read_f32()?,
            desired_hdr_sdr_ratio: input.read_f32()?,
            caching_hint: CachingHint::read(input)?,
        })
    }
}
