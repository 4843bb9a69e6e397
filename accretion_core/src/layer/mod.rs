// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sparse per-layer update record.
//!
//! A [`LayerUpdate`] carries one slot per attribute group plus the `what`
//! mask naming the groups that are authoritative. Slots whose kind is not in
//! `what` hold defaults or stale values and must not be read.
//!
//! The four passes live in submodules, each matching [`LayerField`]
//! exhaustively:
//!
//! - [`merge`](LayerUpdate::merge) folds a later update into an accumulator,
//! - [`diff`](LayerUpdate::diff) reports which incoming kinds are real changes,
//! - [`sanitize`](LayerUpdate::sanitize) strips kinds the caller may not set,
//! - the [`Wire`](crate::wire::Wire) impl encodes every slot in one fixed order.

mod diff;
mod merge;
mod sanitize;
mod wire;

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::attributes::{
    BufferTransform, CachingHint, Dataspace, DropInputMode, LayerStack, TransformHint,
};
use crate::change::{LayerChanges, LayerField};
use crate::flags::{LayerFlags, MaskedFlags};
use crate::frame_rate::{
    FrameRateCategory, FrameRateCompatibility, FrameRateRequest, FrameRateSelectionStrategy,
};
use crate::geometry::{Color, ColorTransform, Matrix22, Rect, Region};
use crate::handle::RemoteRef;
use crate::payload::{
    BlurRegion, BufferData, HdrMetadata, LayerMetadata, ListenerCallbacks, StretchEffect,
    TrustedPresentationListener, TrustedPresentationThresholds, WindowInfo,
};

/// A sparse update to one layer.
///
/// Fields are listed in wire order.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerUpdate {
    /// Handle of the target layer.
    pub surface: Option<RemoteRef>,
    /// Numeric identity hint of the target layer; `-1` if unknown.
    pub layer_id: i32,
    /// Authoritative attribute groups.
    pub what: LayerChanges,

    /// [`LayerField::Position`] x.
    pub x: f32,
    /// [`LayerField::Position`] y.
    pub y: f32,
    /// Z-order, absolute for [`LayerField::Layer`] or relative for
    /// [`LayerField::RelativeLayer`].
    pub z: i32,
    /// [`LayerField::LayerStack`].
    pub layer_stack: LayerStack,
    /// [`LayerField::Flags`].
    pub flags: MaskedFlags,
    /// [`LayerField::Matrix`].
    pub matrix: Matrix22,
    /// [`LayerField::Crop`].
    pub crop: Rect,
    /// [`LayerField::RelativeLayer`] reference layer.
    pub relative_layer: Option<RemoteRef>,
    /// [`LayerField::Reparent`] new parent; `None` detaches the layer.
    pub reparent: Option<RemoteRef>,
    /// RGB for [`LayerField::Color`], alpha for [`LayerField::Alpha`].
    pub color: Color,
    /// [`LayerField::InputInfo`].
    pub window_info: WindowInfo,
    /// [`LayerField::TransparentRegion`].
    pub transparent_region: Region,
    /// [`LayerField::BufferTransform`].
    pub buffer_transform: BufferTransform,
    /// [`LayerField::TransformToDisplayInverse`].
    pub transform_to_display_inverse: bool,
    /// [`LayerField::RenderBorder`] enabled.
    pub border_enabled: bool,
    /// [`LayerField::RenderBorder`] width.
    pub border_width: f32,
    /// [`LayerField::RenderBorder`] color.
    pub border_color: Color,
    /// [`LayerField::Dataspace`].
    pub dataspace: Dataspace,
    /// [`LayerField::HdrMetadata`].
    pub hdr_metadata: HdrMetadata,
    /// [`LayerField::SurfaceDamageRegion`].
    pub surface_damage_region: Region,
    /// [`LayerField::Api`]; `-1` if unset.
    pub api: i32,
    /// [`LayerField::SidebandStream`].
    pub sideband_stream: Option<RemoteRef>,
    /// [`LayerField::ColorTransform`].
    pub color_transform: ColorTransform,
    /// [`LayerField::CornerRadius`].
    pub corner_radius: f32,
    /// [`LayerField::BackgroundBlurRadius`].
    pub background_blur_radius: u32,
    /// [`LayerField::Metadata`].
    pub metadata: LayerMetadata,
    /// [`LayerField::BackgroundColor`] color.
    pub background_color: Color,
    /// [`LayerField::BackgroundColor`] dataspace.
    pub background_dataspace: Dataspace,
    /// [`LayerField::ColorSpaceAgnostic`].
    pub color_space_agnostic: bool,
    /// Registrations announced by [`LayerField::HasListenerCallbacks`].
    pub listeners: Vec<ListenerCallbacks>,
    /// [`LayerField::ShadowRadius`].
    pub shadow_radius: f32,
    /// [`LayerField::FrameRateSelectionPriority`]; `-1` if unset.
    pub frame_rate_selection_priority: i32,
    /// [`LayerField::FrameRate`].
    pub frame_rate: FrameRateRequest,
    /// [`LayerField::DefaultFrameRateCompatibility`].
    pub default_frame_rate_compatibility: FrameRateCompatibility,
    /// [`LayerField::FrameRateCategory`] category.
    pub frame_rate_category: FrameRateCategory,
    /// [`LayerField::FrameRateCategory`] smooth-switch-only flag.
    pub frame_rate_category_smooth_switch_only: bool,
    /// [`LayerField::FrameRateSelectionStrategy`].
    pub frame_rate_selection_strategy: FrameRateSelectionStrategy,
    /// [`LayerField::FixedTransformHint`].
    pub fixed_transform_hint: TransformHint,
    /// [`LayerField::AutoRefresh`].
    pub auto_refresh: bool,
    /// [`LayerField::DimmingEnabled`].
    pub dimming_enabled: bool,
    /// [`LayerField::BlurRegions`].
    pub blur_regions: Vec<BlurRegion>,
    /// [`LayerField::Stretch`].
    pub stretch_effect: StretchEffect,
    /// [`LayerField::BufferCrop`].
    pub buffer_crop: Rect,
    /// [`LayerField::DestinationFrame`].
    pub destination_frame: Rect,
    /// [`LayerField::TrustedOverlay`].
    pub is_trusted_overlay: bool,
    /// [`LayerField::DropInputMode`].
    pub drop_input_mode: DropInputMode,
    /// [`LayerField::Buffer`]. Shared with the producer and the transport.
    pub buffer_data: Option<Arc<BufferData>>,
    /// [`LayerField::TrustedPresentationInfo`] thresholds.
    pub trusted_presentation_thresholds: TrustedPresentationThresholds,
    /// [`LayerField::TrustedPresentationInfo`] listener.
    pub trusted_presentation_listener: TrustedPresentationListener,
    /// [`LayerField::ExtendedRangeBrightness`] current ratio.
    pub current_hdr_sdr_ratio: f32,
    /// [`LayerField::ExtendedRangeBrightness`] desired ratio.
    pub desired_hdr_sdr_ratio: f32,
    /// [`LayerField::CachingHint`].
    pub caching_hint: CachingHint,
}

impl Default for LayerUpdate {
    fn default() -> Self {
        Self {
            surface: None,
            layer_id: -1,
            what: LayerChanges::empty(),
            x: 0.0,
            y: 0.0,
            z: 0,
            layer_stack: LayerStack::INVALID,
            flags: MaskedFlags::default(),
            matrix: Matrix22::IDENTITY,
            crop: Rect::INVALID,
            relative_layer: None,
            reparent: None,
            color: Color::TRANSPARENT,
            window_info: WindowInfo::default(),
            transparent_region: Region::new(),
            buffer_transform: BufferTransform::empty(),
            transform_to_display_inverse: false,
            border_enabled: false,
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
            dataspace: Dataspace::UNKNOWN,
            hdr_metadata: HdrMetadata::default(),
            surface_damage_region: Region::new(),
            api: -1,
            sideband_stream: None,
            color_transform: ColorTransform::IDENTITY,
            corner_radius: 0.0,
            background_blur_radius: 0,
            metadata: LayerMetadata::new(),
            background_color: Color::TRANSPARENT,
            background_dataspace: Dataspace::UNKNOWN,
            color_space_agnostic: false,
            listeners: Vec::new(),
            shadow_radius: 0.0,
            frame_rate_selection_priority: -1,
            frame_rate: FrameRateRequest::default(),
            default_frame_rate_compatibility: FrameRateCompatibility::DEFAULT,
            frame_rate_category: FrameRateCategory::DEFAULT,
            frame_rate_category_smooth_switch_only: false,
            frame_rate_selection_strategy: FrameRateSelectionStrategy::PROPAGATE,
            fixed_transform_hint: TransformHint::INVALID,
            auto_refresh: false,
            dimming_enabled: true,
            blur_regions: Vec::new(),
            stretch_effect: StretchEffect::default(),
            buffer_crop: Rect::INVALID,
            destination_frame: Rect::INVALID,
            is_trusted_overlay: false,
            drop_input_mode: DropInputMode::None,
            buffer_data: None,
            trusted_presentation_thresholds: TrustedPresentationThresholds::default(),
            trusted_presentation_listener: TrustedPresentationListener::default(),
            current_hdr_sdr_ratio: 1.0,
            desired_hdr_sdr_ratio: 1.0,
            caching_hint: CachingHint::Enabled,
        }
    }
}

impl LayerUpdate {
    /// Creates an empty update for the given layer.
    #[must_use]
    pub fn new(surface: Option<RemoteRef>, layer_id: i32) -> Self {
        Self {
            surface,
            layer_id,
            ..Self::default()
        }
    }

    /// Returns whether `kind` is authoritative in this update.
    #[inline]
    #[must_use]
    pub fn has(&self, kind: LayerField) -> bool {
        self.what.contains(kind.flag())
    }

    /// Marks `kind` authoritative, clearing its exclusive partner.
    pub fn mark(&mut self, kind: LayerField) {
        self.what.insert(kind.flag());
        if let Some(other) = kind.exclusive_with() {
            self.what.remove(other.flag());
        }
    }

    /// Returns whether this update attaches a buffer.
    #[must_use]
    pub fn has_buffer_changes(&self) -> bool {
        self.has(LayerField::Buffer)
    }

    /// Returns whether the attached buffer data names a buffer, directly or
    /// through the cache.
    #[must_use]
    pub fn has_valid_buffer(&self) -> bool {
        self.buffer_data.as_deref().is_some_and(BufferData::is_valid)
    }

    // -- setters ----------------------------------------------------------

    /// Moves the layer.
    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self.mark(LayerField::Position);
        self
    }

    /// Sets an absolute z-order, replacing any relative one.
    pub fn set_layer(&mut self, z: i32) -> &mut Self {
        self.z = z;
        self.mark(LayerField::Layer);
        self
    }

    /// Orders the layer relative to `reference`, replacing any absolute
    /// z-order.
    pub fn set_relative_layer(&mut self, reference: RemoteRef, z: i32) -> &mut Self {
        self.relative_layer = Some(reference);
        self.z = z;
        self.mark(LayerField::RelativeLayer);
        self
    }

    /// Sets the alpha channel.
    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.color.a = alpha;
        self.mark(LayerField::Alpha);
        self
    }

    /// Sets the RGB channels.
    pub fn set_color(&mut self, rgb: [f32; 3]) -> &mut Self {
        self.color.set_rgb(rgb);
        self.mark(LayerField::Color);
        self
    }

    /// Sets the 2×2 transform.
    pub fn set_matrix(&mut self, matrix: Matrix22) -> &mut Self {
        self.matrix = matrix;
        self.mark(LayerField::Matrix);
        self
    }

    /// Sets or clears boolean sub-flags, leaving flags outside `flag`
    /// untouched.
    pub fn set_flag(&mut self, flag: LayerFlags, enabled: bool) -> &mut Self {
        self.flags.set(flag, enabled);
        self.mark(LayerField::Flags);
        self
    }

    /// Moves the layer to another layer stack.
    pub fn set_layer_stack(&mut self, stack: LayerStack) -> &mut Self {
        self.layer_stack = stack;
        self.mark(LayerField::LayerStack);
        self
    }

    /// Sets the crop rectangle.
    pub fn set_crop(&mut self, crop: Rect) -> &mut Self {
        self.crop = crop;
        self.mark(LayerField::Crop);
        self
    }

    /// Sets the corner radius.
    pub fn set_corner_radius(&mut self, radius: f32) -> &mut Self {
        self.corner_radius = radius;
        self.mark(LayerField::CornerRadius);
        self
    }

    /// Moves the layer under a new parent, or detaches it with `None`.
    pub fn reparent(&mut self, parent: Option<RemoteRef>) -> &mut Self {
        self.reparent = parent;
        self.mark(LayerField::Reparent);
        self
    }

    /// Attaches a buffer.
    pub fn set_buffer(&mut self, data: Arc<BufferData>) -> &mut Self {
        self.buffer_data = Some(data);
        self.mark(LayerField::Buffer);
        self
    }

    /// Sets the transparent region hint.
    pub fn set_transparent_region(&mut self, region: Region) -> &mut Self {
        self.transparent_region = region;
        self.mark(LayerField::TransparentRegion);
        self
    }

    /// Sets the surface damage region.
    pub fn set_surface_damage_region(&mut self, region: Region) -> &mut Self {
        self.surface_damage_region = region;
        self.mark(LayerField::SurfaceDamageRegion);
        self
    }

    /// Sets input routing info.
    pub fn set_input_info(&mut self, info: WindowInfo) -> &mut Self {
        self.window_info = info;
        self.mark(LayerField::InputInfo);
        self
    }

    /// Sets a 32-bit metadata entry.
    pub fn set_metadata_i32(&mut self, key: u32, value: i32) -> &mut Self {
        self.metadata.set_i32(key, value);
        self.mark(LayerField::Metadata);
        self
    }

    /// Requests a frame rate.
    pub fn set_frame_rate(&mut self, request: FrameRateRequest) -> &mut Self {
        self.frame_rate = request;
        self.mark(LayerField::FrameRate);
        self
    }

    /// Sets the frame-rate category.
    pub fn set_frame_rate_category(
        &mut self,
        category: FrameRateCategory,
        smooth_switch_only: bool,
    ) -> &mut Self {
        self.frame_rate_category = category;
        self.frame_rate_category_smooth_switch_only = smooth_switch_only;
        self.mark(LayerField::FrameRateCategory);
        self
    }

    /// Sets the frame-rate selection priority.
    pub fn set_frame_rate_selection_priority(&mut self, priority: i32) -> &mut Self {
        self.frame_rate_selection_priority = priority;
        self.mark(LayerField::FrameRateSelectionPriority);
        self
    }

    /// Marks the layer as a trusted overlay.
    pub fn set_trusted_overlay(&mut self, trusted: bool) -> &mut Self {
        self.is_trusted_overlay = trusted;
        self.mark(LayerField::TrustedOverlay);
        self
    }

    /// Sets the input drop mode.
    pub fn set_drop_input_mode(&mut self, mode: DropInputMode) -> &mut Self {
        self.drop_input_mode = mode;
        self.mark(LayerField::DropInputMode);
        self
    }

    /// Sets the extended-range brightness ratios.
    pub fn set_extended_range_brightness(&mut self, current: f32, desired: f32) -> &mut Self {
        self.current_hdr_sdr_ratio = current;
        self.desired_hdr_sdr_ratio = desired;
        self.mark(LayerField::ExtendedRangeBrightness);
        self
    }

    /// Registers listener callbacks on this update.
    pub fn add_listener_callbacks(&mut self, callbacks: ListenerCallbacks) -> &mut Self {
        self.listeners.push(callbacks);
        self.mark(LayerField::HasListenerCallbacks);
        self
    }

    /// Reports that the producer disconnected.
    pub fn producer_disconnect(&mut self) -> &mut Self {
        self.mark(LayerField::ProducerDisconnect);
        self
    }

    /// Asks the compositor to flush pending jank data.
    pub fn flush_jank_data(&mut self) -> &mut Self {
        self.mark(LayerField::FlushJankData);
        self
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::frame_rate::ChangeFrameRateStrategy;
    use crate::handle::ObjectId;
    use crate::payload::{CachedBuffer, CallbackId, CallbackKind};

    /// A valid update with every slot holding a non-default value and every
    /// kind except the absolute z-order marked.
    pub(crate) fn populated() -> LayerUpdate {
        let handle = |id| Some(RemoteRef::new(ObjectId(id)));
        let mut metadata = LayerMetadata::new();
        metadata.set_i32(LayerMetadata::OWNER_UID, 1000);
        LayerUpdate {
            surface: handle(1),
            layer_id: 42,
            what: LayerChanges::all().difference(LayerChanges::LAYER),
            x: 10.0,
            y: 20.0,
            z: 3,
            layer_stack: LayerStack(2),
            flags: MaskedFlags::default()
                .with(LayerFlags::OPAQUE, true)
                .with(LayerFlags::HIDDEN, false),
            matrix: Matrix22::new(2.0, 0.0, 0.0, 2.0),
            crop: Rect::new(0, 0, 100, 50),
            relative_layer: handle(2),
            reparent: handle(3),
            color: Color::new(0.25, 0.5, 0.75, 0.9),
            window_info: WindowInfo {
                token: handle(4),
                name: "status".into(),
                input_config: 0x10,
                frame: Rect::new(0, 0, 100, 50),
                touchable_region: Region::from_rect(Rect::new(0, 0, 100, 50)),
                alpha: 1.0,
                display_id: 0,
            },
            transparent_region: Region::from_rect(Rect::new(0, 0, 10, 10)),
            buffer_transform: BufferTransform::ROT_90,
            transform_to_display_inverse: true,
            border_enabled: true,
            border_width: 2.0,
            border_color: Color::new(1.0, 0.0, 0.0, 1.0),
            dataspace: Dataspace(0x8c20000),
            hdr_metadata: HdrMetadata {
                hdr10plus: alloc::vec![1, 2, 3],
                ..HdrMetadata::default()
            },
            surface_damage_region: Region::from_rect(Rect::new(5, 5, 15, 15)),
            api: 1,
            sideband_stream: handle(5),
            color_transform: ColorTransform([0.5; 16]),
            corner_radius: 8.0,
            background_blur_radius: 12,
            metadata,
            background_color: Color::new(0.0, 0.0, 0.0, 1.0),
            background_dataspace: Dataspace(1),
            color_space_agnostic: true,
            listeners: alloc::vec![ListenerCallbacks {
                listener: RemoteRef::new(ObjectId(6)),
                callback_ids: alloc::vec![CallbackId {
                    id: 77,
                    kind: CallbackKind::OnCommit,
                }],
            }],
            shadow_radius: 4.0,
            frame_rate_selection_priority: 2,
            frame_rate: FrameRateRequest {
                rate: 60.0,
                compatibility: FrameRateCompatibility::FIXED_SOURCE,
                change_strategy: ChangeFrameRateStrategy::ALWAYS,
            },
            default_frame_rate_compatibility: FrameRateCompatibility::GTE,
            frame_rate_category: FrameRateCategory::HIGH,
            frame_rate_category_smooth_switch_only: true,
            frame_rate_selection_strategy: FrameRateSelectionStrategy::SELF,
            fixed_transform_hint: TransformHint(BufferTransform::ROT_180.bits()),
            auto_refresh: true,
            dimming_enabled: false,
            blur_regions: alloc::vec![BlurRegion {
                blur_radius: 5,
                corner_radii: [1.0, 2.0, 3.0, 4.0],
                alpha: 0.5,
                rect: Rect::new(1, 2, 3, 4),
            }],
            stretch_effect: StretchEffect {
                width: 100.0,
                height: 50.0,
                vector_y: 0.25,
                max_amount_y: 1.0,
                mapped_child_bounds: kurbo::Rect::new(0.0, 0.0, 100.0, 50.0),
                ..StretchEffect::default()
            },
            buffer_crop: Rect::new(0, 0, 64, 64),
            destination_frame: Rect::new(10, 10, 74, 74),
            is_trusted_overlay: true,
            drop_input_mode: DropInputMode::Obscured,
            buffer_data: Some(Arc::new(BufferData {
                buffer: handle(7),
                acquire_fence: handle(8),
                frame_number: 9,
                cached_buffer: CachedBuffer { token: None, id: 0 },
                ..BufferData::default()
            })),
            trusted_presentation_thresholds: TrustedPresentationThresholds {
                min_alpha: 0.9,
                min_fraction_rendered: 0.25,
                stability_requirement_ms: 100,
            },
            trusted_presentation_listener: TrustedPresentationListener {
                callback: handle(9),
                callback_id: 5,
            },
            current_hdr_sdr_ratio: 1.5,
            desired_hdr_sdr_ratio: 2.0,
            caching_hint: CachingHint::Disabled,
        }
    }
}
