// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folding a later layer update into an accumulator.

use core::mem;

use super::LayerUpdate;
use crate::audit::{AuditTarget, Auditor, UnmergedEvent};
use crate::change::{LayerChanges, LayerField};

impl LayerUpdate {
    /// Folds `incoming` into `self`, last writer wins per attribute group.
    ///
    /// Exceptions to plain replacement:
    ///
    /// - [`Layer`](LayerField::Layer) and
    ///   [`RelativeLayer`](LayerField::RelativeLayer) each clear the other.
    /// - [`Flags`](LayerField::Flags) is a masked overwrite; sub-flags outside
    ///   the incoming mask survive.
    /// - [`Metadata`](LayerField::Metadata) is a key-wise union.
    /// - [`HasListenerCallbacks`](LayerField::HasListenerCallbacks),
    ///   [`ProducerDisconnect`](LayerField::ProducerDisconnect), and
    ///   [`FlushJankData`](LayerField::FlushJankData) carry no payload; only
    ///   their bit is merged.
    ///
    /// Incoming bits that no kind handles are a defect: they are reported to
    /// the auditor and trip a debug assertion.
    pub fn merge(&mut self, incoming: Self) {
        self.merge_with(incoming, &mut Auditor::none());
    }

    /// Like [`merge`](Self::merge), reporting defects to `auditor`.
    pub fn merge_with(&mut self, mut incoming: Self, auditor: &mut Auditor<'_>) {
        let claimed = incoming.what;
        let mut handled = LayerChanges::empty();

        for kind in claimed.kinds() {
            let merged = self.take_field(kind, &mut incoming);
            self.what |= merged;
            if let Some(other) = kind.exclusive_with() {
                self.what.remove(other.flag());
            }
            handled |= merged;
        }

        let unmerged = claimed.bits() & !handled.bits();
        if unmerged != 0 {
            auditor.unmerged(&UnmergedEvent {
                target: AuditTarget::Layer {
                    layer_id: self.layer_id,
                },
                incoming: claimed.bits(),
                merged: self.what.bits(),
                unmerged,
            });
        }
        debug_assert!(
            unmerged == 0,
            "unmerged layer changes {unmerged:#x}; merge needs a case for them"
        );
    }

    /// Moves one attribute group from `incoming` into `self` and returns the
    /// bit it now owns.
    fn take_field(&mut self, kind: LayerField, incoming: &mut Self) -> LayerChanges {
        match kind {
            LayerField::Position => {
                self.x = incoming.x;
                self.y = incoming.y;
                LayerChanges::POSITION
            }
            LayerField::Layer => {
                self.z = incoming.z;
                LayerChanges::LAYER
            }
            LayerField::Alpha => {
                self.color.a = incoming.color.a;
                LayerChanges::ALPHA
            }
            LayerField::Matrix => {
                self.matrix = incoming.matrix;
                LayerChanges::MATRIX
            }
            LayerField::TransparentRegion => {
                self.transparent_region = mem::take(&mut incoming.transparent_region);
                LayerChanges::TRANSPARENT_REGION
            }
            LayerField::Flags => {
                self.flags.merge(incoming.flags);
                LayerChanges::FLAGS
            }
            LayerField::LayerStack => {
                self.layer_stack = incoming.layer_stack;
                LayerChanges::LAYER_STACK
            }
            LayerField::CornerRadius => {
                self.corner_radius = incoming.corner_radius;
                LayerChanges::CORNER_RADIUS
            }
            LayerField::BackgroundBlurRadius => {
                self.background_blur_radius = incoming.background_blur_radius;
                LayerChanges::BACKGROUND_BLUR_RADIUS
            }
            LayerField::BlurRegions => {
                self.blur_regions = mem::take(&mut incoming.blur_regions);
                LayerChanges::BLUR_REGIONS
            }
            LayerField::RelativeLayer => {
                self.z = incoming.z;
                self.relative_layer = incoming.relative_layer.take();
                LayerChanges::RELATIVE_LAYER
            }
            LayerField::Reparent => {
                self.reparent = incoming.reparent.take();
                LayerChanges::REPARENT
            }
            LayerField::BufferTransform => {
                self.buffer_transform = incoming.buffer_transform;
                LayerChanges::BUFFER_TRANSFORM
            }
            LayerField::TransformToDisplayInverse => {
                self.transform_to_display_inverse = incoming.transform_to_display_inverse;
                LayerChanges::TRANSFORM_TO_DISPLAY_INVERSE
            }
            LayerField::Crop => {
                self.crop = incoming.crop;
                LayerChanges::CROP
            }
            LayerField::Buffer => {
                self.buffer_data = incoming.buffer_data.take();
                LayerChanges::BUFFER
            }
            LayerField::TrustedPresentationInfo => {
                self.trusted_presentation_thresholds = incoming.trusted_presentation_thresholds;
                self.trusted_presentation_listener =
                    mem::take(&mut incoming.trusted_presentation_listener);
                LayerChanges::TRUSTED_PRESENTATION_INFO
            }
            LayerField::Dataspace => {
                self.dataspace = incoming.dataspace;
                LayerChanges::DATASPACE
            }
            LayerField::ExtendedRangeBrightness => {
                self.current_hdr_sdr_ratio = incoming.current_hdr_sdr_ratio;
                self.desired_hdr_sdr_ratio = incoming.desired_hdr_sdr_ratio;
                LayerChanges::EXTENDED_RANGE_BRIGHTNESS
            }
            LayerField::CachingHint => {
                self.caching_hint = incoming.caching_hint;
                LayerChanges::CACHING_HINT
            }
            LayerField::HdrMetadata => {
                self.hdr_metadata = mem::take(&mut incoming.hdr_metadata);
                LayerChanges::HDR_METADATA
            }
            LayerField::SurfaceDamageRegion => {
                self.surface_damage_region = mem::take(&mut incoming.surface_damage_region);
                LayerChanges::SURFACE_DAMAGE_REGION
            }
            LayerField::Api => {
                self.api = incoming.api;
                LayerChanges::API
            }
            LayerField::SidebandStream => {
                self.sideband_stream = incoming.sideband_stream.take();
                LayerChanges::SIDEBAND_STREAM
            }
            LayerField::ColorTransform => {
                self.color_transform = incoming.color_transform;
                LayerChanges::COLOR_TRANSFORM
            }
            LayerField::HasListenerCallbacks => LayerChanges::HAS_LISTENER_CALLBACKS,
            LayerField::InputInfo => {
                self.window_info = mem::take(&mut incoming.window_info);
                LayerChanges::INPUT_INFO
            }
            LayerField::BackgroundColor => {
                self.background_color = incoming.background_color;
                self.background_dataspace = incoming.background_dataspace;
                LayerChanges::BACKGROUND_COLOR
            }
            LayerField::Metadata => {
                self.metadata.merge(&incoming.metadata, false);
                LayerChanges::METADATA
            }
            LayerField::ShadowRadius => {
                self.shadow_radius = incoming.shadow_radius;
                LayerChanges::SHADOW_RADIUS
            }
            LayerField::RenderBorder => {
                self.border_enabled = incoming.border_enabled;
                self.border_width = incoming.border_width;
                self.border_color = incoming.border_color;
                LayerChanges::RENDER_BORDER
            }
            LayerField::DefaultFrameRateCompatibility => {
                self.default_frame_rate_compatibility = incoming.default_frame_rate_compatibility;
                LayerChanges::DEFAULT_FRAME_RATE_COMPATIBILITY
            }
            LayerField::FrameRateSelectionPriority => {
                self.frame_rate_selection_priority = incoming.frame_rate_selection_priority;
                LayerChanges::FRAME_RATE_SELECTION_PRIORITY
            }
            LayerField::FrameRate => {
                self.frame_rate = incoming.frame_rate;
                LayerChanges::FRAME_RATE
            }
            LayerField::FrameRateCategory => {
                self.frame_rate_category = incoming.frame_rate_category;
                self.frame_rate_category_smooth_switch_only =
                    incoming.frame_rate_category_smooth_switch_only;
                LayerChanges::FRAME_RATE_CATEGORY
            }
            LayerField::FrameRateSelectionStrategy => {
                self.frame_rate_selection_strategy = incoming.frame_rate_selection_strategy;
                LayerChanges::FRAME_RATE_SELECTION_STRATEGY
            }
            LayerField::FixedTransformHint => {
                self.fixed_transform_hint = incoming.fixed_transform_hint;
                LayerChanges::FIXED_TRANSFORM_HINT
            }
            LayerField::AutoRefresh => {
                self.auto_refresh = incoming.auto_refresh;
                LayerChanges::AUTO_REFRESH
            }
            LayerField::TrustedOverlay => {
                self.is_trusted_overlay = incoming.is_trusted_overlay;
                LayerChanges::TRUSTED_OVERLAY
            }
            LayerField::Stretch => {
                self.stretch_effect = incoming.stretch_effect;
                LayerChanges::STRETCH
            }
            LayerField::BufferCrop => {
                self.buffer_crop = incoming.buffer_crop;
                LayerChanges::BUFFER_CROP
            }
            LayerField::DestinationFrame => {
                self.destination_frame = incoming.destination_frame;
                LayerChanges::DESTINATION_FRAME
            }
            LayerField::ProducerDisconnect => LayerChanges::PRODUCER_DISCONNECT,
            LayerField::DropInputMode => {
                self.drop_input_mode = incoming.drop_input_mode;
                LayerChanges::DROP_INPUT_MODE
            }
            LayerField::Color => {
                self.color.set_rgb(incoming.color.rgb());
                LayerChanges::COLOR
            }
            LayerField::ColorSpaceAgnostic => {
                self.color_space_agnostic = incoming.color_space_agnostic;
                LayerChanges::COLOR_SPACE_AGNOSTIC
            }
            LayerField::DimmingEnabled => {
                self.dimming_enabled = incoming.dimming_enabled;
                LayerChanges::DIMMING_ENABLED
            }
            LayerField::FlushJankData => LayerChanges::FLUSH_JANK_DATA,
        }
    }
}
