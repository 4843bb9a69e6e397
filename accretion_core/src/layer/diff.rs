// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Semantic difference between a previous state and an incoming update.

use super::LayerUpdate;
use crate::change::{LayerChanges, LayerField};
use crate::handle::RemoteRef;

impl LayerUpdate {
    /// Returns the kinds claimed by `incoming` whose value differs from
    /// `self`, which is treated as the previously applied state.
    ///
    /// Most kinds compare by value; regions compare by covered area. Kinds
    /// whose payload has no meaningful equality are reported whenever they are
    /// claimed: both z-order kinds, blur regions, buffer, sideband stream,
    /// listener callbacks, input info, metadata, producer disconnect and
    /// flush jank data. Reparent compares the parent handle by identity.
    ///
    /// As in merge, reporting one z-order kind clears the other.
    #[must_use]
    pub fn diff(&self, incoming: &Self) -> LayerChanges {
        let mut changes = LayerChanges::empty();
        for kind in incoming.what.kinds() {
            if self.differs(kind, incoming) {
                changes.insert(kind.flag());
                if let Some(other) = kind.exclusive_with() {
                    changes.remove(other.flag());
                }
            }
        }
        changes
    }

    fn differs(&self, kind: LayerField, incoming: &Self) -> bool {
        let prev = self;
        match kind {
            LayerField::Layer
            | LayerField::RelativeLayer
            | LayerField::BlurRegions
            | LayerField::Buffer
            | LayerField::SidebandStream
            | LayerField::HasListenerCallbacks
            | LayerField::InputInfo
            | LayerField::Metadata
            | LayerField::ProducerDisconnect
            | LayerField::FlushJankData => true,

            LayerField::Reparent => !RemoteRef::same(
                prev.reparent.as_ref(),
                incoming.reparent.as_ref(),
            ),
            LayerField::TransparentRegion => !prev
                .transparent_region
                .has_same_rects(&incoming.transparent_region),
            LayerField::SurfaceDamageRegion => !prev
                .surface_damage_region
                .has_same_rects(&incoming.surface_damage_region),
            LayerField::Flags => incoming.flags.differs_from(&prev.flags),

            LayerField::Position => prev.x != incoming.x || prev.y != incoming.y,
            LayerField::Alpha => prev.color.a != incoming.color.a,
            LayerField::Color => prev.color.rgb() != incoming.color.rgb(),
            LayerField::Matrix => prev.matrix != incoming.matrix,
            LayerField::LayerStack => prev.layer_stack != incoming.layer_stack,
            LayerField::CornerRadius => prev.corner_radius != incoming.corner_radius,
            LayerField::BackgroundBlurRadius => {
                prev.background_blur_radius != incoming.background_blur_radius
            }
            LayerField::BufferTransform => prev.buffer_transform != incoming.buffer_transform,
            LayerField::TransformToDisplayInverse => {
                prev.transform_to_display_inverse != incoming.transform_to_display_inverse
            }
            LayerField::Crop => prev.crop != incoming.crop,
            LayerField::TrustedPresentationInfo => {
                prev.trusted_presentation_thresholds != incoming.trusted_presentation_thresholds
                    || prev.trusted_presentation_listener != incoming.trusted_presentation_listener
            }
            LayerField::Dataspace => prev.dataspace != incoming.dataspace,
            LayerField::ExtendedRangeBrightness => {
                prev.current_hdr_sdr_ratio != incoming.current_hdr_sdr_ratio
                    || prev.desired_hdr_sdr_ratio != incoming.desired_hdr_sdr_ratio
            }
            LayerField::CachingHint => prev.caching_hint != incoming.caching_hint,
            LayerField::HdrMetadata => prev.hdr_metadata != incoming.hdr_metadata,
            LayerField::Api => prev.api != incoming.api,
            LayerField::ColorTransform => prev.color_transform != incoming.color_transform,
            LayerField::BackgroundColor => {
                prev.background_color != incoming.background_color
                    || prev.background_dataspace != incoming.background_dataspace
            }
            LayerField::ShadowRadius => prev.shadow_radius != incoming.shadow_radius,
            LayerField::RenderBorder => {
                prev.border_enabled != incoming.border_enabled
                    || prev.border_width != incoming.border_width
                    || prev.border_color != incoming.border_color
            }
            LayerField::DefaultFrameRateCompatibility => {
                prev.default_frame_rate_compatibility != incoming.default_frame_rate_compatibility
            }
            LayerField::FrameRateSelectionPriority => {
                prev.frame_rate_selection_priority != incoming.frame_rate_selection_priority
            }
            LayerField::FrameRate => prev.frame_rate != incoming.frame_rate,
            LayerField::FrameRateCategory => {
                prev.frame_rate_category != incoming.frame_rate_category
                    || prev.frame_rate_category_smooth_switch_only
                        != incoming.frame_rate_category_smooth_switch_only
            }
            LayerField::FrameRateSelectionStrategy => {
                prev.frame_rate_selection_strategy != incoming.frame_rate_selection_strategy
            }
            LayerField::FixedTransformHint => {
                prev.fixed_transform_hint != incoming.fixed_transform_hint
            }
            LayerField::AutoRefresh => prev.auto_refresh != incoming.auto_refresh,
            LayerField::TrustedOverlay => prev.is_trusted_overlay != incoming.is_trusted_overlay,
            LayerField::Stretch => prev.stretch_effect != incoming.stretch_effect,
            LayerField::BufferCrop => prev.buffer_crop != incoming.buffer_crop,
            LayerField::DestinationFrame => prev.destination_frame != incoming.destination_frame,
            LayerField::DropInputMode => prev.drop_input_mode != incoming.drop_input_mode,
            LayerField::ColorSpaceAgnostic => {
                prev.color_space_agnostic != incoming.color_space_agnostic
            }
            LayerField::DimmingEnabled => prev.dimming_enabled != incoming.dimming_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{LayerFlags, MaskedFlags};
    use crate::geometry::{Rect, Region};
    use crate::handle::ObjectId;
    use crate::layer::testing::populated;

    const PRESENCE_BASED: LayerChanges = LayerChanges::RELATIVE_LAYER
        .union(LayerChanges::BLUR_REGIONS)
        .union(LayerChanges::BUFFER)
        .union(LayerChanges::SIDEBAND_STREAM)
        .union(LayerChanges::HAS_LISTENER_CALLBACKS)
        .union(LayerChanges::INPUT_INFO)
        .union(LayerChanges::METADATA)
        .union(LayerChanges::PRODUCER_DISCONNECT)
        .union(LayerChanges::FLUSH_JANK_DATA);

    #[test]
    fn identical_values_only_report_presence_based_kinds() {
        let mut u = populated();
        u.what = LayerChanges::all();
        // Layer and RelativeLayer are both claimed; the later kind wins.
        assert_eq!(u.diff(&u.clone()), PRESENCE_BASED);
    }

    #[test]
    fn unclaimed_kinds_are_never_reported() {
        let prev = LayerUpdate::default();
        let mut incoming = populated();
        incoming.what = LayerChanges::CROP;
        assert_eq!(prev.diff(&incoming), LayerChanges::CROP);
    }

    #[test]
    fn position_change_is_reported() {
        let mut prev = LayerUpdate::default();
        prev.set_position(0.0, 7.0);
        let mut incoming = LayerUpdate::default();
        incoming.set_position(5.0, 7.0);
        assert_eq!(prev.diff(&incoming), LayerChanges::POSITION);

        incoming.set_position(0.0, 7.0);
        assert!(prev.diff(&incoming).is_empty());
    }

    #[test]
    fn regions_compare_by_coverage() {
        let mut prev = LayerUpdate::default();
        prev.set_transparent_region(Region::from_rect(Rect::new(0, 0, 10, 10)));

        let mut split = Region::new();
        split.add(Rect::new(0, 0, 10, 5));
        split.add(Rect::new(0, 5, 10, 10));
        let mut incoming = LayerUpdate::default();
        incoming.set_transparent_region(split);
        assert!(prev.diff(&incoming).is_empty());

        incoming.set_transparent_region(Region::from_rect(Rect::new(0, 0, 10, 11)));
        assert_eq!(prev.diff(&incoming), LayerChanges::TRANSPARENT_REGION);
    }

    #[test]
    fn flags_compare_under_the_incoming_mask() {
        let prev = LayerUpdate {
            flags: MaskedFlags::new(
                LayerFlags::HIDDEN | LayerFlags::SECURE,
                LayerFlags::HIDDEN | LayerFlags::SECURE,
            ),
            ..LayerUpdate::default()
        };

        let mut incoming = LayerUpdate::default();
        incoming.set_flag(LayerFlags::HIDDEN, true);
        assert!(prev.diff(&incoming).is_empty());

        incoming.set_flag(LayerFlags::SECURE, false);
        assert_eq!(prev.diff(&incoming), LayerChanges::FLAGS);
    }

    #[test]
    fn reparent_compares_parent_identity() {
        let parent = RemoteRef::new(ObjectId(3));
        let mut prev = LayerUpdate::default();
        prev.reparent(Some(parent.clone()));

        let mut incoming = LayerUpdate::default();
        incoming.reparent(Some(parent));
        assert!(prev.diff(&incoming).is_empty());

        // Same id, different object.
        incoming.reparent(Some(RemoteRef::new(ObjectId(3))));
        assert_eq!(prev.diff(&incoming), LayerChanges::REPARENT);

        incoming.reparent(None);
        assert_eq!(prev.diff(&incoming), LayerChanges::REPARENT);
    }

    #[test]
    fn z_order_kinds_are_presence_based_and_exclusive() {
        let mut prev = LayerUpdate::default();
        prev.set_layer(2);
        let mut incoming = LayerUpdate::default();
        incoming.set_layer(2);
        assert_eq!(prev.diff(&incoming), LayerChanges::LAYER);

        incoming.what |= LayerChanges::RELATIVE_LAYER;
        assert_eq!(prev.diff(&incoming), LayerChanges::RELATIVE_LAYER);
    }

    #[test]
    fn alpha_and_color_are_separate() {
        let prev = LayerUpdate::default();
        let mut incoming = LayerUpdate::default();
        incoming.set_alpha(0.0).set_color([0.0, 0.0, 1.0]);
        assert_eq!(prev.diff(&incoming), LayerChanges::COLOR);
    }
}
