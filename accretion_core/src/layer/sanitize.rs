// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Permission filtering of a layer update.

use super::LayerUpdate;
use crate::audit::{AuditTarget, Auditor, FrameRateRejectedEvent, StripEvent, StrippedChange};
use crate::change::{LayerChanges, LayerField};
use crate::flags::LayerFlags;
use crate::frame_rate::{FrameRateValidator, StandardFrameRateValidator};
use crate::permission::Permissions;

/// The rule sanitize applies to one change kind.
#[derive(Clone, Copy, Debug)]
enum Guard {
    /// Anyone may set it.
    Open,
    /// Stripped unless the caller holds the permission.
    Requires(Permissions),
    /// Non-rect-preserving transforms need rotate or elevated.
    RectPreserving,
    /// The display-decoration sub-flag needs system-window.
    ///
    /// A refused write loses its mask bit as well as its value bit, so a
    /// later masked merge leaves the accumulator's decoration state as it
    /// was. Clearing only the value would turn the refused write into an
    /// explicit clear.
    DecorationFlag,
    /// Handed to the frame-rate validator.
    FrameRate,
}

const fn guard(kind: LayerField) -> Guard {
    match kind {
        LayerField::InputInfo
        | LayerField::TrustedOverlay
        | LayerField::DropInputMode
        | LayerField::FrameRateSelectionPriority => Guard::Requires(Permissions::ELEVATED),
        LayerField::Matrix => Guard::RectPreserving,
        LayerField::Flags => Guard::DecorationFlag,
        LayerField::FrameRate => Guard::FrameRate,
        LayerField::Position
        | LayerField::Layer
        | LayerField::Alpha
        | LayerField::TransparentRegion
        | LayerField::LayerStack
        | LayerField::CornerRadius
        | LayerField::BackgroundBlurRadius
        | LayerField::BlurRegions
        | LayerField::RelativeLayer
        | LayerField::Reparent
        | LayerField::BufferTransform
        | LayerField::TransformToDisplayInverse
        | LayerField::Crop
        | LayerField::Buffer
        | LayerField::TrustedPresentationInfo
        | LayerField::Dataspace
        | LayerField::ExtendedRangeBrightness
        | LayerField::CachingHint
        | LayerField::HdrMetadata
        | LayerField::SurfaceDamageRegion
        | LayerField::Api
        | LayerField::SidebandStream
        | LayerField::ColorTransform
        | LayerField::HasListenerCallbacks
        | LayerField::BackgroundColor
        | LayerField::Metadata
        | LayerField::ShadowRadius
        | LayerField::RenderBorder
        | LayerField::DefaultFrameRateCompatibility
        | LayerField::FrameRateCategory
        | LayerField::FrameRateSelectionStrategy
        | LayerField::FixedTransformHint
        | LayerField::AutoRefresh
        | LayerField::Stretch
        | LayerField::BufferCrop
        | LayerField::DestinationFrame
        | LayerField::ProducerDisconnect
        | LayerField::Color
        | LayerField::ColorSpaceAgnostic
        | LayerField::DimmingEnabled
        | LayerField::FlushJankData => Guard::Open,
    }
}

impl LayerUpdate {
    /// Context sanitize passes to the [`FrameRateValidator`].
    pub const SANITIZE_CONTEXT: &'static str = "LayerUpdate::sanitize";

    /// Removes every change `perms` does not allow and returns the removed
    /// kinds, using the stock frame-rate rules and no auditing.
    pub fn sanitize(&mut self, perms: Permissions) -> LayerChanges {
        self.sanitize_with(perms, &StandardFrameRateValidator, &mut Auditor::none())
    }

    /// Removes every change `perms` does not allow and returns the removed
    /// kinds.
    ///
    /// Each removal is reported to `auditor`. Stripping the display
    /// decoration sub-flag leaves the rest of the flags write in place, so
    /// [`Flags`](LayerField::Flags) is not part of the returned set in that
    /// case. Sanitize only ever removes; it never adds a kind.
    pub fn sanitize_with(
        &mut self,
        perms: Permissions,
        validator: &dyn FrameRateValidator,
        auditor: &mut Auditor<'_>,
    ) -> LayerChanges {
        let target = AuditTarget::Layer {
            layer_id: self.layer_id,
        };
        let mut removed = LayerChanges::empty();

        for kind in self.what.kinds() {
            let missing = match guard(kind) {
                Guard::Open => continue,
                Guard::Requires(required) => {
                    let missing = perms.missing(required);
                    if missing.is_empty() {
                        continue;
                    }
                    missing
                }
                Guard::RectPreserving => {
                    if perms.intersects(Permissions::ELEVATED | Permissions::ROTATE)
                        || self.matrix.preserves_rects()
                    {
                        continue;
                    }
                    Permissions::ROTATE
                }
                Guard::DecorationFlag => {
                    if self.flags.sets(LayerFlags::DISPLAY_DECORATION)
                        && !perms.contains(Permissions::SYSTEM_WINDOW)
                    {
                        self.flags.strip(LayerFlags::DISPLAY_DECORATION);
                        auditor.stripped(&StripEvent {
                            target,
                            change: StrippedChange::LayerFlag(LayerFlags::DISPLAY_DECORATION),
                            missing: Permissions::SYSTEM_WINDOW,
                        });
                    }
                    continue;
                }
                Guard::FrameRate => {
                    let Err(reason) = validator.validate(
                        &self.frame_rate,
                        Self::SANITIZE_CONTEXT,
                        perms.is_elevated(),
                    ) else {
                        continue;
                    };
                    auditor.frame_rate_rejected(&FrameRateRejectedEvent {
                        layer_id: self.layer_id,
                        context: Self::SANITIZE_CONTEXT,
                        request: self.frame_rate,
                        reason,
                    });
                    Permissions::empty()
                }
            };

            removed.insert(kind.flag());
            auditor.stripped(&StripEvent {
                target,
                change: StrippedChange::Layer(kind),
                missing,
            });
        }

        self.what.remove(removed);
        removed
    }
}
