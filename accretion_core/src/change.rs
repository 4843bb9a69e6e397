// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change kinds for layer and display updates.
//!
//! Each mutable attribute group of a [`LayerUpdate`](crate::layer::LayerUpdate)
//! or [`DisplayUpdate`](crate::display::DisplayUpdate) owns exactly one change
//! kind. The kinds exist in two forms generated from a single list:
//!
//! - an enum ([`LayerField`], [`DisplayField`]) that merge, diff, sanitize and
//!   the lockstep tests match on exhaustively, and
//! - a fixed-width bit set ([`LayerChanges`], [`DisplayChanges`]) that is the
//!   `what` mask carried by every update and sent over the wire.
//!
//! # Exclusive pair
//!
//! [`LayerField::Layer`] (absolute z-order) and [`LayerField::RelativeLayer`]
//! are two representations of the same ordering attribute. Setting one always
//! clears the other, both in merge and in diff.

macro_rules! change_kinds {
    (
        $(#[$field_meta:meta])*
        pub enum $field:ident;
        $(#[$set_meta:meta])*
        pub struct $set:ident: $bits:ty;
        $(
            $(#[$($doc:tt)*])*
            $variant:ident => $flag:ident = $shift:literal, $name:literal;
        )*
    ) => {
        $(#[$field_meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $field {
            $( $(#[$($doc)*])* $variant, )*
        }

        bitflags::bitflags! {
            $(#[$set_meta])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            pub struct $set: $bits {
                $( $(#[$($doc)*])* const $flag = 1 << $shift; )*
            }
        }

        impl $field {
            /// Every change kind, in canonical order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )* ];

            /// Returns the single bit this kind owns in the `what` mask.
            #[must_use]
            pub const fn flag(self) -> $set {
                match self {
                    $( Self::$variant => $set::$flag, )*
                }
            }

            /// Returns a short stable name for diagnostics.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }
        }

        impl $set {
            /// Iterates the change kinds present in this set, in canonical
            /// order. Bits with no corresponding kind are skipped.
            pub fn kinds(self) -> impl Iterator<Item = $field> {
                $field::ALL
                    .iter()
                    .copied()
                    .filter(move |kind| self.contains(kind.flag()))
            }
        }
    };
}

change_kinds! {
    /// One mutable attribute group of a layer.
    pub enum LayerField;
    /// The `what` mask of a [`LayerUpdate`](crate::layer::LayerUpdate).
    pub struct LayerChanges: u64;

    /// Position (`x`, `y`).
    Position => POSITION = 0, "position";
    /// Absolute z-order. Exclusive with [`RelativeLayer`](Self::RelativeLayer).
    Layer => LAYER = 1, "layer";
    /// Alpha channel of the layer color.
    Alpha => ALPHA = 2, "alpha";
    /// 2×2 linear transform.
    Matrix => MATRIX = 3, "matrix";
    /// Transparent region hint.
    TransparentRegion => TRANSPARENT_REGION = 4, "transparent-region";
    /// Boolean sub-flags with a validity mask.
    Flags => FLAGS = 5, "flags";
    /// Layer stack assignment.
    LayerStack => LAYER_STACK = 6, "layer-stack";
    /// Corner radius.
    CornerRadius => CORNER_RADIUS = 7, "corner-radius";
    /// Background blur radius.
    BackgroundBlurRadius => BACKGROUND_BLUR_RADIUS = 8, "background-blur-radius";
    /// Per-region blur descriptors.
    BlurRegions => BLUR_REGIONS = 9, "blur-regions";
    /// Z-order relative to another layer. Exclusive with [`Layer`](Self::Layer).
    RelativeLayer => RELATIVE_LAYER = 10, "relative-layer";
    /// New parent layer.
    Reparent => REPARENT = 11, "reparent";
    /// Buffer transform (flip/rotate bits).
    BufferTransform => BUFFER_TRANSFORM = 12, "buffer-transform";
    /// Apply the inverse display transform to the buffer.
    TransformToDisplayInverse => TRANSFORM_TO_DISPLAY_INVERSE = 13, "transform-to-display-inverse";
    /// Crop rectangle.
    Crop => CROP = 14, "crop";
    /// Buffer attachment.
    Buffer => BUFFER = 15, "buffer";
    /// Trusted-presentation thresholds and listener.
    TrustedPresentationInfo => TRUSTED_PRESENTATION_INFO = 16, "trusted-presentation-info";
    /// Buffer dataspace.
    Dataspace => DATASPACE = 17, "dataspace";
    /// Extended dynamic-range brightness ratios.
    ExtendedRangeBrightness => EXTENDED_RANGE_BRIGHTNESS = 18, "extended-range-brightness";
    /// Caching hint.
    CachingHint => CACHING_HINT = 19, "caching-hint";
    /// HDR static metadata.
    HdrMetadata => HDR_METADATA = 20, "hdr-metadata";
    /// Surface damage region.
    SurfaceDamageRegion => SURFACE_DAMAGE_REGION = 21, "surface-damage-region";
    /// Producer API tag.
    Api => API = 22, "api";
    /// Sideband stream handle.
    SidebandStream => SIDEBAND_STREAM = 23, "sideband-stream";
    /// 4×4 color transform.
    ColorTransform => COLOR_TRANSFORM = 24, "color-transform";
    /// Listener callback registrations changed.
    HasListenerCallbacks => HAS_LISTENER_CALLBACKS = 25, "has-listener-callbacks";
    /// Input routing info.
    InputInfo => INPUT_INFO = 26, "input-info";
    /// Background color and its dataspace.
    BackgroundColor => BACKGROUND_COLOR = 27, "background-color";
    /// Metadata map.
    Metadata => METADATA = 28, "metadata";
    /// Shadow radius.
    ShadowRadius => SHADOW_RADIUS = 29, "shadow-radius";
    /// Border enabled, width, and color.
    RenderBorder => RENDER_BORDER = 30, "render-border";
    /// Default frame-rate compatibility.
    DefaultFrameRateCompatibility => DEFAULT_FRAME_RATE_COMPATIBILITY = 31, "default-frame-rate-compatibility";
    /// Frame-rate selection priority.
    FrameRateSelectionPriority => FRAME_RATE_SELECTION_PRIORITY = 32, "frame-rate-selection-priority";
    /// Frame rate, compatibility, and change strategy.
    FrameRate => FRAME_RATE = 33, "frame-rate";
    /// Frame-rate category and smooth-switch-only flag.
    FrameRateCategory => FRAME_RATE_CATEGORY = 34, "frame-rate-category";
    /// Frame-rate selection strategy.
    FrameRateSelectionStrategy => FRAME_RATE_SELECTION_STRATEGY = 35, "frame-rate-selection-strategy";
    /// Fixed orientation hint.
    FixedTransformHint => FIXED_TRANSFORM_HINT = 36, "fixed-transform-hint";
    /// Auto-refresh mode.
    AutoRefresh => AUTO_REFRESH = 37, "auto-refresh";
    /// Trusted-overlay flag.
    TrustedOverlay => TRUSTED_OVERLAY = 38, "trusted-overlay";
    /// Stretch effect.
    Stretch => STRETCH = 39, "stretch";
    /// Buffer crop rectangle.
    BufferCrop => BUFFER_CROP = 40, "buffer-crop";
    /// Destination frame rectangle.
    DestinationFrame => DESTINATION_FRAME = 41, "destination-frame";
    /// Producer disconnected (no payload).
    ProducerDisconnect => PRODUCER_DISCONNECT = 42, "producer-disconnect";
    /// Input drop mode.
    DropInputMode => DROP_INPUT_MODE = 43, "drop-input-mode";
    /// RGB channels of the layer color.
    Color => COLOR = 44, "color";
    /// Color-space agnostic flag.
    ColorSpaceAgnostic => COLOR_SPACE_AGNOSTIC = 45, "color-space-agnostic";
    /// Dimming enabled flag.
    DimmingEnabled => DIMMING_ENABLED = 46, "dimming-enabled";
    /// Flush pending jank data (no payload).
    FlushJankData => FLUSH_JANK_DATA = 47, "flush-jank-data";
}

change_kinds! {
    /// One mutable attribute group of a display.
    pub enum DisplayField;
    /// The `what` mask of a [`DisplayUpdate`](crate::display::DisplayUpdate).
    pub struct DisplayChanges: u32;

    /// Producer surface.
    Surface => SURFACE = 0, "surface";
    /// Layer stack assignment.
    LayerStack => LAYER_STACK = 1, "layer-stack";
    /// Orientation and the two projection rectangles.
    Projection => PROJECTION = 2, "projection";
    /// Width and height.
    Size => SIZE = 3, "size";
    /// Display flags.
    Flags => FLAGS = 4, "flags";
}

impl LayerField {
    /// Returns the other half of the z-order exclusive pair, if this kind is
    /// one of them.
    #[must_use]
    pub const fn exclusive_with(self) -> Option<Self> {
        match self {
            Self::Layer => Some(Self::RelativeLayer),
            Self::RelativeLayer => Some(Self::Layer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_layer_kind_owns_a_distinct_bit() {
        let mut seen = LayerChanges::empty();
        for kind in LayerField::ALL {
            let flag = kind.flag();
            assert_eq!(flag.bits().count_ones(), 1, "{kind:?} must own one bit");
            assert!(!seen.intersects(flag), "{kind:?} reuses a bit");
            seen |= flag;
        }
        assert_eq!(seen, LayerChanges::all());
        assert_eq!(LayerField::ALL.len(), 48);
    }

    #[test]
    fn every_display_kind_owns_a_distinct_bit() {
        let mut seen = DisplayChanges::empty();
        for kind in DisplayField::ALL {
            assert!(!seen.intersects(kind.flag()), "{kind:?} reuses a bit");
            seen |= kind.flag();
        }
        assert_eq!(seen, DisplayChanges::all());
    }

    #[test]
    fn kinds_iterates_in_canonical_order() {
        let set = LayerChanges::CROP | LayerChanges::POSITION | LayerChanges::FLUSH_JANK_DATA;
        let kinds: alloc::vec::Vec<_> = set.kinds().collect();
        assert_eq!(
            kinds,
            [LayerField::Position, LayerField::Crop, LayerField::FlushJankData]
        );
    }

    #[test]
    fn kinds_skips_unknown_bits() {
        let set = LayerChanges::from_bits_retain(1 << 63) | LayerChanges::ALPHA;
        assert_eq!(set.kinds().count(), 1);
    }

    #[test]
    fn names_are_unique() {
        for (i, a) in LayerField::ALL.iter().enumerate() {
            for b in &LayerField::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn z_order_pair_is_symmetric() {
        assert_eq!(
            LayerField::Layer.exclusive_with(),
            Some(LayerField::RelativeLayer)
        );
        assert_eq!(
            LayerField::RelativeLayer.exclusive_with(),
            Some(LayerField::Layer)
        );
        assert_eq!(LayerField::Crop.exclusive_with(), None);
    }
}
