// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sparse per-display update record.

use crate::attributes::{LayerStack, Rotation};
use crate::audit::{AuditTarget, Auditor, StripEvent, StrippedChange, UnmergedEvent};
use crate::change::{DisplayChanges, DisplayField};
use crate::geometry::Rect;
use crate::handle::RemoteRef;
use crate::permission::Permissions;
use crate::wire::{Reader, Wire, WireError, Writer};

/// A sparse update to one display.
///
/// Same conventions as [`LayerUpdate`](crate::layer::LayerUpdate): only the
/// groups in `what` are authoritative.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayUpdate {
    /// Handle of the target display.
    pub token: Option<RemoteRef>,
    /// [`DisplayField::Surface`].
    pub surface: Option<RemoteRef>,
    /// Authoritative attribute groups.
    pub what: DisplayChanges,
    /// [`DisplayField::Flags`].
    pub flags: u32,
    /// [`DisplayField::LayerStack`].
    pub layer_stack: LayerStack,
    /// [`DisplayField::Projection`] orientation.
    pub orientation: Rotation,
    /// [`DisplayField::Projection`] source rectangle in layer-stack space.
    pub layer_stack_space_rect: Rect,
    /// [`DisplayField::Projection`] destination rectangle in oriented display
    /// space.
    pub oriented_display_space_rect: Rect,
    /// [`DisplayField::Size`] width.
    pub width: u32,
    /// [`DisplayField::Size`] height.
    pub height: u32,
}

impl Default for DisplayUpdate {
    fn default() -> Self {
        Self {
            token: None,
            surface: None,
            what: DisplayChanges::empty(),
            flags: 0,
            layer_stack: LayerStack::INVALID,
            orientation: Rotation::Rotation0,
            layer_stack_space_rect: Rect::EMPTY,
            oriented_display_space_rect: Rect::EMPTY,
            width: 0,
            height: 0,
        }
    }
}

impl DisplayUpdate {
    /// Creates an empty update for the given display.
    #[must_use]
    pub fn new(token: RemoteRef) -> Self {
        Self {
            token: Some(token),
            ..Self::default()
        }
    }

    /// Returns whether `kind` is authoritative in this update.
    #[must_use]
    pub fn has(&self, kind: DisplayField) -> bool {
        self.what.contains(kind.flag())
    }

    /// Attaches a producer surface, or detaches it with `None`.
    pub fn set_surface(&mut self, surface: Option<RemoteRef>) -> &mut Self {
        self.surface = surface;
        self.what.insert(DisplayChanges::SURFACE);
        self
    }

    /// Shows a layer stack on this display.
    pub fn set_layer_stack(&mut self, stack: LayerStack) -> &mut Self {
        self.layer_stack = stack;
        self.what.insert(DisplayChanges::LAYER_STACK);
        self
    }

    /// Sets the orientation and the projection rectangles.
    pub fn set_projection(
        &mut self,
        orientation: Rotation,
        layer_stack_space_rect: Rect,
        oriented_display_space_rect: Rect,
    ) -> &mut Self {
        self.orientation = orientation;
        self.layer_stack_space_rect = layer_stack_space_rect;
        self.oriented_display_space_rect = oriented_display_space_rect;
        self.what.insert(DisplayChanges::PROJECTION);
        self
    }

    /// Resizes the display.
    pub fn set_size(&mut self, width: u32, height: u32) -> &mut Self {
        self.width = width;
        self.height = height;
        self.what.insert(DisplayChanges::SIZE);
        self
    }

    /// Replaces the display flags.
    pub fn set_flags(&mut self, flags: u32) -> &mut Self {
        self.flags = flags;
        self.what.insert(DisplayChanges::FLAGS);
        self
    }

    /// Folds `incoming` into `self`, last writer wins per group.
    pub fn merge(&mut self, incoming: Self) {
        self.merge_with(incoming, &mut Auditor::none());
    }

    /// Like [`merge`](Self::merge), reporting unhandled bits to `auditor`.
    pub fn merge_with(&mut self, mut incoming: Self, auditor: &mut Auditor<'_>) {
        let claimed = incoming.what;
        let mut handled = DisplayChanges::empty();
        for kind in claimed.kinds() {
            let merged = match kind {
                DisplayField::Surface => {
                    self.surface = incoming.surface.take();
                    DisplayChanges::SURFACE
                }
                DisplayField::LayerStack => {
                    self.layer_stack = incoming.layer_stack;
                    DisplayChanges::LAYER_STACK
                }
                DisplayField::Projection => {
                    self.orientation = incoming.orientation;
                    self.layer_stack_space_rect = incoming.layer_stack_space_rect;
                    self.oriented_display_space_rect = incoming.oriented_display_space_rect;
                    DisplayChanges::PROJECTION
                }
                DisplayField::Size => {
                    self.width = incoming.width;
                    self.height = incoming.height;
                    DisplayChanges::SIZE
                }
                DisplayField::Flags => {
                    self.flags = incoming.flags;
                    DisplayChanges::FLAGS
                }
            };
            self.what |= merged;
            handled |= merged;
        }

        let unmerged = claimed.bits() & !handled.bits();
        if unmerged != 0 {
            auditor.unmerged(&UnmergedEvent {
                target: AuditTarget::Display,
                incoming: u64::from(claimed.bits()),
                merged: u64::from(self.what.bits()),
                unmerged: u64::from(unmerged),
            });
        }
        debug_assert!(
            unmerged == 0,
            "unmerged display changes {unmerged:#x}; merge needs a case for them"
        );
    }

    /// Removes every change `perms` does not allow and returns the removed
    /// kinds.
    pub fn sanitize(&mut self, perms: Permissions) -> DisplayChanges {
        self.sanitize_with(perms, &mut Auditor::none())
    }

    /// Like [`sanitize`](Self::sanitize), reporting each removal to `auditor`.
    ///
    /// Surface, layer stack, and projection need
    /// [`ELEVATED`](Permissions::ELEVATED); size and flags are open.
    pub fn sanitize_with(
        &mut self,
        perms: Permissions,
        auditor: &mut Auditor<'_>,
    ) -> DisplayChanges {
        let mut removed = DisplayChanges::empty();
        for kind in self.what.kinds() {
            let required = match kind {
                DisplayField::Surface | DisplayField::LayerStack | DisplayField::Projection => {
                    Permissions::ELEVATED
                }
                DisplayField::Size | DisplayField::Flags => continue,
            };
            let missing = perms.missing(required);
            if missing.is_empty() {
                continue;
            }
            removed.insert(kind.flag());
            auditor.stripped(&StripEvent {
                target: AuditTarget::Display,
                change: StrippedChange::Display(kind),
                missing,
            });
        }
        self.what.remove(removed);
        removed
    }
}

impl Wire for DisplayUpdate {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_object(self.token.as_ref())?;
        out.write_object(self.surface.as_ref())?;
        out.write_u32(self.what.bits())?;
        out.write_u32(self.flags)?;
        out.write_u32(self.layer_stack.0)?;
        self.orientation.write(out)?;
        self.layer_stack_space_rect.write(out)?;
        self.oriented_display_space_rect.write(out)?;
        out.write_u32(self.width)?;
        out.write_u32(self.height)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let token = input.read_object()?;
        let surface = input.read_object()?;
        let bits = input.read_u32()?;
        let what = DisplayChanges::from_bits(bits).ok_or(WireError::UnknownChangeBits(
            u64::from(bits & !DisplayChanges::all().bits()),
        ))?;
        Ok(Self {
            token,
            surface,
            what,
            flags: input.read_u32()?,
            layer_stack: LayerStack(input.read_u32()?),
            orientation: Rotation::read(input)?,
            layer_stack_space_rect: Rect::read(input)?,
            oriented_display_space_rect: Rect::read(input)?,
            width: input.read_u32()?,
            height: input.read_u32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ObjectId;
    use crate::wire::Parcel;

    fn display() -> DisplayUpdate {
        DisplayUpdate::new(RemoteRef::new(ObjectId(1)))
    }

    #[test]
    fn merge_copies_claimed_groups_only() {
        let mut acc = display();
        acc.set_size(1080, 1920).set_flags(1);

        let mut incoming = display();
        incoming.set_projection(
            Rotation::Rotation90,
            Rect::from_size(1080, 1920),
            Rect::from_size(1920, 1080),
        );
        incoming.width = 1;

        acc.merge(incoming);
        assert_eq!(
            acc.what,
            DisplayChanges::SIZE | DisplayChanges::FLAGS | DisplayChanges::PROJECTION
        );
        assert_eq!((acc.width, acc.height), (1080, 1920));
        assert_eq!(acc.orientation, Rotation::Rotation90);
        assert_eq!(acc.oriented_display_space_rect, Rect::from_size(1920, 1080));
    }

    #[test]
    fn merge_replaces_the_surface_handle() {
        let surface = RemoteRef::new(ObjectId(5));
        let mut acc = display();
        acc.set_surface(Some(RemoteRef::new(ObjectId(4))));
        let mut incoming = display();
        incoming.set_surface(Some(surface.clone()));
        acc.merge(incoming);
        assert_eq!(acc.surface, Some(surface));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "unmerged display changes")]
    fn unknown_bits_are_a_defect() {
        let mut incoming = display();
        incoming.what = DisplayChanges::from_bits_retain(1 << 20);
        display().merge(incoming);
    }

    #[cfg(all(feature = "audit", not(debug_assertions)))]
    #[test]
    fn unknown_bits_are_audited_against_the_display() {
        use crate::audit::AuditSink;

        #[derive(Default)]
        struct Last(Option<UnmergedEvent>);

        impl AuditSink for Last {
            fn on_unmerged(&mut self, e: &UnmergedEvent) {
                self.0 = Some(*e);
            }
        }

        let mut sink = Last::default();
        let mut incoming = display();
        incoming.what = DisplayChanges::from_bits_retain(1 << 20) | DisplayChanges::SIZE;
        display().merge_with(incoming, &mut Auditor::new(&mut sink));

        let e = sink.0.expect("defect reported");
        assert_eq!(e.target, AuditTarget::Display);
        assert_eq!(e.unmerged, 1 << 20);
        assert_eq!(e.merged, u64::from(DisplayChanges::SIZE.bits()));
    }

    #[test]
    fn unprivileged_callers_keep_only_size_and_flags() {
        let mut u = display();
        u.set_surface(None)
            .set_layer_stack(LayerStack(3))
            .set_projection(Rotation::Rotation0, Rect::EMPTY, Rect::EMPTY)
            .set_size(10, 10)
            .set_flags(0);

        let mut elevated = u.clone();
        assert!(elevated.sanitize(Permissions::ELEVATED).is_empty());

        let removed = u.sanitize(Permissions::ROTATE);
        assert_eq!(
            removed,
            DisplayChanges::SURFACE | DisplayChanges::LAYER_STACK | DisplayChanges::PROJECTION
        );
        assert_eq!(u.what, DisplayChanges::SIZE | DisplayChanges::FLAGS);
    }

    #[cfg(feature = "audit")]
    #[test]
    fn display_strips_are_audited() {
        use crate::audit::AuditSink;
        use alloc::vec::Vec;

        #[derive(Default)]
        struct Log(Vec<StripEvent>);

        impl AuditSink for Log {
            fn on_stripped(&mut self, e: &StripEvent) {
                self.0.push(*e);
            }
        }

        let mut u = display();
        u.set_layer_stack(LayerStack(1));
        let mut log = Log::default();
        u.sanitize_with(Permissions::empty(), &mut Auditor::new(&mut log));
        assert_eq!(
            log.0,
            [StripEvent {
                target: AuditTarget::Display,
                change: StrippedChange::Display(DisplayField::LayerStack),
                missing: Permissions::ELEVATED,
            }]
        );
    }

    #[test]
    fn wire_round_trip() {
        let mut u = display();
        u.set_surface(Some(RemoteRef::new(ObjectId(2))))
            .set_projection(
                Rotation::Rotation270,
                Rect::new(0, 0, 100, 200),
                Rect::new(10, 10, 210, 110),
            )
            .set_size(200, 100);

        let mut p = Parcel::new();
        u.write(&mut p).unwrap();
        assert_eq!(DisplayUpdate::read(&mut p).unwrap(), u);
    }

    #[test]
    fn unknown_orientation_is_rejected() {
        let mut p = Parcel::new();
        display().write(&mut p).unwrap();
        let mut bytes = p.as_bytes().to_vec();
        // token, surface, what, flags, layer stack, then orientation.
        bytes[20..24].copy_from_slice(&9_u32.to_le_bytes());
        let mut tampered = Parcel::from_parts(bytes, p.objects().to_vec());
        assert!(matches!(
            DisplayUpdate::read(&mut tampered),
            Err(WireError::InvalidDiscriminant { kind: "Rotation", value: 9 })
        ));
    }
}
