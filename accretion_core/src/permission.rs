// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller permissions consulted by sanitize.

bitflags::bitflags! {
    /// Permissions granted to the caller that produced an update.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        /// Full compositor access. Required for input routing, trusted
        /// overlays, display projection and surfaces, and similar.
        const ELEVATED = 1 << 0;
        /// May apply transforms that do not preserve rectangles.
        const ROTATE = 1 << 1;
        /// May mark layers as internal system windows such as display
        /// decorations.
        const SYSTEM_WINDOW = 1 << 2;
    }
}

impl Permissions {
    /// Returns the missing part of `required`, or empty if all are granted.
    #[must_use]
    pub fn missing(self, required: Self) -> Self {
        required.difference(self)
    }

    /// Returns whether the caller is privileged for validation purposes.
    #[must_use]
    pub fn is_elevated(self) -> bool {
        self.contains(Self::ELEVATED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reports_the_gap() {
        let granted = Permissions::ROTATE;
        assert_eq!(
            granted.missing(Permissions::ELEVATED | Permissions::ROTATE),
            Permissions::ELEVATED
        );
        assert!(granted.missing(Permissions::ROTATE).is_empty());
        assert!(!granted.is_elevated());
    }
}
