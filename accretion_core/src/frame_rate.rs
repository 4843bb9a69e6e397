// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-rate vote parameters and their validation.
//!
//! Sanitize does not judge frame-rate requests itself. It hands them to a
//! [`FrameRateValidator`] and strips the request when the validator rejects
//! it. [`StandardFrameRateValidator`] implements the stock rules.

use core::fmt;

/// How a frame-rate vote should be interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameRateCompatibility(pub i8);

impl FrameRateCompatibility {
    /// Let the compositor decide.
    pub const DEFAULT: Self = Self(0);
    /// Content has a fixed source rate (video).
    pub const FIXED_SOURCE: Self = Self(1);
    /// Any rate at or above the requested one.
    pub const GTE: Self = Self(2);
    /// Exactly the requested rate. Privileged.
    pub const EXACT: Self = Self(100);
    /// Layer does not vote. Privileged.
    pub const NO_VOTE: Self = Self(101);
}

/// When a display mode switch may happen for a new vote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChangeFrameRateStrategy(pub i8);

impl ChangeFrameRateStrategy {
    /// Switch only if the switch is seamless.
    pub const ONLY_IF_SEAMLESS: Self = Self(0);
    /// Switch even if it causes a visible interruption.
    pub const ALWAYS: Self = Self(1);
}

/// Coarse frame-rate category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameRateCategory(pub i8);

impl FrameRateCategory {
    /// No category.
    pub const DEFAULT: Self = Self(0);
    /// No preference.
    pub const NO_PREFERENCE: Self = Self(1);
    /// Low rate.
    pub const LOW: Self = Self(2);
    /// Normal rate.
    pub const NORMAL: Self = Self(3);
    /// High rate, as a hint only.
    pub const HIGH_HINT: Self = Self(4);
    /// High rate.
    pub const HIGH: Self = Self(5);
}

/// How a layer's vote propagates to its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameRateSelectionStrategy(pub i8);

impl FrameRateSelectionStrategy {
    /// Children inherit the vote unless they vote themselves.
    pub const PROPAGATE: Self = Self(0);
    /// The vote overrides the children's votes.
    pub const OVERRIDE_CHILDREN: Self = Self(1);
    /// The vote applies to this layer only.
    pub const SELF: Self = Self(2);
}

/// The three values a frame-rate change carries together.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameRateRequest {
    /// Requested rate in Hz; zero withdraws the vote.
    pub rate: f32,
    /// How the vote is interpreted.
    pub compatibility: FrameRateCompatibility,
    /// When a mode switch may happen.
    pub change_strategy: ChangeFrameRateStrategy,
}

/// Why a frame-rate request was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameRateRejection {
    /// The rate is negative or not finite.
    InvalidRate,
    /// The compatibility value is unknown, or privileged and the caller is
    /// not.
    InvalidCompatibility {
        /// The offending value.
        value: FrameRateCompatibility,
        /// Whether the caller was privileged.
        privileged: bool,
    },
    /// The change strategy is unknown.
    InvalidChangeStrategy(ChangeFrameRateStrategy),
}

impl fmt::Display for FrameRateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRate => f.write_str("invalid frame rate"),
            Self::InvalidCompatibility { value, privileged } => write!(
                f,
                "invalid frame rate compatibility {} (privileged: {privileged})",
                value.0
            ),
            Self::InvalidChangeStrategy(strategy) => {
                write!(f, "invalid change frame rate strategy {}", strategy.0)
            }
        }
    }
}

impl core::error::Error for FrameRateRejection {}

/// Judges whether a frame-rate request is acceptable.
pub trait FrameRateValidator {
    /// Returns `Ok` if the request may be applied. `privileged` callers may be
    /// allowed values that standard callers are not.
    ///
    /// `context` names the operation asking, for the validator's own
    /// diagnostics.
    fn validate(
        &self,
        request: &FrameRateRequest,
        context: &'static str,
        privileged: bool,
    ) -> Result<(), FrameRateRejection>;
}

/// The stock frame-rate rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardFrameRateValidator;

impl FrameRateValidator for StandardFrameRateValidator {
    fn validate(
        &self,
        request: &FrameRateRequest,
        _context: &'static str,
        privileged: bool,
    ) -> Result<(), FrameRateRejection> {
        if !request.rate.is_finite() || request.rate < 0.0 {
            return Err(FrameRateRejection::InvalidRate);
        }

        let compatibility = request.compatibility;
        let allowed = match compatibility {
            FrameRateCompatibility::DEFAULT
            | FrameRateCompatibility::FIXED_SOURCE
            | FrameRateCompatibility::GTE => true,
            FrameRateCompatibility::EXACT | FrameRateCompatibility::NO_VOTE => privileged,
            _ => false,
        };
        if !allowed {
            return Err(FrameRateRejection::InvalidCompatibility {
                value: compatibility,
                privileged,
            });
        }

        match request.change_strategy {
            ChangeFrameRateStrategy::ONLY_IF_SEAMLESS | ChangeFrameRateStrategy::ALWAYS => Ok(()),
            other => Err(FrameRateRejection::InvalidChangeStrategy(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str = "test";

    fn request(rate: f32, compatibility: FrameRateCompatibility) -> FrameRateRequest {
        FrameRateRequest {
            rate,
            compatibility,
            change_strategy: ChangeFrameRateStrategy::ONLY_IF_SEAMLESS,
        }
    }

    #[test]
    fn ordinary_votes_pass() {
        let v = StandardFrameRateValidator;
        assert_eq!(
            v.validate(&request(60.0, FrameRateCompatibility::DEFAULT), CONTEXT, false),
            Ok(())
        );
        assert_eq!(
            v.validate(&request(0.0, FrameRateCompatibility::FIXED_SOURCE), CONTEXT, false),
            Ok(())
        );
    }

    #[test]
    fn bad_rates_fail() {
        let v = StandardFrameRateValidator;
        for rate in [-1.0, f32::NAN, f32::INFINITY] {
            assert_eq!(
                v.validate(&request(rate, FrameRateCompatibility::DEFAULT), CONTEXT, true),
                Err(FrameRateRejection::InvalidRate)
            );
        }
    }

    #[test]
    fn privileged_compatibility_needs_privilege() {
        let v = StandardFrameRateValidator;
        let exact = request(60.0, FrameRateCompatibility::EXACT);
        assert!(v.validate(&exact, CONTEXT, false).is_err());
        assert_eq!(v.validate(&exact, CONTEXT, true), Ok(()));
        assert!(
            v.validate(&request(60.0, FrameRateCompatibility(42)), CONTEXT, true)
                .is_err()
        );
    }

    #[test]
    fn unknown_strategy_fails() {
        let v = StandardFrameRateValidator;
        let mut r = request(60.0, FrameRateCompatibility::DEFAULT);
        r.change_strategy = ChangeFrameRateStrategy(9);
        assert_eq!(
            v.validate(&r, CONTEXT, true),
            Err(FrameRateRejection::InvalidChangeStrategy(
                ChangeFrameRateStrategy(9)
            ))
        );
    }
}
