//! Mimic game selection.
//!
//! When the user dismisses a ringing alarm, one of the alarm's enabled mimic
//! games is picked. No enabled game means no mimic is available and the
//! session goes straight to the no-mimic screen.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::MimicKind;

/// Picks the mimic game to play from the enabled ones.
pub trait MimicSelector: Send {
    /// Returns the mimic to play, or `None` if none is available.
    fn select(&mut self, enabled: &[MimicKind]) -> Option<MimicKind>;
}

/// Picks a random enabled mimic.
#[derive(Debug)]
pub struct RandomMimicSelector {
    rng: StdRng,
}

impl RandomMimicSelector {
    /// Creates a selector seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a selector with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomMimicSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl MimicSelector for RandomMimicSelector {
    fn select(&mut self, enabled: &[MimicKind]) -> Option<MimicKind> {
        enabled.choose(&mut self.rng).copied()
    }
}

/// Always picks the first enabled mimic.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstMimicSelector;

impl MimicSelector for FirstMimicSelector {
    fn select(&mut self, enabled: &[MimicKind]) -> Option<MimicKind> {
        enabled.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_selector() {
        let mut selector = FirstMimicSelector;
        let enabled = [MimicKind::TongueTwister, MimicKind::ColorCapture];

        assert_eq!(selector.select(&enabled), Some(MimicKind::TongueTwister));
    }

    #[test]
    fn test_first_selector_empty() {
        let mut selector = FirstMimicSelector;
        assert_eq!(selector.select(&[]), None);
    }

    #[test]
    fn test_random_selector_picks_enabled() {
        let mut selector = RandomMimicSelector::with_seed(7);
        let enabled = [MimicKind::ExpressionMimic, MimicKind::TongueTwister];

        for _ in 0..20 {
            let picked = selector.select(&enabled).unwrap();
            assert!(enabled.contains(&picked));
        }
    }

    #[test]
    fn test_random_selector_empty() {
        let mut selector = RandomMimicSelector::new();
        assert_eq!(selector.select(&[]), None);
    }

    #[test]
    fn test_random_selector_same_seed_same_choice() {
        let mut a = RandomMimicSelector::with_seed(42);
        let mut b = RandomMimicSelector::with_seed(42);

        assert_eq!(a.select(&MimicKind::ALL), b.select(&MimicKind::ALL));
    }
}
