//! Falling object generation
//!
//! Sizes come from three tiers so most objects are dodgeable with the
//! occasional boulder:
//! - 70%: base .. base + var
//! - 20%: base + var .. base + 3 var
//! - 10%: base + 3 var .. base + 6 var

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::FallingObject;
use crate::consts::*;

/// Size class of a spawned object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeTier {
    Small,
    Large,
    Huge,
}

impl SizeTier {
    /// Pick a tier from a uniform roll in [0, 1)
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.7 {
            SizeTier::Small
        } else if roll < 0.9 {
            SizeTier::Large
        } else {
            SizeTier::Huge
        }
    }

    /// Smallest size in this tier and the width of its range
    pub fn base_and_span(&self) -> (f32, f32) {
        let base = BASE_OBJECT_SIZE;
        let var = OBJECT_SIZE_VARIATION;
        match self {
            SizeTier::Small => (base, var),
            SizeTier::Large => (base + var, 2.0 * var),
            SizeTier::Huge => (base + 3.0 * var, 3.0 * var),
        }
    }

    /// Size for a uniform roll in [0, 1) within the tier
    pub fn size_at(&self, t: f32) -> f32 {
        let (base, span) = self.base_and_span();
        base + t.clamp(0.0, 1.0) * span
    }
}

/// Draw an object size from the tiered distribution
pub fn roll_size<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let tier = SizeTier::from_roll(rng.random::<f32>());
    tier.size_at(rng.random::<f32>())
}

/// Roll a new object just above the top edge
pub fn roll_object<R: Rng + ?Sized>(rng: &mut R, id: u32, spawn_tick: u64) -> FallingObject {
    let x = rng.random_range(0.0..=100.0);
    let size = roll_size(rng);
    let variant = rng.random_range(1..=OBJECT_VARIANTS);
    FallingObject::new(id, x, size, variant, spawn_tick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(SizeTier::from_roll(0.0), SizeTier::Small);
        assert_eq!(SizeTier::from_roll(0.69), SizeTier::Small);
        assert_eq!(SizeTier::from_roll(0.7), SizeTier::Large);
        assert_eq!(SizeTier::from_roll(0.89), SizeTier::Large);
        assert_eq!(SizeTier::from_roll(0.9), SizeTier::Huge);
        assert_eq!(SizeTier::from_roll(0.999), SizeTier::Huge);
    }

    #[test]
    fn test_tier_ranges() {
        assert_eq!(SizeTier::Small.size_at(0.0), 50.0);
        assert_eq!(SizeTier::Small.size_at(1.0), 80.0);
        assert_eq!(SizeTier::Large.size_at(0.0), 80.0);
        assert_eq!(SizeTier::Large.size_at(1.0), 140.0);
        assert_eq!(SizeTier::Huge.size_at(0.0), 140.0);
        assert_eq!(SizeTier::Huge.size_at(1.0), 230.0);
    }

    #[test]
    fn test_rolled_objects_stay_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);
        for id in 1..=2_000 {
            let obj = roll_object(&mut rng, id, 0);
            assert!((0.0..=100.0).contains(&obj.x));
            assert!((50.0..=230.0).contains(&obj.size));
            assert!((1..=OBJECT_VARIANTS).contains(&obj.variant));
            assert_eq!(obj.y, SPAWN_OFFSET_Y);
        }
    }

    #[test]
    fn test_size_distribution_roughly_matches_tiers() {
        let mut rng = Pcg32::seed_from_u64(7);
        let n = 20_000;
        let small = (0..n).filter(|_| roll_size(&mut rng) < 80.0).count();
        let ratio = small as f32 / n as f32;
        assert!((0.66..0.74).contains(&ratio), "small ratio {ratio}");
    }

    #[test]
    fn test_all_variants_appear() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut seen = [false; OBJECT_VARIANTS as usize];
        for id in 0..300 {
            let obj = roll_object(&mut rng, id, 0);
            seen[(obj.variant - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
