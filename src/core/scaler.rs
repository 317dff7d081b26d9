/// Stat scaling: grade multipliers, variance rolls, linear growth.

use rand::Rng;

use crate::schema::stats::{Stat, StatBlock, VarianceRange};

/// Multiply every field by `multiplier`. Display stats are rounded to the
/// nearest whole unit; rate fields keep float precision.
///
/// Negative multipliers are allowed and turn a block into a penalty.
pub fn scale(base: &StatBlock, multiplier: f32) -> StatBlock {
    base.map(|stat, v| {
        let scaled = v * multiplier;
        if stat.is_rate() {
            scaled
        } else {
            scaled.round()
        }
    })
}

/// Draw every field independently and uniformly from its own
/// `[min, max]` band. Display stats draw whole numbers; rate fields draw
/// floats.
pub fn roll<R: Rng + ?Sized>(min: &StatBlock, max: &StatBlock, rng: &mut R) -> StatBlock {
    min.zip_with(max, |stat, lo, hi| {
        let range = VarianceRange::new(lo, hi);
        if stat.is_rate() {
            range.roll(&mut *rng)
        } else {
            range.roll_whole(&mut *rng)
        }
    })
}

/// The first stat whose band cannot be drawn from, with its bounds.
pub fn check_variance(min: &StatBlock, max: &StatBlock) -> Result<(), (Stat, f32, f32)> {
    for stat in Stat::ALL {
        let (lo, hi) = (min.get(stat), max.get(stat));
        if !VarianceRange::new(lo, hi).is_valid() {
            return Err((stat, lo, hi));
        }
    }
    Ok(())
}

/// Linear race growth: `base + growth * index` per field.
pub fn growth_scale(base: &StatBlock, growth: &StatBlock, index: u32) -> StatBlock {
    let steps = index as f32;
    base.zip_with(growth, |_, b, g| b + g * steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_block() -> StatBlock {
        StatBlock {
            strength: 10.0,
            agility: 7.0,
            vitality: 12.0,
            defense: 3.0,
            crit_rate: 0.05,
            ..Default::default()
        }
    }

    #[test]
    fn scale_rounds_display_stats_only() {
        let scaled = scale(&sample_block(), 1.25);
        assert_eq!(scaled.strength, 13.0); // 12.5 rounds away from zero
        assert_eq!(scaled.agility, 9.0); // 8.75
        assert_eq!(scaled.vitality, 15.0);
        assert!((scaled.crit_rate - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn scale_with_negative_multiplier_is_a_penalty() {
        let scaled = scale(&sample_block(), -0.5);
        assert_eq!(scaled.strength, -5.0);
        assert!(scaled.crit_rate < 0.0);
    }

    #[test]
    fn scale_by_zero_clears_everything() {
        assert!(scale(&sample_block(), 0.0).is_zero());
    }

    #[test]
    fn roll_fields_are_independent() {
        let min = StatBlock {
            strength: 0.0,
            agility: 0.0,
            ..Default::default()
        };
        let max = StatBlock {
            strength: 100.0,
            agility: 100.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(17);
        let mut differing = 0;
        for _ in 0..50 {
            let r = roll(&min, &max, &mut rng);
            if (r.strength - r.agility).abs() > 1.0 {
                differing += 1;
            }
        }
        assert!(differing > 40, "strength and agility rolled in lockstep");
    }

    #[test]
    fn roll_with_zero_band_returns_zero() {
        let mut rng = StdRng::seed_from_u64(5);
        let r = roll(&StatBlock::default(), &StatBlock::default(), &mut rng);
        assert!(r.is_zero());
    }

    #[test]
    fn display_stats_roll_whole_numbers() {
        let min = StatBlock {
            defense: -3.0,
            crit_rate: 0.0,
            ..Default::default()
        };
        let max = StatBlock {
            defense: 3.0,
            crit_rate: 0.1,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(8);
        let mut fractional_rate = false;
        for _ in 0..100 {
            let r = roll(&min, &max, &mut rng);
            assert_eq!(r.defense, r.defense.round());
            fractional_rate |= r.crit_rate != r.crit_rate.round();
        }
        assert!(fractional_rate);
    }

    #[test]
    fn check_variance_names_the_bad_stat() {
        let min = StatBlock {
            luck: f32::NEG_INFINITY,
            ..Default::default()
        };
        let err = check_variance(&min, &StatBlock::default()).unwrap_err();
        assert_eq!(err.0, Stat::Luck);
        assert!(check_variance(&StatBlock::default(), &StatBlock::default()).is_ok());
    }

    #[test]
    fn growth_is_linear() {
        let base = StatBlock {
            strength: 8.0,
            luck: 2.0,
            ..Default::default()
        };
        let growth = StatBlock {
            strength: 1.5,
            ..Default::default()
        };
        assert_eq!(growth_scale(&base, &growth, 0), base);
        let grown = growth_scale(&base, &growth, 4);
        assert_eq!(grown.get(Stat::Strength), 14.0);
        assert_eq!(grown.get(Stat::Luck), 2.0);
    }
}
