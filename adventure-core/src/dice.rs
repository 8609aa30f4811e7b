//! Dice rolling for game mechanics (combat, skills, loot).
//!
//! Two entry points: `roll_dice` for the full XdY+Z tool used by the
//! persona party, and `roll_d20` for the baseline game mode. Invalid
//! parameters clamp to defaults instead of failing, so a sloppy caller
//! always gets a roll back.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard die types the roller accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            100 => Some(DieType::D100),
            _ => None,
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Maximum dice per roll; anything outside [1, 5] falls back to 1.
const MAX_COUNT: u32 = 5;

/// Result of rolling a handful of dice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub die: DieType,
    pub count: u32,
    pub modifier: i32,
    pub rolls: Vec<u32>,
    pub total: i32,
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**Roll:** {}{}", self.count, self.die)?;
        if self.modifier != 0 {
            let sign = if self.modifier > 0 { '+' } else { '-' };
            write!(f, " {} {}", sign, self.modifier.abs())?;
        }
        let results: Vec<String> = self.rolls.iter().map(|r| r.to_string()).collect();
        write!(f, "\n**Results:** {}", results.join(" + "))?;
        write!(f, "\n**Total:** {}", self.total)
    }
}

/// Roll `count` dice with `sides` sides and add `modifier`.
///
/// Unsupported side counts fall back to d6; counts outside [1, 5] fall
/// back to a single die. Never fails.
pub fn roll_dice(sides: u32, count: u32, modifier: i32) -> RollOutcome {
    roll_dice_with_rng(sides, count, modifier, &mut rand::thread_rng())
}

/// Roll with a specific RNG (useful for testing).
pub fn roll_dice_with_rng<R: Rng + ?Sized>(
    sides: u32,
    count: u32,
    modifier: i32,
    rng: &mut R,
) -> RollOutcome {
    let die = DieType::from_sides(sides).unwrap_or(DieType::D6);
    let count = if (1..=MAX_COUNT).contains(&count) {
        count
    } else {
        1
    };

    let rolls: Vec<u32> = (0..count).map(|_| rng.gen_range(1..=die.sides())).collect();
    let total = rolls.iter().sum::<u32>() as i32 + modifier;

    RollOutcome {
        die,
        count,
        modifier,
        rolls,
        total,
    }
}

/// Roll a single d20 (the baseline game mode's only die).
pub fn roll_d20() -> u32 {
    roll_d20_with_rng(&mut rand::thread_rng())
}

pub fn roll_d20_with_rng<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(1..=20)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_valid_rolls_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for sides in [4u32, 6, 8, 10, 12, 20, 100] {
            for count in 1..=5u32 {
                let outcome = roll_dice_with_rng(sides, count, 0, &mut rng);
                assert_eq!(outcome.rolls.len(), count as usize);
                for roll in &outcome.rolls {
                    assert!((1..=sides).contains(roll), "{roll} out of 1..={sides}");
                }
            }
        }
    }

    #[test]
    fn test_total_is_sum_plus_modifier() {
        let mut rng = StdRng::seed_from_u64(2);
        for modifier in [-3, 0, 2, 7] {
            let outcome = roll_dice_with_rng(6, 3, modifier, &mut rng);
            let sum: u32 = outcome.rolls.iter().sum();
            assert_eq!(outcome.total, sum as i32 + modifier);
        }
    }

    #[test]
    fn test_invalid_sides_fall_back_to_d6() {
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = roll_dice_with_rng(7, 2, 0, &mut rng);
        assert_eq!(outcome.die, DieType::D6);
        for roll in &outcome.rolls {
            assert!((1..=6).contains(roll));
        }
    }

    #[test]
    fn test_invalid_count_falls_back_to_one() {
        let mut rng = StdRng::seed_from_u64(4);
        let outcome = roll_dice_with_rng(20, 0, 0, &mut rng);
        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.rolls.len(), 1);

        let outcome = roll_dice_with_rng(20, 6, 0, &mut rng);
        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.rolls.len(), 1);
    }

    #[test]
    fn test_d20_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let roll = roll_d20_with_rng(&mut rng);
            assert!((1..=20).contains(&roll));
        }
    }

    #[test]
    fn test_display_with_modifier() {
        let outcome = RollOutcome {
            die: DieType::D6,
            count: 2,
            modifier: 3,
            rolls: vec![4, 5],
            total: 12,
        };
        let rendered = outcome.to_string();
        assert!(rendered.contains("2d6 + 3"));
        assert!(rendered.contains("4 + 5"));
        assert!(rendered.contains("**Total:** 12"));
    }

    #[test]
    fn test_display_negative_modifier() {
        let outcome = RollOutcome {
            die: DieType::D8,
            count: 1,
            modifier: -2,
            rolls: vec![7],
            total: 5,
        };
        assert!(outcome.to_string().contains("1d8 - 2"));
    }
}
