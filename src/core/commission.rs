//! Commission samplers
//!
//! Two implementations of [`CommissionSampler`]:
//! - `RandomCommissionSampler` routes each task to an affiliate partner with
//!   the configured weight (90% by default) and draws a whole-cent amount
//!   uniformly from that partner's range
//! - `FixedCommissionSampler` pays a fixed rate per partner, cycling through
//!   a fixed partner schedule

use crate::config::{CommissionRange, CommissionTable};
use crate::core::traits::CommissionSampler;
use crate::types::{Commission, PartnerKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Weighted random commission sampler
#[derive(Debug, Clone)]
pub struct RandomCommissionSampler {
    table: CommissionTable,
    rng: StdRng,
}

impl RandomCommissionSampler {
    /// Sampler seeded from OS entropy
    pub fn new(table: CommissionTable) -> Self {
        Self {
            table,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sampler
    pub fn seeded(table: CommissionTable, seed: u64) -> Self {
        Self {
            table,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn draw(&mut self, range: CommissionRange) -> Decimal {
        let min = to_cents(range.min);
        let max = to_cents(range.max);
        if min >= max {
            return Decimal::new(min, 2);
        }
        Decimal::new(self.rng.gen_range(min..=max), 2)
    }
}

impl CommissionSampler for RandomCommissionSampler {
    fn sample(&mut self) -> Commission {
        let weight = self.table.affiliate_weight.clamp(0.0, 1.0);
        let partner = if self.rng.gen_bool(weight) {
            PartnerKind::Affiliate
        } else {
            PartnerKind::Simulated
        };

        let range = match partner {
            PartnerKind::Affiliate => self.table.affiliate,
            PartnerKind::Simulated => self.table.simulated,
        };

        Commission::new(partner, self.draw(range))
    }
}

fn to_cents(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .unwrap_or(0)
}

/// Fixed-rate commission table
///
/// Pays `affiliate_rate` or `simulated_rate` following `schedule`, which is
/// repeated indefinitely.
#[derive(Debug, Clone)]
pub struct FixedCommissionSampler {
    affiliate_rate: Decimal,
    simulated_rate: Decimal,
    schedule: Vec<PartnerKind>,
    position: usize,
}

impl FixedCommissionSampler {
    /// Every task pays the affiliate rate
    pub fn new(affiliate_rate: Decimal) -> Self {
        Self {
            affiliate_rate,
            simulated_rate: affiliate_rate,
            schedule: vec![PartnerKind::Affiliate],
            position: 0,
        }
    }

    /// Nine affiliate tasks followed by one simulated task
    pub fn weighted(affiliate_rate: Decimal, simulated_rate: Decimal) -> Self {
        let mut schedule = vec![PartnerKind::Affiliate; 9];
        schedule.push(PartnerKind::Simulated);
        Self {
            affiliate_rate,
            simulated_rate,
            schedule,
            position: 0,
        }
    }
}

impl CommissionSampler for FixedCommissionSampler {
    fn sample(&mut self) -> Commission {
        let partner = self.schedule[self.position % self.schedule.len()];
        self.position += 1;

        let amount = match partner {
            PartnerKind::Affiliate => self.affiliate_rate,
            PartnerKind::Simulated => self.simulated_rate,
        };
        Commission::new(partner, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_range(amount: Decimal, range: CommissionRange) -> bool {
        amount >= range.min && amount <= range.max
    }

    #[test]
    fn test_random_amounts_stay_in_partner_range() {
        let table = CommissionTable::default();
        let mut sampler = RandomCommissionSampler::seeded(table.clone(), 7);

        for _ in 0..500 {
            let commission = sampler.sample();
            let range = match commission.partner {
                PartnerKind::Affiliate => table.affiliate,
                PartnerKind::Simulated => table.simulated,
            };
            assert!(in_range(commission.amount, range), "{:?}", commission);
            assert!(commission.amount.scale() <= 2);
        }
    }

    #[test]
    fn test_random_weighting_favours_affiliates() {
        let mut sampler = RandomCommissionSampler::seeded(CommissionTable::default(), 42);

        let affiliates = (0..2000)
            .filter(|_| sampler.sample().partner == PartnerKind::Affiliate)
            .count();

        // 90% expected; allow generous slack
        assert!((1700..=1900).contains(&affiliates), "got {}", affiliates);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomCommissionSampler::seeded(CommissionTable::default(), 99);
        let mut b = RandomCommissionSampler::seeded(CommissionTable::default(), 99);

        for _ in 0..50 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_weight_extremes() {
        let table = CommissionTable {
            affiliate_weight: 0.0,
            ..CommissionTable::default()
        };
        let mut sampler = RandomCommissionSampler::seeded(table, 1);
        assert!((0..100).all(|_| sampler.sample().partner == PartnerKind::Simulated));
    }

    #[test]
    fn test_degenerate_range() {
        let table = CommissionTable {
            affiliate: CommissionRange::new(Decimal::ONE, Decimal::ONE),
            affiliate_weight: 1.0,
            ..CommissionTable::default()
        };
        let mut sampler = RandomCommissionSampler::seeded(table, 1);
        assert_eq!(sampler.sample().amount, Decimal::ONE);
    }

    #[test]
    fn test_fixed_sampler_pays_flat_rate() {
        let mut sampler = FixedCommissionSampler::new(Decimal::new(125, 2));
        for _ in 0..3 {
            assert_eq!(
                sampler.sample(),
                Commission::new(PartnerKind::Affiliate, Decimal::new(125, 2))
            );
        }
    }

    #[test]
    fn test_fixed_weighted_schedule() {
        let mut sampler = FixedCommissionSampler::weighted(Decimal::ONE, Decimal::new(50, 2));
        let partners: Vec<_> = (0..20).map(|_| sampler.sample().partner).collect();

        assert_eq!(partners[9], PartnerKind::Simulated);
        assert_eq!(partners[19], PartnerKind::Simulated);
        assert_eq!(
            partners
                .iter()
                .filter(|p| **p == PartnerKind::Affiliate)
                .count(),
            18
        );
    }
}
