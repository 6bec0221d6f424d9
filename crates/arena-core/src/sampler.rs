//! Weighted card offers over a fixed pool.

use crate::model::card::Card;
use crate::model::pool::Pool;
use rand::Rng;

/// Samples cards from a [`Pool`] with replacement, proportionally to weight.
///
/// The cumulative-weight index is precomputed once at construction; each
/// offer then costs one uniform draw plus a binary search.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    pool: Pool,
    cumulative: Vec<f64>,
    total_weight: f64,
}

impl WeightedSampler {
    /// Wraps a validated pool. The pool guarantees positive finite weights,
    /// so the cumulative index is strictly increasing and the total is
    /// positive.
    pub fn new(pool: Pool) -> Self {
        let mut cumulative = Vec::with_capacity(pool.len());
        let mut running = 0.0;
        for card in pool.cards() {
            running += card.weight;
            cumulative.push(running);
        }
        Self {
            pool,
            cumulative,
            total_weight: running,
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Offers one card, chosen with probability `weight / total_weight`.
    ///
    /// Draws a uniform roll in `[0, total_weight)` and locates the first
    /// cumulative entry strictly greater than it. The roll is strictly below
    /// the last cumulative entry, so the index is always in range.
    pub fn offer<R: Rng + ?Sized>(&self, rng: &mut R) -> &Card {
        let roll = rng.gen_range(0.0..self.total_weight);
        let index = self.cumulative.partition_point(|&bound| bound <= roll);
        debug_assert!(index < self.pool.len());
        &self.pool.cards()[index]
    }

    /// Offers `count` cards, each an independent draw.
    pub fn offer_many<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&Card> {
        (0..count).map(|_| self.offer(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::WeightedSampler;
    use crate::model::pool::Pool;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::collections::HashMap;

    fn three_card_sampler() -> WeightedSampler {
        let pool = Pool::from_triples(vec![
            (1.0, "Alpha".to_string(), 10.0),
            (2.0, "Beta".to_string(), 20.0),
            (7.0, "Gamma".to_string(), 30.0),
        ])
        .unwrap();
        WeightedSampler::new(pool)
    }

    #[test]
    fn frequencies_converge_to_weight_share() {
        let sampler = three_card_sampler();
        let mut rng = SmallRng::seed_from_u64(1701);
        let draws = 100_000usize;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..draws {
            *counts.entry(sampler.offer(&mut rng).name.as_str()).or_default() += 1;
        }

        let expected = [("Alpha", 0.1), ("Beta", 0.2), ("Gamma", 0.7)];
        for (name, probability) in expected {
            let observed = counts[name] as f64 / draws as f64;
            assert!(
                (observed - probability).abs() < 0.01,
                "{name}: observed {observed}, expected {probability}"
            );
        }
    }

    #[test]
    fn single_card_pool_always_offers_that_card() {
        let pool = Pool::from_triples(vec![(0.25, "Solo".to_string(), 42.0)]).unwrap();
        let sampler = WeightedSampler::new(pool);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(sampler.offer(&mut rng).name, "Solo");
        }
    }

    #[test]
    fn deterministic_with_fixed_seed() {
        let sampler = three_card_sampler();
        let mut rng_a = SmallRng::seed_from_u64(99);
        let mut rng_b = SmallRng::seed_from_u64(99);

        let sequence_a: Vec<&str> = sampler
            .offer_many(50, &mut rng_a)
            .into_iter()
            .map(|card| card.name.as_str())
            .collect();
        let sequence_b: Vec<&str> = sampler
            .offer_many(50, &mut rng_b)
            .into_iter()
            .map(|card| card.name.as_str())
            .collect();
        assert_eq!(sequence_a, sequence_b);
    }

    #[test]
    fn offer_many_returns_requested_count() {
        let sampler = three_card_sampler();
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(sampler.offer_many(17, &mut rng).len(), 17);
        assert!(sampler.offer_many(0, &mut rng).is_empty());
    }

    #[test]
    fn total_weight_matches_pool() {
        let sampler = three_card_sampler();
        assert!((sampler.total_weight() - 10.0).abs() < f64::EPSILON);
        assert!((sampler.pool().total_weight() - 10.0).abs() < f64::EPSILON);
    }
}
