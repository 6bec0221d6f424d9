//! The arena "keep one of three offers" mechanic.

use crate::model::card::Card;
use crate::model::pool::Pool;
use crate::sampler::WeightedSampler;
use crate::stats::DraftStatistics;
use rand::Rng;
use std::cmp::Ordering;
use thiserror::Error;

/// Cards shown per offer round.
pub const OFFERS_PER_ROUND: usize = 3;

/// Statistics were requested before any draft round had been recorded.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no draft rounds recorded; run the draft before requesting statistics")]
pub struct EmptyDraftError;

/// One resolved offer round: the card the drafter kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub score: f64,
    pub name: String,
}

/// Simulates repeated three-card offers over one weighted pool.
///
/// A simulator is bound to a single pool, so one class under one weight
/// formula. Comparing formulas or classes means one simulator per
/// combination; each can own a private RNG stream and run independently.
#[derive(Debug, Clone)]
pub struct DraftSimulator {
    sampler: WeightedSampler,
    record: Vec<Pick>,
}

impl DraftSimulator {
    pub fn new(pool: Pool) -> Self {
        Self {
            sampler: WeightedSampler::new(pool),
            record: Vec::new(),
        }
    }

    pub fn sampler(&self) -> &WeightedSampler {
        &self.sampler
    }

    /// Offers three cards (with replacement, as in the real game) and keeps
    /// the best one: highest score, ties broken by ascending name. Does not
    /// touch the record.
    pub fn draft_one_round<R: Rng + ?Sized>(&self, rng: &mut R) -> Pick {
        let mut best = self.sampler.offer(rng);
        for _ in 1..OFFERS_PER_ROUND {
            let offered = self.sampler.offer(rng);
            if beats(offered, best) {
                best = offered;
            }
        }
        Pick {
            score: best.score,
            name: best.name.clone(),
        }
    }

    /// Runs `rounds` offer rounds, replacing any previous record. Zero
    /// rounds is legal and leaves an empty record.
    pub fn run<R: Rng + ?Sized>(&mut self, rounds: usize, rng: &mut R) -> &[Pick] {
        let mut record = Vec::with_capacity(rounds);
        for _ in 0..rounds {
            record.push(self.draft_one_round(rng));
        }
        self.record = record;
        &self.record
    }

    pub fn record(&self) -> &[Pick] {
        &self.record
    }

    /// Summarizes the scores of the current record. Recomputed on every
    /// call; fails while the record is empty.
    pub fn statistics(&self) -> Result<DraftStatistics, EmptyDraftError> {
        let scores: Vec<f64> = self.record.iter().map(|pick| pick.score).collect();
        DraftStatistics::from_scores(&scores).ok_or(EmptyDraftError)
    }
}

/// Offer comparator: score descending, then name ascending.
fn beats(challenger: &Card, incumbent: &Card) -> bool {
    match challenger.score.total_cmp(&incumbent.score) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => challenger.name < incumbent.name,
    }
}

#[cfg(test)]
mod tests {
    use super::{DraftSimulator, EmptyDraftError, beats};
    use crate::model::card::Card;
    use crate::model::pool::Pool;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn unit_pool() -> Pool {
        Pool::from_triples(vec![
            (1.0, "Alpha".to_string(), 10.0),
            (1.0, "Beta".to_string(), 20.0),
            (1.0, "Gamma".to_string(), 5.0),
        ])
        .unwrap()
    }

    #[test]
    fn zero_rounds_leave_empty_record() {
        let mut simulator = DraftSimulator::new(unit_pool());
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(simulator.run(0, &mut rng).is_empty());
        assert_eq!(simulator.statistics().unwrap_err(), EmptyDraftError);
    }

    #[test]
    fn statistics_fail_before_any_run() {
        let simulator = DraftSimulator::new(unit_pool());
        assert_eq!(simulator.statistics().unwrap_err(), EmptyDraftError);
    }

    #[test]
    fn run_produces_exactly_the_requested_rounds() {
        let mut simulator = DraftSimulator::new(unit_pool());
        let mut rng = SmallRng::seed_from_u64(2);
        assert_eq!(simulator.run(25, &mut rng).len(), 25);
        assert_eq!(simulator.record().len(), 25);
    }

    #[test]
    fn rerun_replaces_the_previous_record() {
        let mut simulator = DraftSimulator::new(unit_pool());
        let mut rng = SmallRng::seed_from_u64(3);
        simulator.run(10, &mut rng);
        simulator.run(4, &mut rng);
        assert_eq!(simulator.record().len(), 4);
    }

    #[test]
    fn single_card_pool_always_picks_that_card() {
        let pool = Pool::from_triples(vec![(1.0, "Solo".to_string(), 7.0)]).unwrap();
        let mut simulator = DraftSimulator::new(pool);
        let mut rng = SmallRng::seed_from_u64(4);
        for pick in simulator.run(50, &mut rng) {
            assert_eq!(pick.name, "Solo");
            assert_eq!(pick.score, 7.0);
        }
    }

    #[test]
    fn best_of_three_converges_to_enumerated_expectation() {
        // Equal weights over scores {10, 20, 5}: enumerating the 27 equally
        // likely offer triples gives E[max] = 455/27 ≈ 16.85, well above the
        // flat mean 35/3.
        let mut simulator = DraftSimulator::new(unit_pool());
        let mut rng = SmallRng::seed_from_u64(20_16);
        simulator.run(30_000, &mut rng);

        let stats = simulator.statistics().unwrap();
        let expected = 455.0 / 27.0;
        assert!(
            (stats.mean - expected).abs() < 0.25,
            "mean {} strayed from {expected}",
            stats.mean
        );
        assert!(stats.mean > 35.0 / 3.0);
        assert_eq!(stats.count, 30_000);
        assert_eq!(stats.max, 20.0);
        assert_eq!(stats.min, 5.0);
    }

    #[test]
    fn score_ties_break_on_ascending_name() {
        let zephyr = Card::new(1.0, "Zephyr", 5.0);
        let aurora = Card::new(1.0, "Aurora", 5.0);
        assert!(beats(&aurora, &zephyr));
        assert!(!beats(&zephyr, &aurora));
        assert!(!beats(&aurora, &aurora));
    }

    #[test]
    fn higher_score_beats_lower_regardless_of_name() {
        let strong = Card::new(1.0, "Zzz", 9.0);
        let weak = Card::new(1.0, "Aaa", 3.0);
        assert!(beats(&strong, &weak));
        assert!(!beats(&weak, &strong));
    }

    #[test]
    fn draft_one_round_does_not_touch_the_record() {
        let simulator = DraftSimulator::new(unit_pool());
        let mut rng = SmallRng::seed_from_u64(8);
        let _ = simulator.draft_one_round(&mut rng);
        assert!(simulator.record().is_empty());
    }
}
