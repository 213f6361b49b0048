//! Built-in simulated players.

use crate::{Responder, Response};
use mathquiz_engine::round::Round;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Always submits the correct product.
#[derive(Debug, Clone, Copy, Default)]
pub struct Perfect;

impl Responder for Perfect {
    fn respond(&mut self, round: &Round) -> Response {
        Response::Answer(round.correct_answer().to_string())
    }

    fn name(&self) -> &str {
        "Perfect"
    }
}

/// Answers correctly with probability `accuracy`, otherwise submits a product
/// that is off by one to nine.
///
/// Decisions come from a seeded ChaCha20 stream, so two players built with the
/// same seed and accuracy behave identically.
///
/// # Example
///
/// ```rust
/// use mathquiz_bot::responders::Noisy;
/// use mathquiz_bot::{Responder, Response};
/// use mathquiz_engine::round::Round;
///
/// let mut never_right = Noisy::new(0.0, 1);
/// let round = Round::new(6, 7);
/// assert_ne!(never_right.respond(&round), Response::Answer("42".into()));
/// ```
#[derive(Debug, Clone)]
pub struct Noisy {
    accuracy: f64,
    rng: ChaCha20Rng,
}

impl Noisy {
    /// `accuracy` is clamped to `[0, 1]`; a NaN counts as zero.
    pub fn new(accuracy: f64, seed: u64) -> Self {
        let accuracy = if accuracy.is_nan() {
            0.0
        } else {
            accuracy.clamp(0.0, 1.0)
        };
        Self {
            accuracy,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }
}

impl Responder for Noisy {
    fn respond(&mut self, round: &Round) -> Response {
        let correct = round.correct_answer();
        if self.rng.random_bool(self.accuracy) {
            return Response::Answer(correct.to_string());
        }
        let offset: u32 = self.rng.random_range(1..=9);
        let wrong = if self.rng.random_bool(0.5) && correct > offset {
            correct - offset
        } else {
            correct + offset
        };
        Response::Answer(wrong.to_string())
    }

    fn name(&self) -> &str {
        "Noisy"
    }
}

/// Never answers. In Survival every round times out; in Classic the session
/// never progresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Responder for Idle {
    fn respond(&mut self, _round: &Round) -> Response {
        Response::Wait
    }

    fn name(&self) -> &str {
        "Idle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(r: Response) -> i64 {
        match r {
            Response::Answer(s) => s.parse().expect("numeric answer"),
            Response::Wait => panic!("expected an answer"),
        }
    }

    #[test]
    fn perfect_answers_the_product() {
        let mut p = Perfect;
        assert_eq!(answer(p.respond(&Round::new(9, 8))), 72);
    }

    #[test]
    fn noisy_wrong_answers_are_never_correct() {
        let mut p = Noisy::new(0.0, 3);
        for a in 2..=9u8 {
            for b in 2..=9u8 {
                let round = Round::new(a, b);
                let given = answer(p.respond(&round));
                assert!(!round.is_correct(given as f64));
                assert!(given > 0);
            }
        }
    }

    #[test]
    fn noisy_full_accuracy_is_perfect() {
        let mut p = Noisy::new(1.5, 3);
        assert_eq!(p.accuracy(), 1.0);
        for _ in 0..50 {
            assert_eq!(answer(p.respond(&Round::new(4, 4))), 16);
        }
    }

    #[test]
    fn noisy_accuracy_is_roughly_honoured() {
        let mut p = Noisy::new(0.7, 11);
        let round = Round::new(3, 7);
        let hits = (0..2_000)
            .filter(|_| round.is_correct(answer(p.respond(&round)) as f64))
            .count();
        assert!((1_250..=1_550).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn noisy_is_reproducible_from_seed() {
        let mut a = Noisy::new(0.5, 99);
        let mut b = Noisy::new(0.5, 99);
        let round = Round::new(5, 6);
        for _ in 0..100 {
            assert_eq!(a.respond(&round), b.respond(&round));
        }
    }

    #[test]
    fn nan_accuracy_counts_as_zero() {
        assert_eq!(Noisy::new(f64::NAN, 0).accuracy(), 0.0);
    }

    #[test]
    fn idle_always_waits() {
        assert_eq!(Idle.respond(&Round::new(2, 2)), Response::Wait);
    }
}
