use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pairs::OperandPair;
use crate::rules::{MAX_OPERAND, MIN_OPERAND};

/// One question: two operands and their product.
///
/// Rounds are immutable; the controller replaces the whole value when a new
/// question is asked.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Round {
    /// Left operand
    pub a: u8,
    /// Right operand
    pub b: u8,
}

impl Round {
    pub fn new(a: u8, b: u8) -> Self {
        Self { a, b }
    }

    /// Draws both operands independently and uniformly from `[2, 9]`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            a: rng.random_range(MIN_OPERAND..=MAX_OPERAND),
            b: rng.random_range(MIN_OPERAND..=MAX_OPERAND),
        }
    }

    pub fn correct_answer(&self) -> u32 {
        u32::from(self.a) * u32::from(self.b)
    }

    pub fn is_correct(&self, answer: f64) -> bool {
        answer == f64::from(self.correct_answer())
    }
}

impl From<OperandPair> for Round {
    fn from(pair: OperandPair) -> Self {
        Self {
            a: pair.a,
            b: pair.b,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.a, self.b)
    }
}
