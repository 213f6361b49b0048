use std::collections::HashSet;

use mathquiz_engine::pairs::{all_pairs, OperandPair, PairQueue, CLASSIC_PAIR_COUNT};
use mathquiz_engine::round::Round;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn canonical() -> HashSet<OperandPair> {
    let mut set = HashSet::new();
    for i in 2..=9u8 {
        for j in i..=9u8 {
            set.insert(OperandPair::new(i, j));
        }
    }
    set
}

#[test]
fn every_generated_queue_is_a_permutation_of_the_canonical_set() {
    let expected = canonical();
    assert_eq!(expected.len(), CLASSIC_PAIR_COUNT);

    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    for _ in 0..200 {
        let q = PairQueue::generate(&mut rng);
        assert_eq!(q.len(), CLASSIC_PAIR_COUNT);
        let seen: HashSet<OperandPair> = q.iter().copied().collect();
        assert_eq!(seen.len(), CLASSIC_PAIR_COUNT, "duplicate pair in queue");
        assert_eq!(seen, expected);
    }
}

#[test]
fn same_seed_yields_identical_order() {
    let a = PairQueue::new_with_seed(12345);
    let b = PairQueue::new_with_seed(12345);
    assert_eq!(a, b, "same seed must yield identical order");
}

#[test]
fn different_seeds_usually_differ() {
    let a = PairQueue::new_with_seed(1);
    let b = PairQueue::new_with_seed(2);
    assert_ne!(
        a.iter().collect::<Vec<_>>(),
        b.iter().collect::<Vec<_>>(),
        "different seeds should produce different orders"
    );
}

#[test]
fn shuffle_moves_pairs_out_of_construction_order() {
    let q = PairQueue::new_with_seed(77);
    let shuffled: Vec<OperandPair> = q.iter().copied().collect();
    assert_ne!(shuffled, all_pairs());
}

#[test]
fn first_position_is_spread_over_many_pairs() {
    // A uniform permutation puts every pair first eventually.
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    let mut firsts = HashSet::new();
    for _ in 0..2_000 {
        let q = PairQueue::generate(&mut rng);
        if let Some(p) = q.front() {
            firsts.insert(p);
        }
    }
    assert_eq!(firsts.len(), CLASSIC_PAIR_COUNT);
}

#[test]
fn every_round_answer_is_the_product() {
    for pair in all_pairs() {
        let round = Round::from(pair);
        assert_eq!(round.correct_answer(), u32::from(pair.a) * u32::from(pair.b));
        assert_eq!(round.correct_answer(), pair.product());
    }
}
