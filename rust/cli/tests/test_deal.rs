mod helpers;

use helpers::run_in_process;
use mathquiz_engine::pairs::PairQueue;
use std::collections::HashSet;

#[test]
fn deal_matches_the_session_queue_for_the_seed() {
    let res = run_in_process(&["deal", "--seed", "2024"], "");
    assert_eq!(res.exit_code, 0);

    let expected: Vec<String> = PairQueue::new_with_seed(2024)
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:>2}. {} × {}", i + 1, p.a, p.b))
        .collect();
    let printed: Vec<&str> = res.stdout.lines().skip(1).collect();
    assert_eq!(printed, expected);
}

#[test]
fn deal_covers_the_classic_pair_set() {
    let res = run_in_process(&["deal", "--seed", "1"], "");
    let pairs: HashSet<&str> = res
        .stdout
        .lines()
        .skip(1)
        .filter_map(|l| l.split_once(". ").map(|(_, pair)| pair))
        .collect();
    assert_eq!(pairs.len(), 36);
    assert!(pairs.contains("2 × 2"));
    assert!(pairs.contains("9 × 9"));
    assert!(!pairs.contains("9 × 2"));
}
