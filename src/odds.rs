//! Chance that a guesser picking cells uniformly at random passes.
//!
//! A guesser who knows how many campus images a round needs, and picks exactly that many
//! cells, passes with probability `1 / C(cells, targets)`.

use crate::round::{ROUNDS, RoundSpec};

/// `C(n, k)`, or `None` on overflow.
pub fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }

    let k = k.min(n - k);
    let mut result: u64 = 1;

    for i in 0..k {
        // result * (n - i) is always divisible by (i + 1) at this point
        result = result.checked_mul(n - i)? / (i + 1);
    }

    Some(result)
}

pub fn round_odds(spec: &RoundSpec) -> f64 {
    match binomial(spec.cell_count() as u64, spec.target_count as u64) {
        Some(0) | None => 0.0,
        Some(ways) => 1.0 / ways as f64,
    }
}

/// Chance of passing every round in a row.
pub fn playthrough_odds() -> f64 {
    ROUNDS.iter().map(round_odds).product()
}

/// One line per round plus the combined figure.
pub fn report() -> Vec<String> {
    let mut lines: Vec<String> = ROUNDS
        .iter()
        .map(|spec| format!("Level {}: {:.10}", spec.number, round_odds(spec)))
        .collect();
    lines.push(format!("Overall: {:.15}", playthrough_odds()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_matches_known_values() {
        assert_eq!(binomial(4, 1), Some(4));
        assert_eq!(binomial(9, 3), Some(84));
        assert_eq!(binomial(16, 6), Some(8008));
        assert_eq!(binomial(5, 0), Some(1));
        assert_eq!(binomial(3, 5), Some(0));
    }

    #[test]
    fn combined_odds_are_product_of_rounds() {
        let expected = 1.0 / (4.0 * 84.0 * 8008.0);

        assert!((playthrough_odds() - expected).abs() < 1e-15);
        assert!((round_odds(&ROUNDS[0]) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn report_has_a_line_per_round_and_total() {
        let lines = report();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Level 1: 0.2500000000");
        assert!(lines[3].starts_with("Overall: "));
    }
}
