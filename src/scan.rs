use std::fmt::{self, Display};

use crate::nucleotide::Nucleotide;
use crate::pssm::Pssm;
use tracing::debug;

/// A putative binding site: the window starting at `position` scored `score`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub position: usize,
    pub score: f64,
}

impl Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.position, self.score)
    }
}

impl Pssm {
    /// Sum of the column weights over the first `len()` symbols of `window`.
    ///
    /// Symbols outside `ACGT` contribute nothing.
    pub fn score_window(&self, window: &[u8]) -> f64 {
        let mut score = 0.0;
        for (column, &byte) in self.columns().iter().zip(window) {
            if let Some(nuc) = Nucleotide::from_byte(byte) {
                score += column.weight(nuc);
            }
        }
        score
    }

    /// Score every window of `target` and keep those scoring above zero,
    /// best first.
    ///
    /// A target shorter than the motif has no windows and yields no matches.
    #[tracing::instrument(skip_all)]
    pub fn scan(&self, target: &[u8]) -> Vec<Match> {
        let w = self.len();
        if w == 0 || target.len() < w {
            debug!(
                "Target of length {} has no windows for a motif of length {}",
                target.len(),
                w
            );
            return vec![];
        }
        let mut matches: Vec<Match> = target
            .windows(w)
            .enumerate()
            .filter_map(|(position, window)| {
                let score = self.score_window(window);
                (score > 0.0).then_some(Match { position, score })
            })
            .collect();
        debug!(
            "{} of {} windows scored above zero",
            matches.len(),
            target.len() - w + 1
        );
        rank(&mut matches);
        matches
    }
}

/// Sort by descending score.
///
/// The sort is stable, so matches with equal scores keep their relative
/// order; for a single scan that is ascending position.
pub fn rank(matches: &mut [Match]) {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod test {
    use super::{rank, Match};
    use crate::background::Background;
    use crate::pssm::Pssm;

    fn poly_a() -> Pssm {
        Pssm::from_sites(&["AAAA", "AAAA", "AAAA"], &Background::default()).unwrap()
    }

    #[test]
    pub fn test_score_window() {
        let pssm = poly_a();
        let a = (3.25f64 / 4.0 / 0.25).log2();
        assert!((pssm.score_window(b"AAAA") - 4.0 * a).abs() < 1e-12);
        assert!((pssm.score_window(b"TTTT") + 8.0).abs() < 1e-12);
        // unknown symbols add nothing
        assert!((pssm.score_window(b"ANNA") - 2.0 * a).abs() < 1e-12);
        assert_eq!(pssm.score_window(b"NNNN"), 0.0);
    }

    #[test]
    pub fn test_scan_finds_embedded_site() {
        let pssm = poly_a();
        let matches = pssm.scan(b"TTTTAAAATTTT");
        assert_eq!(matches[0].position, 4);
        assert_eq!(matches[0].score, pssm.score_window(b"AAAA"));
        // the overlapping TAAA and AAAT windows also beat the background
        let mut positions: Vec<usize> = matches.iter().map(|m| m.position).collect();
        positions.sort();
        assert_eq!(positions, vec![3, 4, 5]);
        for m in &matches {
            assert!(m.score > 0.0);
        }
    }

    #[test]
    pub fn test_scan_short_target() {
        let pssm = poly_a();
        assert!(pssm.scan(b"AAA").is_empty());
        assert!(pssm.scan(b"").is_empty());
    }

    #[test]
    pub fn test_scan_exact_length_target() {
        let pssm = poly_a();
        let matches = pssm.scan(b"aaaa");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].position, 0);
        assert!(pssm.scan(b"CCCC").is_empty());
    }

    #[test]
    pub fn test_zero_score_is_excluded() {
        let pssm = poly_a();
        // only unknown symbols: score is exactly zero
        assert!(pssm.scan(b"NNNNNN").is_empty());
    }

    #[test]
    pub fn test_rank_is_descending_and_stable() {
        let mut matches = vec![
            Match { position: 0, score: 1.0 },
            Match { position: 1, score: 3.0 },
            Match { position: 2, score: 1.0 },
            Match { position: 3, score: 2.5 },
        ];
        rank(&mut matches);
        let positions: Vec<usize> = matches.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![1, 3, 0, 2]);
    }

    #[test]
    pub fn test_match_display() {
        let m = Match {
            position: 12,
            score: 1.5,
        };
        assert_eq!(m.to_string(), "12\t1.5");
    }
}
