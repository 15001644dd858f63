use std::fmt::{self, Display};
use std::str::FromStr;

use crate::nucleotide::{Nucleotide, ALPHABET};
use crate::Error;

/// Expected genome-wide base composition.
///
/// Each frequency is used twice when building a matrix: as the pseudocount
/// seeding its symbol's count, and as the denominator of the log-odds ratio.
/// All four must therefore be strictly positive. They conventionally sum to
/// 1.0 but this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    frequencies: [f64; 4],
}

impl Background {
    pub fn new(a: f64, c: f64, g: f64, t: f64) -> Result<Background, Error> {
        let frequencies = [a, c, g, t];
        for (nuc, &value) in ALPHABET.iter().zip(frequencies.iter()) {
            // NaN fails the comparison too
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidBackground {
                    symbol: nuc.as_char(),
                    value,
                });
            }
        }
        // the sum seeds every column total, which must stay finite
        let sum: f64 = frequencies.iter().sum();
        if !(sum + 1.0).is_finite() {
            return Err(Error::InvalidBackgroundSum(sum));
        }
        Ok(Background { frequencies })
    }

    /// 0.25 for every symbol.
    pub fn uniform() -> Background {
        Background {
            frequencies: [0.25; 4],
        }
    }

    pub fn frequency(&self, nuc: Nucleotide) -> f64 {
        self.frequencies[nuc.index()]
    }

    pub fn frequencies(&self) -> [f64; 4] {
        self.frequencies
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::uniform()
    }
}

impl FromStr for Background {
    type Err = Error;

    /// Parse `a,c,g,t`, e.g. `0.3,0.2,0.2,0.3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|_| Error::InvalidBackgroundFormat(s.to_string()))?;
        match values[..] {
            [a, c, g, t] => Background::new(a, c, g, t),
            _ => Err(Error::InvalidBackgroundFormat(s.to_string())),
        }
    }
}

impl Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, c, g, t] = self.frequencies;
        write!(f, "{a},{c},{g},{t}")
    }
}

#[cfg(test)]
mod test {
    use super::Background;
    use crate::nucleotide::Nucleotide;
    use crate::Error;

    #[test]
    pub fn test_default_is_uniform() {
        let bg = Background::default();
        assert_eq!(bg.frequencies(), [0.25, 0.25, 0.25, 0.25]);
        assert_eq!(bg, Background::uniform());
    }

    #[test]
    pub fn test_new_keeps_order() {
        let bg = Background::new(0.3, 0.2, 0.1, 0.4).unwrap();
        assert_eq!(bg.frequency(Nucleotide::A), 0.3);
        assert_eq!(bg.frequency(Nucleotide::C), 0.2);
        assert_eq!(bg.frequency(Nucleotide::G), 0.1);
        assert_eq!(bg.frequency(Nucleotide::T), 0.4);
    }

    #[test]
    pub fn test_sum_is_not_enforced() {
        assert!(Background::new(1.0, 1.0, 1.0, 1.0).is_ok());
    }

    #[test]
    pub fn test_rejects_non_positive() {
        match Background::new(0.25, 0.0, 0.25, 0.5) {
            Err(Error::InvalidBackground { symbol, value }) => {
                assert_eq!(symbol, 'C');
                assert_eq!(value, 0.0);
            }
            other => panic!("expected InvalidBackground, got {:?}", other),
        }
        assert!(Background::new(0.25, 0.25, -0.1, 0.25).is_err());
        assert!(Background::new(f64::NAN, 0.25, 0.25, 0.25).is_err());
        assert!(Background::new(0.25, 0.25, 0.25, f64::INFINITY).is_err());
    }

    #[test]
    pub fn test_rejects_overflowing_sum() {
        assert!(matches!(
            Background::new(1e308, 1e308, 1e308, 1e308),
            Err(Error::InvalidBackgroundSum(_))
        ));
        assert!(Background::new(1e300, 1e300, 1e300, 1e300).is_ok());
    }

    #[test]
    pub fn test_from_str() {
        let bg: Background = "0.3, 0.2,0.2,0.3".parse().unwrap();
        assert_eq!(bg.frequencies(), [0.3, 0.2, 0.2, 0.3]);
        assert_eq!(bg.to_string(), "0.3,0.2,0.2,0.3");

        assert!(matches!(
            "0.3,0.2,0.5".parse::<Background>(),
            Err(Error::InvalidBackgroundFormat(_))
        ));
        assert!(matches!(
            "0.3,0.2,x,0.5".parse::<Background>(),
            Err(Error::InvalidBackgroundFormat(_))
        ));
        assert!(matches!(
            "0.5,0.5,0.0,0.0".parse::<Background>(),
            Err(Error::InvalidBackground { symbol: 'G', .. })
        ));
    }
}
