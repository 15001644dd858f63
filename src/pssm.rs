use crate::background::Background;
use crate::nucleotide::{Nucleotide, ALPHABET};
use crate::Error;
use tracing::{debug, trace};

/// Log-odds weights of the four symbols at one alignment position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    weights: [f64; 4],
}

impl Column {
    pub fn weight(&self, nuc: Nucleotide) -> f64 {
        self.weights[nuc.index()]
    }

    /// Weights in `A, C, G, T` order.
    pub fn weights(&self) -> [f64; 4] {
        self.weights
    }
}

/// A position-specific scoring matrix: one [`Column`] per site position.
#[derive(Debug, Clone, PartialEq)]
pub struct Pssm {
    columns: Vec<Column>,
    background: Background,
}

impl Pssm {
    /// Build the matrix from equal-length aligned sites.
    ///
    /// Every column starts from the background frequencies as pseudocounts,
    /// adds one per site carrying each symbol (case-insensitive, non-ACGT
    /// ignored), normalizes by the column total and takes
    /// `log2(observed / background)` per symbol.
    ///
    /// # Errors
    /// * `Error::NoSites` if `sites` is empty
    /// * `Error::InvalidMotifLength` if the sites are empty strings
    /// * `Error::UnequalSiteLength` if any site differs in length from the first
    #[tracing::instrument(skip_all)]
    pub fn from_sites<S: AsRef<[u8]>>(sites: &[S], background: &Background) -> Result<Pssm, Error> {
        let k = validate_sites(sites)?;
        debug!("Building PSSM of length {} from {} sites", k, sites.len());
        let bg = background.frequencies();
        let columns = count_matrix(sites, k, background)
            .into_iter()
            .map(|counts| {
                // pseudocounts keep the total strictly positive
                let total: f64 = counts.iter().sum();
                let mut weights = [0.0; 4];
                for j in 0..4 {
                    weights[j] = (counts[j] / total / bg[j]).log2();
                }
                trace!(?weights);
                Column { weights }
            })
            .collect();
        Ok(Pssm {
            columns,
            background: *background,
        })
    }

    /// Motif length.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// The highest-weighted symbol of each column; ties go to the first
    /// symbol in `ACGT` order.
    pub fn consensus(&self) -> String {
        self.columns
            .iter()
            .map(|column| {
                let mut best = Nucleotide::A;
                for nuc in ALPHABET {
                    if column.weight(nuc) > column.weight(best) {
                        best = nuc;
                    }
                }
                best.as_char()
            })
            .collect()
    }
}

/// Length shared by all sites.
fn validate_sites<S: AsRef<[u8]>>(sites: &[S]) -> Result<usize, Error> {
    let first = sites.first().ok_or(Error::NoSites)?;
    let k = first.as_ref().len();
    if k == 0 {
        return Err(Error::InvalidMotifLength);
    }
    for (index, site) in sites.iter().enumerate().skip(1) {
        let found = site.as_ref().len();
        if found != k {
            return Err(Error::UnequalSiteLength {
                index,
                expected: k,
                found,
            });
        }
    }
    Ok(k)
}

/// Per-position symbol counts seeded with the background frequencies.
fn count_matrix<S: AsRef<[u8]>>(sites: &[S], k: usize, background: &Background) -> Vec<[f64; 4]> {
    let mut counts = vec![background.frequencies(); k];
    for site in sites {
        for (i, &byte) in site.as_ref().iter().enumerate() {
            if let Some(nuc) = Nucleotide::from_byte(byte) {
                counts[i][nuc.index()] += 1.0;
            }
        }
    }
    counts
}
