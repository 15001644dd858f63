pub mod background;
mod command;
pub mod nucleotide;
pub mod pssm;
pub mod scan;
mod utils;

use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind};

use bio::io::fasta;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use background::Background;
#[doc(hidden)]
pub use command::Yassi;
pub use pssm::{Column, Pssm};
pub use scan::Match;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No sites were given")]
    NoSites,

    #[error("Sites must contain at least one symbol")]
    InvalidMotifLength,

    #[error("Site {index} has length {found}, expected {expected} like the first site")]
    UnequalSiteLength {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Target of length {target} is shorter than the motif of length {motif}")]
    TargetTooShort { target: usize, motif: usize },

    #[error("Background frequency of {symbol} must be strictly positive, got {value}")]
    InvalidBackground { symbol: char, value: f64 },

    #[error("Background frequencies must have a finite sum, got {0}")]
    InvalidBackgroundSum(f64),

    #[error("Background must be four comma separated numbers (A,C,G,T), got '{0}'")]
    InvalidBackgroundFormat(String),

    #[error("File not found: {0}")]
    FileNotFoundError(String),

    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Invalid sequence record")]
    InvalidSequence,

    #[error("Number of entries must be at least 1")]
    InvalidNumberOfEntries,
}

/// A named target sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub seq: Vec<u8>,
}

/// Build a PSSM from `sites` and rank every window of `target` that scores
/// above zero, best first.
///
/// `background` defaults to uniform 0.25.
///
/// # Errors
/// * the site errors of [`Pssm::from_sites`]
/// * `Error::TargetTooShort` if `target` is shorter than the sites
#[tracing::instrument(skip_all)]
pub fn search<S: AsRef<[u8]>>(
    sites: &[S],
    target: &[u8],
    background: Option<Background>,
) -> Result<Vec<Match>, Error> {
    let pssm = Pssm::from_sites(sites, &background.unwrap_or_default())?;
    if target.len() < pssm.len() {
        return Err(Error::TargetTooShort {
            target: target.len(),
            motif: pssm.len(),
        });
    }
    Ok(pssm.scan(target))
}

/// Weights of each column as `(A, C, G, T)`, in column order.
#[tracing::instrument(skip_all)]
pub fn build_pssm<S: AsRef<[u8]>>(
    sites: &[S],
    background: Option<Background>,
) -> Result<Vec<[f64; 4]>, Error> {
    let pssm = Pssm::from_sites(sites, &background.unwrap_or_default())?;
    Ok(pssm.columns().iter().map(|c| c.weights()).collect())
}

/// Read one site per line, skipping blank lines and `>` header lines.
#[tracing::instrument]
pub fn load_sites(path_to_file: &str) -> Result<Vec<String>, Error> {
    info!("Loading sites from '{}'...", path_to_file);
    let file = match File::open(path_to_file) {
        Ok(file) => file,
        Err(_) => return Err(Error::FileNotFoundError(path_to_file.to_string())),
    };
    let mut sites = vec![];
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('>') {
            continue;
        }
        sites.push(line.to_string());
    }
    info!("Done loading sites: {} sites", sites.len());
    Ok(sites)
}

/// Read up to `num_entries` records from a FASTA file; `None` reads them all.
///
/// Sequences are kept as-is apart from non-ASCII bytes, which are read as `N`:
/// case and non-ACGT symbols are handled by the scanner.
#[tracing::instrument]
pub fn load_data(path_to_file: &str, num_entries: Option<usize>) -> Result<Vec<Record>, Error> {
    info!("Loading data from '{}'...", path_to_file);
    if num_entries == Some(0) {
        return Err(Error::InvalidNumberOfEntries);
    }
    let mut raw = match fs::read(path_to_file) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::FileNotFoundError(path_to_file.to_string()))
        }
        Err(err) => return Err(Error::IOError(err)),
    };
    mask_non_ascii(&mut raw);
    let mut records = vec![];
    for result in fasta::Reader::new(raw.as_slice()).records() {
        if num_entries.is_some_and(|n| records.len() >= n) {
            break;
        }
        let record = result.map_err(|err| {
            warn!("Could not read record: {}", err);
            Error::InvalidSequence
        })?;
        debug!("Loaded '{}' ({} bp)", record.id(), record.seq().len());
        records.push(Record {
            id: record.id().to_string(),
            seq: record.seq().to_vec(),
        });
    }
    info!("Done loading data: {} entries", records.len());
    Ok(records)
}

/// Replace non-ASCII bytes of sequence lines with `N`.
///
/// The FASTA reader only accepts UTF-8. A single `N` keeps every window
/// position and, like any non-ACGT symbol, adds nothing to a score. Header
/// lines are left alone.
fn mask_non_ascii(raw: &mut [u8]) {
    let mut header = false;
    let mut line_start = true;
    for byte in raw.iter_mut() {
        if line_start {
            header = *byte == b'>';
        }
        line_start = *byte == b'\n';
        if !header && !byte.is_ascii() {
            *byte = b'N';
        }
    }
}

#[cfg(test)]
mod test {
    use super::{build_pssm, mask_non_ascii, search, Background, Error};

    #[test]
    pub fn test_search_defaults_to_uniform() {
        let sites = ["ACGT", "ACGA", "ACGT"];
        let target = b"GGACGTGGACGAGG";
        let implicit = search(&sites, target, None).unwrap();
        let explicit = search(&sites, target, Some(Background::uniform())).unwrap();
        assert_eq!(implicit, explicit);
        assert_eq!(implicit[0].position, 2);
    }

    #[test]
    pub fn test_search_rejects_short_target() {
        match search(&["ACGT"], b"ACG", None) {
            Err(Error::TargetTooShort { target, motif }) => {
                assert_eq!(target, 3);
                assert_eq!(motif, 4);
            }
            other => panic!("expected TargetTooShort, got {:?}", other),
        }
    }

    #[test]
    pub fn test_build_pssm_shape() {
        let weights = build_pssm(&["ACGTAC", "ACGTAA"], None).unwrap();
        assert_eq!(weights.len(), 6);
        assert!(weights[0][0] > 0.0);
        assert!(weights[1][1] > 0.0);
        assert!(weights[2][2] > 0.0);
        assert!(weights[3][3] > 0.0);
    }

    #[test]
    pub fn test_error_messages() {
        let err = build_pssm(&["AC", "A"], None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Site 1 has length 1, expected 2 like the first site"
        );
        let err = Background::new(0.25, 0.25, 0.0, 0.25).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Background frequency of G must be strictly positive, got 0"
        );
    }

    #[test]
    pub fn test_mask_non_ascii() {
        let mut raw = b">r1 caf\xc3\xa9\nGGGG\xe9AA\nAC\xff\n>r2\nTT\n".to_vec();
        mask_non_ascii(&mut raw);
        // header bytes survive, sequence bytes become N one for one
        assert_eq!(raw, b">r1 caf\xc3\xa9\nGGGGNAA\nACN\n>r2\nTT\n".to_vec());
    }
}
