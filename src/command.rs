use crate::{
    load_data, load_sites,
    utils::{
        create_output_file, generate_vector_tab_delimited, write_end_time, write_file_header,
        write_matches, write_pssm,
    },
    Background, Error, Match, Pssm, Record,
};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::InfoLevel;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, trace, warn};

const NUCLEOTIDES: &[u8; 4] = b"acgt";
const PROGRESS_TEMPLATE: &str =
    "[{elapsed_precise}] {spinner:.green} {bar:40.cyan/blue} {pos:>7}/{len:7} {msg} ({eta})";

/// Yet another site search: score a genome with a PSSM built from known binding sites
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Yassi {
    #[command(subcommand)]
    pub command: Commands,
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<InfoLevel>,
}

/// A match found in one record of the genome.
#[derive(Debug, Clone)]
pub struct Hit<'a> {
    pub record: &'a str,
    pub found: Match,
}

impl Yassi {
    pub fn exec(self) -> Result<(), Error> {
        let dt = Utc::now();
        info!("Welcome to yassi!");
        match &self.command {
            Commands::Search {
                motif,
                genome_file,
                top,
                num_entries,
                output_file,
            } => {
                let pssm = motif.build()?;
                let records = load_data(genome_file, *num_entries)?;

                let pb = ProgressBar::new(records.len() as u64);
                pb.set_style(
                    ProgressStyle::with_template(PROGRESS_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                let hits = scan_records(&pssm, &records, &pb);
                pb.finish_and_clear();
                info!("{} putative binding sites found", hits.len());

                info!("Top {} sites:", top);
                for hit in hits.iter().take(*top) {
                    println!("{}\t{}", hit.record, hit.found);
                }

                if let Some(save_flag) = output_file {
                    let (mut file, file_path) =
                        create_output_file(save_flag, "search", dt.timestamp_micros())?;
                    write_file_header(&mut file, &self.command, dt)?;
                    write_matches(&mut file, &hits)?;
                    write_end_time(&mut file)?;
                    info!("Results saved to {}", file_path);
                }
            }
            Commands::Pssm { motif, output_file } => {
                let pssm = motif.build()?;
                println!("position\tA\tC\tG\tT");
                for (i, column) in pssm.columns().iter().enumerate() {
                    println!("{}\t{}", i, generate_vector_tab_delimited(&column.weights()));
                }
                if let Some(save_flag) = output_file {
                    let (mut file, file_path) =
                        create_output_file(save_flag, "pssm", dt.timestamp_micros())?;
                    write_file_header(&mut file, &self.command, dt)?;
                    write_pssm(&mut file, &pssm)?;
                    write_end_time(&mut file)?;
                    info!("PSSM saved to {}", file_path);
                }
            }
            Commands::Random {
                k,
                count,
                seed,
                fasta,
            } => {
                if *k == 0 {
                    return Err(Error::InvalidMotifLength);
                }
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_entropy(),
                };
                for i in 0..*count {
                    if *fasta {
                        println!(">random_{}", i + 1);
                    }
                    println!("{}", random_site(&mut rng, *k));
                }
            }
        }

        let dt_end = Utc::now();
        if let Some(duration) = dt_end.signed_duration_since(dt).num_microseconds() {
            info!("Done in {} seconds", duration as f64 / 1_000_000.0);
        }
        Ok(())
    }
}

/// Scan every record and rank all hits together, best first.
///
/// Records shorter than the motif are skipped with a warning. The ranking is
/// stable, so equal scores keep record order, then position order.
#[tracing::instrument(skip_all)]
pub fn scan_records<'a>(pssm: &Pssm, records: &'a [Record], pb: &ProgressBar) -> Vec<Hit<'a>> {
    let mut hits: Vec<Hit> = vec![];
    for record in records {
        pb.set_message(record.id.clone());
        if record.seq.len() < pssm.len() {
            warn!(
                "Skipping '{}': {} bp is shorter than the motif",
                record.id,
                record.seq.len()
            );
        } else {
            let found = pssm.scan(&record.seq);
            trace!("{} matches in '{}'", found.len(), record.id);
            hits.extend(found.into_iter().map(|found| Hit {
                record: &record.id,
                found,
            }));
        }
        pb.inc(1);
    }
    hits.sort_by(|a, b| b.found.score.total_cmp(&a.found.score));
    hits
}

/// A lowercase `acgt` sequence of length `k` drawn uniformly.
pub fn random_site<R: Rng>(rng: &mut R, k: usize) -> String {
    (0..k)
        .map(|_| NUCLEOTIDES[rng.gen_range(0..NUCLEOTIDES.len())] as char)
        .collect()
}

#[derive(Debug, Args)]
pub struct MotifOpts {
    /// file with one aligned binding site per line ('>' lines are ignored)
    pub sites_file: String,

    /// background frequencies of A,C,G,T
    #[arg(short = 'b', long = "background", default_value_t = Background::default())]
    pub background: Background,
}

impl MotifOpts {
    fn build(&self) -> Result<Pssm, Error> {
        let sites = load_sites(&self.sites_file)?;
        let pssm = Pssm::from_sites(&sites, &self.background)?;
        info!("Consensus: {}", pssm.consensus());
        Ok(pssm)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[clap(name = "search", about = "Scan a genome for putative binding sites")]
    Search {
        #[clap(flatten)]
        motif: MotifOpts,

        /// FASTA file of the genome to scan
        genome_file: String,

        /// how many of the best sites to print
        #[arg(short = 'n', long = "top", default_value_t = 5)]
        top: usize,

        /// how many entries to read
        #[arg(short = 'e', long = "entries")]
        num_entries: Option<usize>,

        /// save all sites to file
        #[arg(short = 'o', long = "output")]
        output_file: Option<Option<String>>,
    },

    #[clap(name = "pssm", about = "Print the PSSM built from the binding sites")]
    Pssm {
        #[clap(flatten)]
        motif: MotifOpts,

        /// save the PSSM to file
        #[arg(short = 'o', long = "output")]
        output_file: Option<Option<String>>,
    },

    #[clap(
        name = "random",
        about = "Generate random sequences to use as sites or as a genome"
    )]
    Random {
        /// sequence length
        #[arg(short)]
        k: usize,

        /// number of sequences
        #[arg(short = 'n', long = "count", default_value_t = 1)]
        count: usize,

        /// seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// print a FASTA header before each sequence
        #[arg(short = 'f', long = "fasta")]
        fasta: bool,
    },
}
