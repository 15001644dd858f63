use std::{
    fmt::Display,
    fs::{self, File},
    io::{self, Write},
};

use chrono::{DateTime, Utc};

use crate::{
    command::{Commands, Hit},
    Error, Pssm,
};

pub fn generate_vector_tab_delimited<T: Display>(vec: &[T]) -> String {
    vec.iter()
        .map(|val| val.to_string())
        .collect::<Vec<String>>()
        .join("\t")
}

pub fn write_file_header(
    file: &mut fs::File,
    command: &Commands,
    dt: DateTime<Utc>,
) -> io::Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    writeln!(file, "# yassi {}", version)?;
    match command {
        Commands::Search {
            motif,
            genome_file,
            num_entries,
            top,
            ..
        } => {
            writeln!(file, "# Command: search")?;
            writeln!(file, "# sites: {}", motif.sites_file)?;
            writeln!(file, "# background: {}", motif.background)?;
            writeln!(file, "# genome: {}", genome_file)?;
            if let Some(num_entries) = num_entries {
                writeln!(file, "# number of entries: {}", num_entries)?;
            }
            writeln!(file, "# top: {}", top)?;
        }
        Commands::Pssm { motif, .. } => {
            writeln!(file, "# Command: pssm")?;
            writeln!(file, "# sites: {}", motif.sites_file)?;
            writeln!(file, "# background: {}", motif.background)?;
        }
        Commands::Random { .. } => {}
    }
    writeln!(file, "# Start time: {}", dt.format("%Y-%m-%d %H:%M:%S"))?;

    Ok(())
}

/// Create the output file, named after the command and start time unless a
/// path was given.
pub fn create_output_file(
    save_flag: &Option<String>,
    command_name: &str,
    timestamp: i64,
) -> Result<(File, String), Error> {
    let save_path: String = save_flag
        .clone()
        .unwrap_or_else(|| format!("yassi-{command_name}-{timestamp}.tsv"));
    let file = fs::File::create(&save_path)?;
    Ok((file, save_path))
}

pub fn write_matches(file: &mut fs::File, hits: &[Hit]) -> Result<(), Error> {
    writeln!(file, "record\tposition\tscore")?;
    for hit in hits {
        writeln!(file, "{}\t{}", hit.record, hit.found)?;
    }
    Ok(())
}

pub fn write_pssm(file: &mut fs::File, pssm: &Pssm) -> Result<(), Error> {
    writeln!(file, "# Consensus: {}", pssm.consensus())?;
    writeln!(file, "position\tA\tC\tG\tT")?;
    for (i, column) in pssm.columns().iter().enumerate() {
        writeln!(
            file,
            "{}\t{}",
            i,
            generate_vector_tab_delimited(&column.weights())
        )?;
    }
    Ok(())
}

pub fn write_end_time(file: &mut fs::File) -> Result<DateTime<Utc>, Error> {
    let dt_end = Utc::now();
    writeln!(file, "# End time: {}", dt_end.format("%Y-%m-%d %H:%M:%S"))?;
    Ok(dt_end)
}
