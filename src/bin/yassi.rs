use clap::Parser;
use clap_verbosity_flag::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;
use yassi::{Error, Yassi};

fn main() -> Result<(), Error> {
    let yassi = Yassi::parse();
    let max_level = match yassi.verbose.log_level() {
        Some(Level::Error) => LevelFilter::ERROR,
        Some(Level::Warn) => LevelFilter::WARN,
        Some(Level::Info) => LevelFilter::INFO,
        Some(Level::Debug) => LevelFilter::DEBUG,
        Some(Level::Trace) => LevelFilter::TRACE,
        None => LevelFilter::OFF,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_target(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_file(false)
        .without_time()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("setting default subscriber failed");
    }
    yassi.exec()
}
