use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{error, info};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use structopt::StructOpt;

use makesnps::config::{Config, Params, MAX_SNPS};
use makesnps::logger;

#[derive(Debug, StructOpt)]
#[structopt(name = "makesnps", about = "Create a copy of a reference genome with SNPs inserted")]
struct Opt {
    /// Reference genome in FASTA format (a single sequence)
    #[structopt(short, long, parse(from_os_str))]
    input: PathBuf,

    /// Output FASTA file
    #[structopt(short, long, parse(from_os_str))]
    output: PathBuf,

    /// CSV file listing every SNP inserted
    #[structopt(short = "c", long, parse(from_os_str))]
    ledger: PathBuf,

    /// Output sequence id
    #[structopt(short = "s", long, default_value = "makesnps")]
    id: String,

    /// Number of SNPs to insert (1 to 10000)
    #[structopt(short = "n", long, default_value = "1000", parse(try_from_str = parse_count))]
    count: usize,

    /// Minimum distance between SNPs
    #[structopt(short, long, default_value = "100")]
    min_distance: usize,

    /// Column width of the output file
    #[structopt(short = "w", long, default_value = "70", parse(try_from_str = parse_width))]
    column_width: usize,

    /// Seed for the random number generator (default: taken from the clock)
    #[structopt(long)]
    seed: Option<u64>,

    /// Also print debug messages
    #[structopt(short, long)]
    verbose: bool,

    /// Only print warnings and errors
    #[structopt(short, long)]
    quiet: bool,
}

impl Opt {
    fn into_config(self) -> Config {
        Config {
            input: self.input,
            output: self.output,
            ledger: self.ledger,
            output_id: self.id,
            params: Params {
                count: self.count,
                min_distance: self.min_distance,
            },
            column_width: self.column_width,
        }
    }
}

fn parse_count(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if (1..=MAX_SNPS).contains(&n) => Ok(n),
        _ => Err(format!("number of SNPs must be between 1 and {}", MAX_SNPS)),
    }
}

fn parse_width(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err("column width must be a positive integer".to_string()),
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() {
    let opt = Opt::from_args();
    if let Err(e) = logger::init_logger(logger::level_for(opt.verbose, opt.quiet)) {
        eprintln!("Failed to set up logging: {}", e);
    }

    info!("makesnps - create copy of genome with SNPs inserted.");
    let seed = opt.seed.unwrap_or_else(seed_from_clock);
    let config = opt.into_config();
    config.display_parameters();

    info!("Random seed: {}", seed);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    match makesnps::run(&config, &mut rng) {
        Ok(_) => info!("Finished."),
        Err(e) => {
            match e.source() {
                Some(cause) => error!("{}: {}", e, cause),
                None => error!("{}", e),
            }
            process::exit(1);
        }
    }
}
