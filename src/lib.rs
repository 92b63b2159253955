//! makesnps: make a copy of a single-sequence reference with SNPs in it.
//!
//! SNP positions are drawn uniformly at random but never closer together than a
//! minimum distance. The mutated sequence is written as FASTA and every
//! substitution is listed in a CSV ledger.

pub mod config;
pub mod error;
pub mod logger;
pub mod mutation;
pub mod report;
pub mod sampler;
pub mod seq;
pub mod stats;

use log::info;
use rand::Rng;

pub use crate::config::{Config, Params};
pub use crate::error::{MakeSnpsError, Result};
pub use crate::mutation::Substitution;
pub use crate::sampler::PositionSet;
pub use crate::seq::Sequence;
pub use crate::stats::SnpDistribution;

/// Everything decided for one reference: where the SNPs go and what they become.
#[derive(Debug, Clone)]
pub struct SnpSet {
    pub positions: PositionSet,
    pub substitutions: Vec<Substitution>,
    pub distribution: SnpDistribution,
}

/// Sample positions, check their spread and choose a replacement base for each.
/// A `count` of 0 gives an empty set.
pub fn make_snps<R: Rng + ?Sized>(
    sequence: &Sequence,
    params: Params,
    rng: &mut R,
) -> Result<SnpSet> {
    info!("Making SNPs...");
    let positions = sampler::sample(sequence.len(), params.count, params.min_distance, rng)?;

    let distribution =
        SnpDistribution::new(positions.as_slice(), sequence.len(), positions.min_distance());
    distribution.log_report();

    let substitutions = mutation::plan(sequence, &positions, rng)?;
    Ok(SnpSet {
        positions,
        substitutions,
        distribution,
    })
}

/// Whole pipeline: validate, read the reference, place SNPs, write both outputs.
pub fn run<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Result<SnpSet> {
    config.validate()?;

    let sequence = seq::read_reference(&config.input)?;
    let snps = make_snps(&sequence, config.params, rng)?;

    info!("Writing output files...");
    report::write_output_files(
        &config.output,
        &config.ledger,
        &sequence,
        &snps.substitutions,
        &config.output_id,
        config.column_width,
    )?;

    Ok(snps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_make_snps_zero_count() {
        let sequence = Sequence::from_bases(b"ACGTACGTAC".to_vec()).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let snps = make_snps(&sequence, Params { count: 0, min_distance: 3 }, &mut rng).unwrap();
        assert!(snps.positions.is_empty());
        assert!(snps.substitutions.is_empty());
        assert_eq!(
            report::render(&sequence, &snps.substitutions, "x", 70).unwrap(),
            ">x\nACGTACGTAC\n"
        );
        assert_eq!(report::render_ledger(&snps.substitutions).unwrap(), "Position,Reference,SNP\n");
    }

    #[test]
    fn test_make_snps_small_reference() {
        let sequence = Sequence::from_bases(b"ACGTACGTAC".to_vec()).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
        let snps = make_snps(&sequence, Params { count: 2, min_distance: 3 }, &mut rng).unwrap();

        let p = snps.positions.as_slice();
        assert_eq!(p.len(), 2);
        assert!(p[1] - p[0] >= 3 && p[1] < 10);
        assert!(snps.distribution.is_consistent());
        assert_eq!(snps.distribution.total(), 2);

        let ledger = report::render_ledger(&snps.substitutions).unwrap();
        let rows: Vec<&str> = ledger.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        for (row, (&pos, sub)) in rows.iter().zip(p.iter().zip(&snps.substitutions)) {
            assert_eq!(row.split(',').next().unwrap(), pos.to_string());
            assert_ne!(sub.reference, sub.alternative);
        }

        let text = report::render(&sequence, &snps.substitutions, "m", 70).unwrap();
        let body: String = text.lines().skip(1).collect();
        assert_eq!(body.len(), 10);
    }

    #[test]
    fn test_run_validates_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(
            dir.path().join("missing.fa"),
            dir.path().join("out.fa"),
            dir.path().join("snps.csv"),
        );
        config.params.count = 0;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert!(matches!(
            run(&config, &mut rng),
            Err(MakeSnpsError::Configuration(_))
        ));
        assert!(!dir.path().join("out.fa").exists());
    }

    #[test]
    fn test_run_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ref.fa");
        std::fs::write(&input, ">ref\n".to_string() + &"ACGT".repeat(2500) + "\n").unwrap();

        let mut config = Config::new(input, dir.path().join("out.fa"), dir.path().join("snps.csv"));
        config.params = Params { count: 50, min_distance: 100 };
        config.output_id = "mutant".to_string();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let snps = run(&config, &mut rng).unwrap();
        assert_eq!(snps.substitutions.len(), 50);

        let fasta = std::fs::read_to_string(&config.output).unwrap();
        assert!(fasta.starts_with(">mutant\n"));
        let body: String = fasta.lines().skip(1).collect();
        assert_eq!(body.len(), 10_000);

        let ledger = std::fs::read_to_string(&config.ledger).unwrap();
        assert_eq!(ledger.lines().count(), 51);
    }

    #[test]
    fn test_run_unwritable_ledger_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ref.fa");
        std::fs::write(&input, ">ref\n".to_string() + &"ACGT".repeat(250) + "\n").unwrap();

        let mut config = Config::new(
            input,
            dir.path().join("out.fa"),
            dir.path().join("nodir").join("snps.csv"),
        );
        config.params = Params { count: 5, min_distance: 10 };

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        assert!(matches!(
            run(&config, &mut rng),
            Err(MakeSnpsError::Io { .. })
        ));
        assert!(!config.output.exists());
    }
}
