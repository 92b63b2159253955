use std::path::PathBuf;

use log::info;

use crate::error::{MakeSnpsError, Result};

pub const MAX_SNPS: usize = 10_000;
pub const DEFAULT_ID: &str = "makesnps";
pub const DEFAULT_COUNT: usize = 1000;
pub const DEFAULT_MIN_DISTANCE: usize = 100;
pub const DEFAULT_COLUMN_WIDTH: usize = 70;

/// Parameters of the sampling step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    pub count: usize,
    pub min_distance: usize,
}

/// One run of the tool. Built once and validated before anything is read.
#[derive(Clone, Debug)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ledger: PathBuf,
    pub output_id: String,
    pub params: Params,
    pub column_width: usize,
}

impl Config {
    pub fn new<P: Into<PathBuf>>(input: P, output: P, ledger: P) -> Self {
        Config {
            input: input.into(),
            output: output.into(),
            ledger: ledger.into(),
            output_id: DEFAULT_ID.to_string(),
            params: Params {
                count: DEFAULT_COUNT,
                min_distance: DEFAULT_MIN_DISTANCE,
            },
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let missing = |what: &str| {
            Err(MakeSnpsError::Configuration(format!(
                "You must specify {}",
                what
            )))
        };
        if self.input.as_os_str().is_empty() {
            return missing("an input file");
        }
        if self.output.as_os_str().is_empty() {
            return missing("an output file");
        }
        if self.ledger.as_os_str().is_empty() {
            return missing("a SNP list filename");
        }
        if self.output_id.is_empty() || self.output_id.contains(['\n', '\r']) {
            return Err(MakeSnpsError::Configuration(
                "output sequence id must be a non-empty single line".to_string(),
            ));
        }
        if self.params.count < 1 || self.params.count > MAX_SNPS {
            return Err(MakeSnpsError::Configuration(format!(
                "number of SNPs must be between 1 and {}",
                MAX_SNPS
            )));
        }
        if self.column_width < 1 {
            return Err(MakeSnpsError::Configuration(
                "column width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn display_parameters(&self) {
        info!("      Input filename: {}", self.input.display());
        info!("     Output filename: {}", self.output.display());
        info!("  Output sequence ID: {}", self.output_id);
        info!("   SNP list filename: {}", self.ledger.display());
        info!("      Number of SNPs: {}", self.params.count);
        info!("Min distance between: {}", self.params.min_distance);
        info!("        Column width: {}", self.column_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("ref.fa", "out.fa", "snps.csv")
    }

    #[test]
    fn test_defaults_are_valid() {
        let c = config();
        assert_eq!(c.output_id, "makesnps");
        assert_eq!(c.params, Params { count: 1000, min_distance: 100 });
        assert_eq!(c.column_width, 70);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_count_bounds() {
        let mut c = config();
        c.params.count = 0;
        assert!(matches!(c.validate(), Err(MakeSnpsError::Configuration(_))));
        c.params.count = MAX_SNPS + 1;
        assert!(matches!(c.validate(), Err(MakeSnpsError::Configuration(_))));
        c.params.count = MAX_SNPS;
        assert!(c.validate().is_ok());
        c.params.count = 1;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_ledger_is_mandatory() {
        let c = Config::new("ref.fa", "out.fa", "");
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("SNP list"));
    }

    #[test]
    fn test_bad_width_and_id() {
        let mut c = config();
        c.column_width = 0;
        assert!(c.validate().is_err());

        let mut c = config();
        c.output_id = "two\nlines".to_string();
        assert!(c.validate().is_err());
    }
}
