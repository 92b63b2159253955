use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MakeSnpsError>;

/// Every way a run can fail. None of them are recoverable within a run.
#[derive(Debug, Error)]
pub enum MakeSnpsError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Bad FASTA file {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    #[error("Failed to read/write file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Cannot place {count} SNPs at least {min_distance} apart in {length} nucleotides \
         (gave up after {attempts} draws)"
    )]
    Infeasible {
        count: usize,
        min_distance: usize,
        length: usize,
        attempts: u64,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MakeSnpsError {
    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn format<P: AsRef<Path>>(path: P, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }
}
