use std::fmt;

use log::{info, warn};

pub const N_BINS: usize = 10;

/// Positions `start..stop` of the sequence and how many SNPs landed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bin {
    pub start: usize,
    pub stop: usize,
    pub count: usize,
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "({:>24}) \t: {}", "empty", self.count);
        }
        write!(
            f,
            "({:>10} to {:>10}) \t: {}",
            self.start,
            self.stop - 1,
            self.count
        )
    }
}

impl Bin {
    /// True for trailing bins of sequences shorter than [`N_BINS`].
    pub fn is_empty(&self) -> bool {
        self.start >= self.stop
    }
}

/// Adjacent pair of SNP positions closer than the minimum distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub left: usize,
    pub right: usize,
}

impl Violation {
    pub fn gap(&self) -> usize {
        self.right.saturating_sub(self.left)
    }
}

/// Every adjacent pair in `positions` that is out of order or less than
/// `min_distance` apart. Empty for anything the sampler produced.
pub fn spacing_violations(positions: &[usize], min_distance: usize) -> Vec<Violation> {
    positions
        .windows(2)
        .filter(|w| w[1] <= w[0] || w[1] - w[0] < min_distance)
        .map(|w| Violation {
            left: w[0],
            right: w[1],
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnpDistribution {
    pub bins: Vec<Bin>,
    pub violations: Vec<Violation>,
}

impl SnpDistribution {
    /// Bin `positions` into [`N_BINS`] equal-width ranges over `[0, length)` and
    /// re-check the spacing. Bin width is rounded up so the last bin reaches the
    /// end of the sequence.
    pub fn new(positions: &[usize], length: usize, min_distance: usize) -> Self {
        let width = length.div_ceil(N_BINS).max(1);
        let mut bins: Vec<Bin> = (0..N_BINS)
            .map(|i| Bin {
                start: (i * width).min(length),
                stop: ((i + 1) * width).min(length),
                count: 0,
            })
            .collect();

        for &p in positions {
            bins[(p / width).min(N_BINS - 1)].count += 1;
        }

        SnpDistribution {
            bins,
            violations: spacing_violations(positions, min_distance),
        }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn log_report(&self) {
        info!("Distribution of SNPs:");
        for (i, bin) in self.bins.iter().enumerate() {
            info!("Bin {} {}", i, bin);
        }
        for v in &self.violations {
            warn!(
                "SNPs at {} and {} are only {} apart",
                v.left,
                v.right,
                v.gap()
            );
        }
    }
}
