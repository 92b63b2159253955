//! Spacing-constrained SNP position sampling.
//!
//! Positions are drawn uniformly from `[0, L)` and kept only if they sit at least
//! `min_distance` away from every position accepted so far (rejection sampling).
//! The accepted positions are held in ascending order so a candidate only has to
//! be compared with its two would-be neighbours.
//!
//! Rejection sampling has no natural stopping point once the set is saturated: with
//! `N * D` near `L` the remaining gaps can all become too narrow ("jammed") and no
//! further draw will ever be accepted. Instead of looping forever the sampler
//!
//! * rejects up front any request that could not fit even with perfect packing,
//! * checks for a jam after every `L` consecutive rejections and restarts from an
//!   empty set when one is found,
//! * gives up with [`MakeSnpsError::Infeasible`] after `max_attempts` draws for a
//!   single position or `max_restarts` restarts.

use log::{debug, trace};
use rand::Rng;

use crate::error::{MakeSnpsError, Result};

pub const DEFAULT_MAX_RESTARTS: usize = 100;
const MIN_ATTEMPTS_PER_POSITION: u64 = 1000;

/// Accepted SNP positions, strictly ascending, consecutive members at least
/// `min_distance` apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSet {
    positions: Vec<usize>,
    min_distance: usize,
}

impl PositionSet {
    pub fn as_slice(&self) -> &[usize] {
        &self.positions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.positions.iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn min_distance(&self) -> usize {
        self.min_distance
    }
}

/// Builds a [`PositionSet`] one position at a time.
#[derive(Debug, Clone)]
pub struct PositionSampler {
    length: usize,
    min_distance: usize,
    max_attempts: u64,
    max_restarts: usize,
    positions: Vec<usize>,
    draws: u64,
}

impl PositionSampler {
    pub fn new(length: usize, min_distance: usize) -> Result<Self> {
        if length == 0 {
            return Err(MakeSnpsError::Configuration(
                "cannot place SNPs in an empty sequence".to_string(),
            ));
        }
        Ok(PositionSampler {
            length,
            min_distance,
            max_attempts: MIN_ATTEMPTS_PER_POSITION.max((length as u64).saturating_mul(10)),
            max_restarts: DEFAULT_MAX_RESTARTS,
            positions: Vec::new(),
            draws: 0,
        })
    }

    /// Number of draws allowed while looking for a single position.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_max_restarts(mut self, max_restarts: usize) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    /// Total number of random draws made so far, across restarts.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    // Two SNPs never share a position, even with a minimum distance of 0.
    fn spacing(&self) -> usize {
        self.min_distance.max(1)
    }

    /// Index `i` such that every accepted position before `i` is `< p` and every
    /// one at or after `i` is `>= p`.
    pub fn insertion_point(&self, p: usize) -> usize {
        self.positions.partition_point(|&x| x < p)
    }

    /// Whether `p` keeps the minimum distance to both of its neighbours.
    pub fn position_ok(&self, p: usize) -> bool {
        let d = self.spacing();
        let i = self.insertion_point(p);
        let n = self.positions.len();

        if n == 0 {
            true
        } else if i == n {
            p - self.positions[n - 1] >= d
        } else if i == 0 {
            self.positions[0] - p >= d
        } else {
            self.positions[i] - p >= d && p - self.positions[i - 1] >= d
        }
    }

    /// Whether any position in `[0, L)` could still be accepted.
    pub fn has_room(&self) -> bool {
        let d = self.spacing();
        match (self.positions.first(), self.positions.last()) {
            (Some(&first), Some(&last)) => {
                first >= d
                    || last.saturating_add(d) < self.length
                    || self
                        .positions
                        .windows(2)
                        .any(|w| w[1] - w[0] >= d.saturating_mul(2))
            }
            _ => true,
        }
    }

    /// Fails fast when `count` positions cannot fit even when packed exactly
    /// `min_distance` apart starting at 0.
    pub fn check_feasible(&self, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let needed = (count - 1)
            .checked_mul(self.spacing())
            .and_then(|span| span.checked_add(1));
        match needed {
            Some(needed) if needed <= self.length => Ok(()),
            _ => Err(self.infeasible(count)),
        }
    }

    fn infeasible(&self, count: usize) -> MakeSnpsError {
        MakeSnpsError::Infeasible {
            count,
            min_distance: self.min_distance,
            length: self.length,
            attempts: self.draws,
        }
    }

    fn insert(&mut self, p: usize) {
        let i = self.insertion_point(p);
        self.positions.insert(i, p);
    }

    /// Draw until one more position is accepted. Returns `None` if the budget runs
    /// out or the set is found to be jammed.
    pub fn add_one<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let mut rejected_in_a_row = 0;
        for _ in 0..self.max_attempts {
            let p = rng.random_range(0..self.length);
            self.draws += 1;
            if self.position_ok(p) {
                trace!("Accepted position {} after {} rejections", p, rejected_in_a_row);
                self.insert(p);
                return Some(p);
            }
            rejected_in_a_row += 1;
            if rejected_in_a_row % self.length == 0 && !self.has_room() {
                debug!(
                    "No room left after {} positions ({} in a row rejected)",
                    self.positions.len(),
                    rejected_in_a_row
                );
                return None;
            }
        }
        debug!(
            "Gave up on position {} after {} draws",
            self.positions.len() + 1,
            self.max_attempts
        );
        None
    }

    /// Fill the set up to `count` positions, restarting from scratch on a jam.
    pub fn sample<R: Rng + ?Sized>(mut self, count: usize, rng: &mut R) -> Result<PositionSet> {
        self.check_feasible(count)?;

        for round in 0..=self.max_restarts {
            if round > 0 {
                debug!("Restarting SNP placement (round {})", round + 1);
                self.positions.clear();
            }
            while self.positions.len() < count {
                if self.add_one(rng).is_none() {
                    break;
                }
            }
            if self.positions.len() == count {
                debug!(
                    "Placed {} SNPs with {} draws in {} round(s)",
                    count,
                    self.draws,
                    round + 1
                );
                return Ok(PositionSet {
                    positions: self.positions,
                    min_distance: self.min_distance,
                });
            }
        }

        Err(self.infeasible(count))
    }
}

/// Choose `count` distinct positions in `[0, length)`, pairwise at least
/// `min_distance` apart, using only uniform draws from `rng`.
pub fn sample<R: Rng + ?Sized>(
    length: usize,
    count: usize,
    min_distance: usize,
    rng: &mut R,
) -> Result<PositionSet> {
    PositionSampler::new(length, min_distance)?.sample(count, rng)
}
