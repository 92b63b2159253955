use std::fmt;

use rand::Rng;

use crate::error::{MakeSnpsError, Result};
use crate::sampler::PositionSet;
use crate::seq::{Sequence, ALPHABET};

/// One SNP: the reference base at `position` is replaced by `alternative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    pub position: usize,
    pub reference: u8,
    pub alternative: u8,
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.position, self.reference as char, self.alternative as char
        )
    }
}

/// Uniform choice among the three bases different from `reference`.
pub fn draw_replacement<R: Rng + ?Sized>(reference: u8, rng: &mut R) -> u8 {
    loop {
        let candidate = ALPHABET[rng.random_range(0..ALPHABET.len())];
        if candidate != reference {
            return candidate;
        }
    }
}

/// One substitution per position, in ascending position order.
pub fn plan<R: Rng + ?Sized>(
    sequence: &Sequence,
    positions: &PositionSet,
    rng: &mut R,
) -> Result<Vec<Substitution>> {
    positions
        .iter()
        .map(|&position| -> Result<Substitution> {
            let reference = sequence.get(position).ok_or_else(|| {
                MakeSnpsError::Internal(format!(
                    "SNP position {} outside sequence of length {}",
                    position,
                    sequence.len()
                ))
            })?;
            Ok(Substitution {
                position,
                reference,
                alternative: draw_replacement(reference, rng),
            })
        })
        .collect()
}
