//! Output artifacts: the mutated FASTA and the CSV ledger of substitutions.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::warn;

use crate::error::{MakeSnpsError, Result};
use crate::mutation::Substitution;
use crate::seq::{Sequence, HEADER_MARKER};

pub const LEDGER_HEADER: &str = "Position,Reference,SNP";

/// The reference bases with every substitution applied, in order.
pub struct MutatedBases<'a> {
    bases: std::slice::Iter<'a, u8>,
    substitutions: std::iter::Peekable<std::slice::Iter<'a, Substitution>>,
    position: usize,
}

impl<'a> MutatedBases<'a> {
    /// `substitutions` must be in ascending position order.
    pub fn new(sequence: &'a Sequence, substitutions: &'a [Substitution]) -> Self {
        MutatedBases {
            bases: sequence.as_bytes().iter(),
            substitutions: substitutions.iter().peekable(),
            position: 0,
        }
    }
}

impl<'a> Iterator for MutatedBases<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        let base = *self.bases.next()?;
        let position = self.position;
        self.position += 1;
        match self.substitutions.next_if(|s| s.position == position) {
            Some(sub) => Some(sub.alternative),
            None => Some(base),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.bases.size_hint()
    }
}

/// Write a FASTA record, wrapping the bases every `column_width` symbols. The
/// header line is never wrapped and every line ends with a newline.
pub fn write_fasta<W, I>(out: &mut W, id: &str, bases: I, column_width: usize) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = u8>,
{
    out.write_all(&[HEADER_MARKER])?;
    out.write_all(id.as_bytes())?;
    out.write_all(b"\n")?;

    let mut line = Vec::with_capacity(column_width + 1);
    for base in bases {
        line.push(base);
        if line.len() == column_width {
            line.push(b'\n');
            out.write_all(&line)?;
            line.clear();
        }
    }
    if !line.is_empty() {
        line.push(b'\n');
        out.write_all(&line)?;
    }
    Ok(())
}

pub fn write_ledger<W: Write>(out: &mut W, substitutions: &[Substitution]) -> std::io::Result<()> {
    writeln!(out, "{}", LEDGER_HEADER)?;
    for sub in substitutions {
        writeln!(out, "{}", sub)?;
    }
    Ok(())
}

fn check_width(column_width: usize) -> Result<()> {
    if column_width == 0 {
        return Err(MakeSnpsError::Configuration(
            "column width must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// The mutated sequence as FASTA text.
pub fn render(
    sequence: &Sequence,
    substitutions: &[Substitution],
    output_id: &str,
    column_width: usize,
) -> Result<String> {
    check_width(column_width)?;
    let mut buf = Vec::with_capacity(sequence.len() + sequence.len() / column_width + 64);
    write_fasta(
        &mut buf,
        output_id,
        MutatedBases::new(sequence, substitutions),
        column_width,
    )
    .map_err(|e| MakeSnpsError::Internal(format!("in-memory write failed: {}", e)))?;
    String::from_utf8(buf).map_err(|e| MakeSnpsError::Internal(e.to_string()))
}

/// The ledger as CSV text, header row first.
pub fn render_ledger(substitutions: &[Substitution]) -> Result<String> {
    let mut buf = Vec::with_capacity(LEDGER_HEADER.len() + 1 + substitutions.len() * 16);
    write_ledger(&mut buf, substitutions)
        .map_err(|e| MakeSnpsError::Internal(format!("in-memory write failed: {}", e)))?;
    String::from_utf8(buf).map_err(|e| MakeSnpsError::Internal(e.to_string()))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| MakeSnpsError::io(path, e))
}

fn discard(paths: &[&Path]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Could not remove incomplete file {}: {}", path.display(), e);
        }
    }
}

/// Write the mutated FASTA to `output` and the ledger to `ledger`.
///
/// Both files are opened before either is written. If anything fails, every file
/// created here is removed again, so a failed run leaves no output behind.
pub fn write_output_files(
    output: &Path,
    ledger: &Path,
    sequence: &Sequence,
    substitutions: &[Substitution],
    output_id: &str,
    column_width: usize,
) -> Result<()> {
    check_width(column_width)?;

    let mut fasta_out = create(output)?;
    let mut ledger_out = match create(ledger) {
        Ok(out) => out,
        Err(e) => {
            drop(fasta_out);
            discard(&[output]);
            return Err(e);
        }
    };

    let written = write_fasta(
        &mut fasta_out,
        output_id,
        MutatedBases::new(sequence, substitutions),
        column_width,
    )
    .and_then(|()| fasta_out.flush())
    .map_err(|e| MakeSnpsError::io(output, e))
    .and_then(|()| {
        write_ledger(&mut ledger_out, substitutions)
            .and_then(|()| ledger_out.flush())
            .map_err(|e| MakeSnpsError::io(ledger, e))
    });

    if written.is_err() {
        drop(fasta_out);
        drop(ledger_out);
        discard(&[output, ledger]);
    }
    written
}
