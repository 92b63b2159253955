use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};

use crate::error::{MakeSnpsError, Result};

pub const ALPHABET: [u8; 4] = [b'A', b'C', b'G', b'T'];
pub const HEADER_MARKER: u8 = b'>';

/// Upper-cased nucleotide for A/C/G/T in either case, `None` for anything else.
pub fn normalize(value: u8) -> Option<u8> {
    match value {
        b'A' | b'a' => Some(b'A'),
        b'C' | b'c' => Some(b'C'),
        b'G' | b'g' => Some(b'G'),
        b'T' | b't' => Some(b'T'),
        _ => None,
    }
}

pub fn is_nucleotide(value: u8) -> bool {
    normalize(value).is_some()
}

/// A single reference sequence over {A, C, G, T}, 0-indexed and immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    bases: Vec<u8>,
}

impl Sequence {
    /// Parse a single-record FASTA text.
    ///
    /// The first line must be a `>` header. Everything after it is scanned byte by
    /// byte: nucleotides are kept (upper-cased), a second `>` is an error, and
    /// anything else (line breaks, spaces, N, digits) is dropped. `origin` only
    /// feeds error messages.
    pub fn load<P: AsRef<Path>>(raw: &[u8], origin: P) -> Result<Sequence> {
        let origin = origin.as_ref();
        if raw.first() != Some(&HEADER_MARKER) {
            return Err(MakeSnpsError::format(
                origin,
                "File should begin with FASTA header",
            ));
        }

        let body_start = raw
            .iter()
            .position(|&b| b == b'\n')
            .map_or(raw.len(), |i| i + 1);

        let mut bases = Vec::with_capacity(raw.len() - body_start);
        for &b in &raw[body_start..] {
            if b == HEADER_MARKER {
                return Err(MakeSnpsError::format(
                    origin,
                    "File should only have 1 sequence in it",
                ));
            }
            if let Some(n) = normalize(b) {
                bases.push(n);
            }
        }

        if bases.is_empty() {
            return Err(MakeSnpsError::format(origin, "no nucleotides found"));
        }

        debug!(
            "Kept {} of {} body bytes as nucleotides",
            bases.len(),
            raw.len() - body_start
        );
        Ok(Sequence { bases })
    }

    /// Build directly from bases that are already upper-case A/C/G/T.
    pub fn from_bases(bases: Vec<u8>) -> Result<Sequence> {
        if let Some(bad) = bases.iter().find(|&&b| !ALPHABET.contains(&b)) {
            return Err(MakeSnpsError::Internal(format!(
                "non-nucleotide byte {:?} in sequence",
                *bad as char
            )));
        }
        Ok(Sequence { bases })
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<u8> {
        self.bases.get(position).copied()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bases
    }
}

/// Read the reference file and parse it.
pub fn read_reference<P: AsRef<Path>>(file_path: P) -> Result<Sequence> {
    let path = file_path.as_ref();
    let file = File::open(path).map_err(|e| MakeSnpsError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .map_err(|e| MakeSnpsError::io(path, e))?;
    if raw.is_empty() {
        return Err(MakeSnpsError::format(path, "Couldn't get header line"));
    }

    let sequence = Sequence::load(&raw, path)?;

    info!("Reference read... {} nucleotides.", sequence.len());
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load(text: &str) -> Result<Sequence> {
        Sequence::load(text.as_bytes(), "test.fa")
    }

    #[test]
    fn test_load_strips_wrapping_and_case() {
        let seq = load(">chr1 some description\nacgT\nAC GT\r\nnnAC\n").unwrap();
        assert_eq!(seq.as_bytes(), b"ACGTACGTAC");
        assert_eq!(seq.len(), 10);
        assert_eq!(seq.get(3), Some(b'T'));
        assert_eq!(seq.get(10), None);
    }

    #[test]
    fn test_is_nucleotide() {
        assert!(b"ACGTacgt".iter().all(|&b| is_nucleotide(b)));
        assert!(!b"Nn-> \n".iter().any(|&b| is_nucleotide(b)));
    }

    #[test]
    fn test_header_content_is_ignored() {
        // letters in the header line are not sequence
        let seq = load(">ACGT\nGG\n").unwrap();
        assert_eq!(seq.as_bytes(), b"GG");
    }

    #[test]
    fn test_missing_header() {
        let err = load("ACGT\n").unwrap_err();
        assert!(matches!(err, MakeSnpsError::Format { .. }));
        assert!(err.to_string().contains("begin with FASTA header"));
    }

    #[test]
    fn test_second_record_rejected() {
        let err = load(">a\nACGT\n>b\nACGT\n").unwrap_err();
        assert!(err.to_string().contains("only have 1 sequence"));
    }

    #[test]
    fn test_empty_body_rejected() {
        assert!(matches!(load(">a\n"), Err(MakeSnpsError::Format { .. })));
        assert!(matches!(load(">a"), Err(MakeSnpsError::Format { .. })));
        assert!(matches!(load(">a\nNNNN\n"), Err(MakeSnpsError::Format { .. })));
    }

    #[test]
    fn test_from_bases_checks_alphabet() {
        assert!(Sequence::from_bases(b"ACGT".to_vec()).is_ok());
        assert!(matches!(
            Sequence::from_bases(b"ACGN".to_vec()),
            Err(MakeSnpsError::Internal(_))
        ));
    }

    #[test]
    fn test_read_reference_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, ">ref\nACGTACGTAC\n").unwrap();
        let seq = read_reference(file.path()).unwrap();
        assert_eq!(seq.as_bytes(), b"ACGTACGTAC");
    }

    #[test]
    fn test_read_reference_errors() {
        let empty = NamedTempFile::new().unwrap();
        assert!(matches!(
            read_reference(empty.path()),
            Err(MakeSnpsError::Format { .. })
        ));
        assert!(matches!(
            read_reference("/nonexistent/dir/ref.fa"),
            Err(MakeSnpsError::Io { .. })
        ));
    }
}
