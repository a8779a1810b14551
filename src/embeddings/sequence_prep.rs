// sequence_prep.rs — Sequence preparation for embedding backends.
//
// k-mer backends see one centred k-mer per residue; BERT backends see
// space-separated residues with rare amino acids collapsed to X.

use crate::config;

/// Split a sequence into one k-mer per residue, centred on that residue.
///
/// The sequence is padded with `(k - 1) / 2` pad symbols on each side, so the
/// result always has exactly one entry per residue:
/// `padded_kmers("ACD", 3, '-')` yields `["-AC", "ACD", "CD-"]`.
pub fn padded_kmers(sequence: &str, k: usize, pad: char) -> Vec<String> {
    let flank = k.saturating_sub(1) / 2;
    let residues: Vec<char> = sequence.chars().collect();

    let mut padded = Vec::with_capacity(residues.len() + 2 * flank);
    padded.extend(std::iter::repeat(pad).take(flank));
    padded.extend(residues.iter().copied());
    padded.extend(std::iter::repeat(pad).take(k.saturating_sub(1) - flank));

    (0..residues.len())
        .map(|i| padded[i..i + k.max(1)].iter().collect())
        .collect()
}

/// Prepare tokenizer input for a ProtBert-style model.
///
/// Residues are upper-cased, rare amino acids (U, Z, O, B) become X, and
/// residues are separated by single spaces so each maps to one token.
pub fn prepare_protbert_text(sequence: &str) -> String {
    let mut out = String::with_capacity(sequence.len() * 2);
    for c in sequence.chars().map(|c| c.to_ascii_uppercase()) {
        if !out.is_empty() {
            out.push(' ');
        }
        if config::protbert::RARE_RESIDUES.contains(&c) {
            out.push(config::protbert::UNKNOWN_RESIDUE);
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_kmers_one_per_residue() {
        assert_eq!(padded_kmers("ACD", 3, '-'), vec!["-AC", "ACD", "CD-"]);
        assert_eq!(padded_kmers("A", 3, '-'), vec!["-A-"]);
        assert!(padded_kmers("", 3, '-').is_empty());
    }

    #[test]
    fn test_padded_kmers_other_sizes() {
        assert_eq!(padded_kmers("ACDE", 5, '*'), vec!["**ACD", "*ACDE", "ACDE*", "CDE**"]);
        assert_eq!(padded_kmers("AC", 1, '-'), vec!["A", "C"]);
        // Even k puts the extra pad on the right.
        assert_eq!(padded_kmers("AC", 2, '-'), vec!["AC", "C-"]);
    }

    #[test]
    fn test_prepare_protbert_text() {
        assert_eq!(prepare_protbert_text("MKTAYIAK"), "M K T A Y I A K");
        assert_eq!(prepare_protbert_text("auzob"), "A X X X X");
        assert_eq!(prepare_protbert_text(""), "");
    }
}
