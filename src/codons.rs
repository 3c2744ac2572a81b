use serde::{Deserialize, Serialize};

/// Amino-acid residue, plus the translation stop signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Residue {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Stop,
}

/// Fixed physicochemical grouping, keyed per residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResidueProperty {
    Hydrophobic,
    Aromatic,
    Basic,
    Acidic,
    Polar,
    Stop,
}

impl Residue {
    /// Standard genetic code, all 64 RNA codons. Case-insensitive; DNA
    /// codons (with T) are not accepted, transcribe first.
    pub fn from_rna_codon(codon: [u8; 3]) -> Option<Self> {
        let codon = [
            codon[0].to_ascii_uppercase(),
            codon[1].to_ascii_uppercase(),
            codon[2].to_ascii_uppercase(),
        ];
        match &codon {
            b"UUU" | b"UUC" => Some(Self::Phe),
            b"UUA" | b"UUG" | b"CUU" | b"CUC" | b"CUA" | b"CUG" => Some(Self::Leu),
            b"AUU" | b"AUC" | b"AUA" => Some(Self::Ile),
            b"AUG" => Some(Self::Met),
            b"GUU" | b"GUC" | b"GUA" | b"GUG" => Some(Self::Val),
            b"UCU" | b"UCC" | b"UCA" | b"UCG" | b"AGU" | b"AGC" => Some(Self::Ser),
            b"CCU" | b"CCC" | b"CCA" | b"CCG" => Some(Self::Pro),
            b"ACU" | b"ACC" | b"ACA" | b"ACG" => Some(Self::Thr),
            b"GCU" | b"GCC" | b"GCA" | b"GCG" => Some(Self::Ala),
            b"UAU" | b"UAC" => Some(Self::Tyr),
            b"UAA" | b"UAG" | b"UGA" => Some(Self::Stop),
            b"CAU" | b"CAC" => Some(Self::His),
            b"CAA" | b"CAG" => Some(Self::Gln),
            b"AAU" | b"AAC" => Some(Self::Asn),
            b"AAA" | b"AAG" => Some(Self::Lys),
            b"GAU" | b"GAC" => Some(Self::Asp),
            b"GAA" | b"GAG" => Some(Self::Glu),
            b"UGU" | b"UGC" => Some(Self::Cys),
            b"UGG" => Some(Self::Trp),
            b"CGU" | b"CGC" | b"CGA" | b"CGG" | b"AGA" | b"AGG" => Some(Self::Arg),
            b"GGU" | b"GGC" | b"GGA" | b"GGG" => Some(Self::Gly),
            _ => None,
        }
    }

    /// Partial codons (fewer than three bases) translate to `None`.
    pub fn from_rna_str(codon: &str) -> Option<Self> {
        let bytes: [u8; 3] = codon.as_bytes().try_into().ok()?;
        Self::from_rna_codon(bytes)
    }

    pub fn three_letter(self) -> &'static str {
        match self {
            Self::Ala => "Ala",
            Self::Arg => "Arg",
            Self::Asn => "Asn",
            Self::Asp => "Asp",
            Self::Cys => "Cys",
            Self::Gln => "Gln",
            Self::Glu => "Glu",
            Self::Gly => "Gly",
            Self::His => "His",
            Self::Ile => "Ile",
            Self::Leu => "Leu",
            Self::Lys => "Lys",
            Self::Met => "Met",
            Self::Phe => "Phe",
            Self::Pro => "Pro",
            Self::Ser => "Ser",
            Self::Thr => "Thr",
            Self::Trp => "Trp",
            Self::Tyr => "Tyr",
            Self::Val => "Val",
            Self::Stop => "STOP",
        }
    }

    pub fn property(self) -> ResidueProperty {
        match self {
            Self::Ala | Self::Val | Self::Leu | Self::Ile | Self::Met | Self::Pro | Self::Gly => {
                ResidueProperty::Hydrophobic
            }
            Self::Phe | Self::Tyr | Self::Trp => ResidueProperty::Aromatic,
            Self::Lys | Self::Arg | Self::His => ResidueProperty::Basic,
            Self::Asp | Self::Glu => ResidueProperty::Acidic,
            Self::Ser | Self::Thr | Self::Cys | Self::Asn | Self::Gln => ResidueProperty::Polar,
            Self::Stop => ResidueProperty::Stop,
        }
    }
}

/// Transcription: every T becomes U, case-insensitively; other symbols
/// (including gap dashes) pass through untouched.
pub fn dna_to_rna(sequence: &str) -> String {
    sequence
        .chars()
        .map(|c| if c == 'T' || c == 't' { 'U' } else { c })
        .collect()
}

/// Splits into codon-sized chunks; the final chunk may be shorter.
pub fn split_codons(sequence: &str) -> Vec<String> {
    sequence
        .as_bytes()
        .chunks(3)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

/// Translates an RNA sequence into one residue per codon. Partial or
/// unrecognized codons yield `None`.
pub fn translate(rna: &str) -> Vec<Option<Residue>> {
    split_codons(rna)
        .iter()
        .map(|codon| Residue::from_rna_str(codon))
        .collect()
}
