//! PUG-View record normalization

use chrono::Utc;
use pubchem_common::{CompoundId, ParsedCompound};

use crate::error::{IngestError, Result};
use crate::models::RawCompound;

/// Turns a raw PUG-View document into a [`ParsedCompound`]
pub trait Normalizer: Send + Sync {
    fn normalize(&self, raw: RawCompound) -> Result<ParsedCompound>;
}

const HEADING_IUPAC_NAME: &str = "IUPAC Name";
const HEADING_INCHI: &str = "InChI";
const HEADING_INCHI_KEY: &str = "InChIKey";
const HEADING_MOLECULAR_FORMULA: &str = "Molecular Formula";
const HEADING_MOLECULAR_WEIGHT: &str = "Molecular Weight";
const HEADING_SYNONYMS: &str = "Depositor-Supplied Synonyms";
// PubChem renamed "Canonical SMILES" to "SMILES" in 2025; accept both
const HEADINGS_SMILES: [&str; 2] = ["Canonical SMILES", "SMILES"];

/// Extracts identifiers and basic properties from the PUG-View section tree
#[derive(Debug, Clone)]
pub struct PugViewNormalizer {
    max_synonyms: usize,
}

impl Default for PugViewNormalizer {
    fn default() -> Self {
        Self { max_synonyms: 25 }
    }
}

impl PugViewNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_synonyms(mut self, max: usize) -> Self {
        self.max_synonyms = max;
        self
    }
}

impl Normalizer for PugViewNormalizer {
    fn normalize(&self, raw: RawCompound) -> Result<ParsedCompound> {
        let record = raw.record;

        let number = record
            .record_number
            .ok_or_else(|| IngestError::normalize("record has no RecordNumber"))?;
        let id = CompoundId::new(number)
            .map_err(|e| IngestError::normalize(format!("bad RecordNumber: {e}")))?;

        let text = |heading: &str| {
            record
                .find_section(heading)
                .and_then(|s| s.first_string())
                .map(str::to_string)
        };

        Ok(ParsedCompound {
            id,
            title: record
                .record_title
                .clone()
                .unwrap_or_else(|| format!("CID {id}")),
            molecular_formula: text(HEADING_MOLECULAR_FORMULA),
            molecular_weight: record
                .find_section(HEADING_MOLECULAR_WEIGHT)
                .and_then(|s| s.first_number()),
            iupac_name: text(HEADING_IUPAC_NAME),
            inchi: text(HEADING_INCHI),
            inchi_key: text(HEADING_INCHI_KEY),
            canonical_smiles: HEADINGS_SMILES.iter().find_map(|h| text(*h)),
            synonyms: record
                .find_section(HEADING_SYNONYMS)
                .map(|s| {
                    s.strings()
                        .take(self.max_synonyms)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            imported_at: Utc::now(),
        })
    }
}
