//! Domain types shared by the ingest engine and its collaborators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CommonError, Result};

/// PubChem compound identifier (CID). Always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct CompoundId(u64);

impl CompoundId {
    /// Create a compound id, rejecting zero and negative values
    pub fn new(value: i64) -> Result<Self> {
        if value <= 0 {
            return Err(CommonError::InvalidCompoundId(value));
        }
        Ok(Self(value as u64))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for CompoundId {
    type Error = CommonError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<CompoundId> for u64 {
    fn from(id: CompoundId) -> Self {
        id.0
    }
}

impl FromStr for CompoundId {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| CommonError::ParseCompoundId(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for CompoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized compound record, the unit handed to persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCompound {
    pub id: CompoundId,
    pub title: String,
    pub molecular_formula: Option<String>,
    pub molecular_weight: Option<f64>,
    pub iupac_name: Option<String>,
    pub inchi: Option<String>,
    pub inchi_key: Option<String>,
    pub canonical_smiles: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    pub imported_at: DateTime<Utc>,
}

impl ParsedCompound {
    /// Minimal record with only the id and title set
    pub fn new(id: CompoundId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            molecular_formula: None,
            molecular_weight: None,
            iupac_name: None,
            inchi: None,
            inchi_key: None,
            canonical_smiles: None,
            synonyms: Vec::new(),
            imported_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compound_id_rejects_non_positive() {
        assert!(matches!(
            CompoundId::new(0),
            Err(CommonError::InvalidCompoundId(0))
        ));
        assert!(CompoundId::new(-7).is_err());
        assert_eq!(CompoundId::new(1).unwrap().get(), 1);
    }

    #[test]
    fn test_compound_id_from_str() {
        assert_eq!("2244".parse::<CompoundId>().unwrap().get(), 2244);
        assert_eq!(" 42 ".parse::<CompoundId>().unwrap().get(), 42);
        assert!(matches!(
            "aspirin".parse::<CompoundId>(),
            Err(CommonError::ParseCompoundId(_))
        ));
        assert!("0".parse::<CompoundId>().is_err());
    }

    #[test]
    fn test_compound_id_serde_rejects_zero() {
        let id: CompoundId = serde_json::from_str("2244").unwrap();
        assert_eq!(id.get(), 2244);
        assert_eq!(serde_json::to_string(&id).unwrap(), "2244");
        assert!(serde_json::from_str::<CompoundId>("0").is_err());
    }

    #[test]
    fn test_parsed_compound_defaults() {
        let compound = ParsedCompound::new(CompoundId::new(5).unwrap(), "Example");
        assert_eq!(compound.title, "Example");
        assert!(compound.synonyms.is_empty());
        assert!(compound.molecular_formula.is_none());
    }

    proptest! {
        #[test]
        fn prop_compound_id_accepts_only_positive(value in any::<i64>()) {
            prop_assert_eq!(CompoundId::new(value).is_ok(), value >= 1);
        }
    }
}
