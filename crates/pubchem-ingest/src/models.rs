//! PUG-View response model
//!
//! Only the parts of `/rest/pug_view/data/compound/{cid}/JSON` that the
//! normalizer reads. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Raw compound document as returned by PUG-View
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawCompound {
    pub record: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    #[serde(default)]
    pub record_type: Option<String>,
    #[serde(default)]
    pub record_number: Option<i64>,
    #[serde(default)]
    pub record_title: Option<String>,
    #[serde(default)]
    pub section: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Section {
    #[serde(rename = "TOCHeading")]
    pub toc_heading: String,
    #[serde(default)]
    pub section: Vec<Section>,
    #[serde(default)]
    pub information: Vec<Information>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Information {
    #[serde(default)]
    pub value: Option<InfoValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InfoValue {
    #[serde(default)]
    pub string_with_markup: Vec<StringWithMarkup>,
    #[serde(default)]
    pub number: Vec<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StringWithMarkup {
    pub string: String,
}

impl Record {
    /// Depth-first search for the first section with the given heading
    pub fn find_section(&self, heading: &str) -> Option<&Section> {
        self.section.iter().find_map(|s| s.find(heading))
    }
}

impl Section {
    fn find(&self, heading: &str) -> Option<&Section> {
        if self.toc_heading.eq_ignore_ascii_case(heading) {
            return Some(self);
        }
        self.section.iter().find_map(|s| s.find(heading))
    }

    /// All string values of this section, in document order
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.information
            .iter()
            .filter_map(|info| info.value.as_ref())
            .flat_map(|value| value.string_with_markup.iter())
            .map(|s| s.string.as_str())
    }

    pub fn first_string(&self) -> Option<&str> {
        self.strings().next()
    }

    /// First numeric value, falling back to a numeric string
    pub fn first_number(&self) -> Option<f64> {
        self.information
            .iter()
            .filter_map(|info| info.value.as_ref())
            .find_map(|value| value.number.first().copied())
            .or_else(|| self.strings().find_map(|s| s.trim().parse().ok()))
    }
}
