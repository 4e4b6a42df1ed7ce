//! Data model for standards reference data and relationship documents.

use serde::{Deserialize, Deserializer, Serialize};

/// Grade code shared by every advanced-level (high school) standard.
pub const HIGH_SCHOOL: &str = "HS";

/// Grade codes of the elementary tier, in order.
pub const ELEMENTARY_GRADES: [&str; 9] = ["K", "1", "2", "3", "4", "5", "6", "7", "8"];

/// One row of a standards dataset (`{"standards": [...]}`).
///
/// Counters are carried as strings; files produced by older exports sometimes
/// hold them as JSON numbers, which are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    #[serde(deserialize_with = "text")]
    pub grade_level_code: String,
    /// Advanced-level category letter (`A`, `F`, ...). Absent for K-8 rows.
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_code: Option<String>,
    #[serde(deserialize_with = "text")]
    pub domain_code: String,
    /// A few standards sit directly under their domain with no cluster.
    #[serde(default, deserialize_with = "optional_text")]
    pub cluster_code: Option<String>,
    #[serde(deserialize_with = "text")]
    pub standard_counter: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub substandard_counter: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
}

impl ReferenceRecord {
    pub fn is_high_school(&self) -> bool {
        self.grade_level_code == HIGH_SCHOOL
    }
}

/// One sanitized relationship, as written to the dependencies document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub source: String,
    pub target: String,
    /// Sanitized label. Older documents may omit it; readers treat that as
    /// a dependency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

/// `{"dependencies": [...]}`: the sanitized relationship document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDocument {
    #[serde(default)]
    pub dependencies: Vec<RelationshipEdge>,
}

#[derive(Deserialize)]
#[serde(untagged, expecting = "a string or a number")]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(Scalar::into_text)
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_text)
        .filter(|s| !s.is_empty()))
}
