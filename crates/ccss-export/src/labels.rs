//! Display labels: node groups and link types.

use ccss_core::model::ReferenceRecord;
use ccss_core::relationship::DEPENDENCY;

/// Group shared by every K-8 node.
pub const ELEMENTARY_GROUP: &str = "K-8";

/// Group for a high school node whose category is missing or unknown.
pub const HIGH_SCHOOL_GROUP: &str = "High School";

/// High school conceptual categories.
const CATEGORY_NAMES: [(&str, &str); 5] = [
    ("N", "Number & Quantity"),
    ("A", "Algebra"),
    ("F", "Functions"),
    ("G", "Geometry"),
    ("S", "Statistics & Probability"),
];

pub fn category_name(code: &str) -> Option<&'static str> {
    CATEGORY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Display group used to color a node.
pub fn group_label(record: &ReferenceRecord) -> String {
    if !record.is_high_school() {
        return ELEMENTARY_GROUP.to_string();
    }
    record
        .category_code
        .as_deref()
        .and_then(category_name)
        .unwrap_or(HIGH_SCHOOL_GROUP)
        .to_string()
}

/// `dependency` → `Dependency`, `conceptual_connection` → `Conceptual Connection`.
/// A missing label counts as a dependency.
pub fn link_type(relationship: Option<&str>) -> String {
    title_case(&relationship.unwrap_or(DEPENDENCY).replace('_', " "))
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
