//! Identifier canonicalization.
//!
//! Dependency tables frequently abbreviate K-8 identifiers by dropping the
//! cluster segment (`4.NF.3` instead of `4.NF.B.3`). The canonical form is
//! rebuilt by looking the remaining components up in a [`ReferenceIndex`].
//! High school identifiers are never abbreviated; only their `HS.<category>`
//! prefix is folded into one segment.

use crate::diagnostics::Diagnostic;
use crate::model::{ELEMENTARY_GRADES, HIGH_SCHOOL};
use crate::reference::{ReferenceIndex, ReferenceKey};

/// Recognized shapes of a raw identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdShape {
    /// `HS.A.SSE.1`: high school marker followed by a category letter.
    HighSchool { category: char },
    /// `4.NF.3.a`: grade, domain, standard, substandard.
    ShortSubstandard(ReferenceKey),
    /// `4.NF.3`: grade, domain, standard.
    ShortStandard(ReferenceKey),
    /// K-8 identifier that already carries its cluster.
    FullElementary,
    /// Numeric grade outside K-8; can never be resolved.
    UnknownGrade,
    Other,
}

/// Rewrite the `0.` kindergarten alias to `K.`.
pub fn normalize_grade_alias(raw_id: &str) -> String {
    match raw_id.strip_prefix("0.") {
        Some(rest) => format!("K.{rest}"),
        None => raw_id.to_string(),
    }
}

/// Classify an identifier whose grade alias has already been normalized.
pub fn detect_shape(id: &str) -> IdShape {
    let parts: Vec<&str> = id.split('.').collect();

    if parts.len() > 1 && parts[0] == HIGH_SCHOOL {
        let mut chars = parts[1].chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && c.is_ascii_uppercase()
        {
            return IdShape::HighSchool { category: c };
        }
    }

    if ELEMENTARY_GRADES.contains(&parts[0]) {
        return match parts.as_slice() {
            [grade, domain, standard, sub] if is_substandard_letter(sub) => {
                IdShape::ShortSubstandard(ReferenceKey::new(*grade, *domain, *standard, Some(*sub)))
            }
            [grade, domain, standard] if is_counter(standard) => {
                IdShape::ShortStandard(ReferenceKey::new(*grade, *domain, *standard, None))
            }
            _ => IdShape::FullElementary,
        };
    }

    if parts.len() > 1 && is_counter(parts[0]) {
        return IdShape::UnknownGrade;
    }

    IdShape::Other
}

/// Return the canonical form of `raw_id`.
///
/// Never fails: an abbreviated identifier that cannot be resolved is
/// returned as-is (after the `0.` → `K.` rewrite) and an
/// [`Diagnostic::UnresolvedIdentifier`] is pushed onto `diagnostics`.
pub fn canonicalize(
    raw_id: &str,
    index: &ReferenceIndex,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let id = normalize_grade_alias(raw_id);

    match detect_shape(&id) {
        IdShape::HighSchool { category } => {
            let rest: Vec<&str> = id.split('.').skip(2).collect();
            let mut merged = format!("{HIGH_SCHOOL}{category}");
            for part in rest {
                merged.push('.');
                merged.push_str(part);
            }
            merged
        }
        IdShape::ShortSubstandard(key) | IdShape::ShortStandard(key) => match index.get(&key) {
            Some(record) => {
                let parts = [
                    Some(key.grade.as_str()),
                    Some(key.domain.as_str()),
                    record.cluster_code.as_deref(),
                    Some(key.standard.as_str()),
                    key.substandard.as_deref(),
                ];
                parts
                    .into_iter()
                    .flatten()
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>()
                    .join(".")
            }
            None => {
                tracing::warn!("could not find a match for short ID '{}'", id);
                diagnostics.push(Diagnostic::UnresolvedIdentifier { id: id.clone() });
                id
            }
        },
        IdShape::UnknownGrade => {
            tracing::warn!("grade of '{}' is outside K-8 and not high school", id);
            diagnostics.push(Diagnostic::UnresolvedIdentifier { id: id.clone() });
            id
        }
        IdShape::FullElementary | IdShape::Other => id,
    }
}

fn is_substandard_letter(segment: &str) -> bool {
    segment.len() == 1 && segment.bytes().all(|b| b.is_ascii_lowercase())
}

fn is_counter(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
