//! Locale-aware, case-insensitive ordering of report labels.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::billing::ReportLine;

/// Folds a label for comparison: lowercase NFD with combining marks removed.
///
/// `Ángela`, `A\u{301}ngela`, `angela`, and `ANGELA` share the same key.
#[must_use]
pub fn collation_key(label: &str) -> String {
    label
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(fold_stroke)
        .collect()
}

// Letters with a stroke or slash have no canonical decomposition.
fn fold_stroke(c: char) -> char {
    match c {
        'ø' => 'o',
        'ł' => 'l',
        'đ' | 'ð' => 'd',
        'ħ' => 'h',
        'ı' => 'i',
        other => other,
    }
}

/// Compares two labels ignoring case and accents.
///
/// Labels equal under folding fall back to a plain comparison so the order
/// is total.
#[must_use]
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Orders report lines by plan label, then student label.
#[must_use]
pub fn compare_lines(a: &ReportLine, b: &ReportLine) -> Ordering {
    compare_labels(&a.plan, &b.plan).then_with(|| compare_labels(&a.student, &b.student))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        assert_eq!(collation_key("Beatriz"), collation_key("beatriz"));
        assert_eq!(compare_labels("beatriz", "Carlos"), Ordering::Less);
        assert_eq!(compare_labels("Zoe", "adrian"), Ordering::Greater);
    }

    #[test]
    fn test_accents_fold_to_base_letter() {
        assert_eq!(collation_key("Ángela Núñez"), "angela nunez");
        assert_eq!(compare_labels("Óscar", "Pablo"), Ordering::Less);
        assert_eq!(compare_labels("Élodie", "Fabian"), Ordering::Less);
    }

    #[test]
    fn test_decomposed_accents_fold_like_precomposed() {
        assert_eq!(collation_key("A\u{301}na"), collation_key("\u{c1}na"));
        assert_eq!(compare_labels("A\u{301}na", "Anb"), Ordering::Less);
        assert_eq!(compare_labels("\u{c1}na", "Anb"), Ordering::Less);
    }

    #[test]
    fn test_letters_beyond_western_latin() {
        assert_eq!(compare_labels("Štěpán", "Svetla"), Ordering::Less);
        assert_eq!(collation_key("Łukasz"), "lukasz");
        assert_eq!(collation_key("Søren"), "soren");
        assert_eq!(compare_labels("Ødegaard", "Pérez"), Ordering::Less);
    }

    #[test]
    fn test_equal_keys_are_still_ordered() {
        assert_ne!(compare_labels("ana", "Ana"), Ordering::Equal);
        assert_eq!(compare_labels("Ana", "Ana"), Ordering::Equal);
    }
}
