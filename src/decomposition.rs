//! Defensive combining-mark stripping (spec §4.1 note).
//!
//! Repurposed from the teacher's `decomposition.rs`. The Character
//! Folder (`fold.rs`) handles precomposed Vietnamese characters through
//! its explicit table and never decomposes anything. This module is a
//! second, optional pass for input that arrives already decomposed
//! (combining marks following a bare base letter) rather than
//! precomposed — it strips those stray marks so `fold::fold_str` sees
//! plain ASCII it can pass through untouched. It is not used to fold
//! precomposed characters; `Đ`/`đ` in particular carry no combining
//! mark at all and are unaffected by it.

use std::borrow::Cow;
use unicode_normalization::char::canonical_combining_class;

#[inline]
pub fn is_combining(c: char) -> bool {
    canonical_combining_class(c) > 0
}

/// Removes any trailing combining marks, leaving base letters as-is.
pub fn strip_combining_marks(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_combining) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| !is_combining(*c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_decomposed_marks() {
        // "a" + combining acute (U+0301), decomposed form of 'á'.
        let decomposed = "a\u{0301}";
        assert_eq!(strip_combining_marks(decomposed), "a");
    }

    #[test]
    fn leaves_precomposed_forms_untouched() {
        assert_eq!(strip_combining_marks("Đà Nẵng"), "Đà Nẵng");
    }

    #[test]
    fn borrows_when_nothing_to_strip() {
        assert!(matches!(
            strip_combining_marks("plain text"),
            Cow::Borrowed(_)
        ));
    }
}
