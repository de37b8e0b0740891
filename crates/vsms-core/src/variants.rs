//! Message variants.
//!
//! A hash is submitted for every rendering a device might receive: the
//! authored text, then its whitespace-trimmed form when that differs.

/// Expand `original` into the ordered, duplicate-free list of candidate
/// renderings. Never empty; element 0 is always `original` verbatim.
pub fn expand(original: &str) -> Vec<String> {
    let mut variants = vec![original.to_string()];

    let trimmed = original.trim();
    if trimmed != original {
        variants.push(trimmed.to_string());
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_message_has_one_variant() {
        assert_eq!(expand("hello!"), vec!["hello!"]);
    }

    #[test]
    fn test_padded_message_adds_trimmed() {
        assert_eq!(expand("  hello  "), vec!["  hello  ", "hello"]);
        assert_eq!(expand("hello\n"), vec!["hello\n", "hello"]);
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(expand(" \t"), vec![" \t", ""]);
        assert_eq!(expand(""), vec![""]);
    }

    #[test]
    fn test_unicode_whitespace() {
        assert_eq!(expand("\u{00A0}code 1234\u{3000}"), vec!["\u{00A0}code 1234\u{3000}", "code 1234"]);
    }

    proptest! {
        #[test]
        fn test_expand_invariants(msg in any::<String>()) {
            let variants = expand(&msg);
            prop_assert!(!variants.is_empty());
            prop_assert!(variants.len() <= 2);
            prop_assert_eq!(&variants[0], &msg);
            if msg.trim() == msg {
                prop_assert_eq!(variants.len(), 1);
            } else {
                prop_assert_ne!(&variants[0], &variants[1]);
            }
        }
    }
}
