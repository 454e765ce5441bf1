//! Answer validation for word-ordering tasks.

/// Compare a submitted word sequence with the canonical one.
///
/// Exact, position-sensitive equality: lengths must match and every element
/// must be the identical string. No trimming, no case folding, no partial
/// credit.
pub fn is_correct_answer<S, T>(submitted: &[S], canonical: &[T]) -> bool
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    submitted.len() == canonical.len()
        && submitted
            .iter()
            .zip(canonical)
            .all(|(given, expected)| given.as_ref() == expected.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split(' ').map(str::to_string).collect()
    }

    #[test]
    fn exact_copy_is_correct() {
        let canonical = words("I have a cat");
        assert!(is_correct_answer(&canonical.clone(), &canonical));
    }

    #[test]
    fn any_positional_mismatch_is_incorrect() {
        let canonical = words("I have a cat");
        for i in 0..canonical.len() {
            let mut submitted = canonical.clone();
            submitted[i] = format!("{}x", submitted[i]);
            assert!(!is_correct_answer(&submitted, &canonical), "mismatch at {i}");
        }
    }

    #[test]
    fn swapped_words_are_incorrect() {
        assert!(!is_correct_answer(&words("have I a cat"), &words("I have a cat")));
    }

    #[test]
    fn length_difference_is_incorrect() {
        let canonical = words("I have a cat");
        assert!(!is_correct_answer(&words("I have a"), &canonical));
        assert!(!is_correct_answer(&words("I have a cat too"), &canonical));
    }

    #[test]
    fn no_case_folding_or_trimming() {
        let canonical = words("I have a cat");
        assert!(!is_correct_answer(&words("i have a cat"), &canonical));
        assert!(!is_correct_answer(&["I", "have", "a", "cat "], &canonical));
    }

    #[test]
    fn empty_sequences_compare_equal() {
        let empty: [&str; 0] = [];
        assert!(is_correct_answer(&empty, &empty));
    }
}
