use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-letter verdict for one guess compared against the secret word.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuessStatus {
    /// The letter does not occur anywhere in the secret word.
    Incorrect,
    /// The letter occurs in the secret word, but not at this position.
    CorrectLetter,
    /// The letter matches the secret word at this position.
    CorrectLetterPosition,
}

impl fmt::Display for GuessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Incorrect => '.',
            Self::CorrectLetter => '+',
            Self::CorrectLetterPosition => '*',
        };
        write!(f, "{repr}")
    }
}

/// Compares a guess against the secret word, yielding one status per
/// character position.
///
/// Two passes over the words: exact positional matches first, then any
/// remaining guess letter that occurs anywhere in the secret is marked
/// as a correct letter in the wrong position. Occurrences are not
/// consumed, so a guess letter repeated more often than the secret
/// contains it is still marked at every non-matching position. Kept
/// deliberately compatible with the historical scoring.
///
/// Both words must have the same number of characters; comparison is
/// byte-exact per character, with no case folding.
#[must_use]
pub fn evaluate(secret: &str, guess: &str) -> Vec<GuessStatus> {
    let secret: Vec<char> = secret.chars().collect();
    let guess: Vec<char> = guess.chars().collect();
    debug_assert_eq!(secret.len(), guess.len());

    let mut statuses = vec![GuessStatus::Incorrect; secret.len()];
    for (status, (s, g)) in statuses.iter_mut().zip(secret.iter().zip(&guess)) {
        if s == g {
            *status = GuessStatus::CorrectLetterPosition;
        }
    }
    for (status, (s, g)) in statuses.iter_mut().zip(secret.iter().zip(&guess)) {
        if s != g && secret.contains(g) {
            *status = GuessStatus::CorrectLetter;
        }
    }
    statuses
}

/// Whether an evaluation means the guess was the secret word.
#[must_use]
pub fn is_winning(statuses: &[GuessStatus]) -> bool {
    statuses
        .iter()
        .all(|status| *status == GuessStatus::CorrectLetterPosition)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use GuessStatus::{CorrectLetter, CorrectLetterPosition, Incorrect};

    // === Scenarios ===

    #[test]
    fn test_exact_match_is_all_correct_positions() {
        assert_eq!(
            evaluate("hello", "hello"),
            vec![CorrectLetterPosition; 5]
        );
    }

    #[test]
    fn test_disjoint_words_are_all_incorrect() {
        assert_eq!(evaluate("abcde", "fghij"), vec![Incorrect; 5]);
    }

    #[test]
    fn test_mixed_statuses() {
        assert_eq!(
            evaluate("hello", "holly"),
            vec![
                CorrectLetterPosition,
                CorrectLetter,
                CorrectLetterPosition,
                CorrectLetterPosition,
                Incorrect,
            ]
        );
    }

    #[test]
    fn test_second_pass_does_not_consume_positional_matches() {
        // APPLE has one A, already matched at position 0, yet the A at
        // position 2 of ABASE is still marked as a correct letter. The
        // historical scoring never consumed occurrences and clients
        // depend on it, so it stays.
        assert_eq!(
            evaluate("APPLE", "ABASE"),
            vec![
                CorrectLetterPosition,
                Incorrect,
                CorrectLetter,
                Incorrect,
                CorrectLetterPosition,
            ]
        );
    }

    #[test]
    fn test_repeated_guess_letters_all_marked() {
        assert_eq!(
            evaluate("abcde", "aabbb"),
            vec![
                CorrectLetterPosition,
                CorrectLetter,
                CorrectLetter,
                CorrectLetter,
                CorrectLetter,
            ]
        );
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        assert_eq!(evaluate("hello", "HELLO"), vec![Incorrect; 5]);
    }

    #[test]
    fn test_empty_words() {
        assert!(evaluate("", "").is_empty());
    }

    #[test]
    fn test_is_winning() {
        assert!(is_winning(&[CorrectLetterPosition; 5]));
        assert!(!is_winning(&[
            CorrectLetterPosition,
            CorrectLetter,
            CorrectLetterPosition,
            CorrectLetterPosition,
            CorrectLetterPosition,
        ]));
        assert!(!is_winning(&[Incorrect; 5]));
    }

    // === Wire format ===

    #[test]
    fn test_statuses_serialize_as_screaming_snake_case() {
        assert_eq!(serde_json::to_value(Incorrect).unwrap(), json!("INCORRECT"));
        assert_eq!(
            serde_json::to_value(CorrectLetter).unwrap(),
            json!("CORRECT_LETTER")
        );
        assert_eq!(
            serde_json::to_value(CorrectLetterPosition).unwrap(),
            json!("CORRECT_LETTER_POSITION")
        );
    }

    // === Properties ===

    fn letters(len: usize) -> impl Strategy<Value = String> {
        // A narrow alphabet so repeated and shared letters are common.
        proptest::collection::vec(proptest::char::range('a', 'f'), len)
            .prop_map(|chars| chars.into_iter().collect())
    }

    fn word_pair() -> impl Strategy<Value = (String, String)> {
        (1usize..=8).prop_flat_map(|len| (letters(len), letters(len)))
    }

    proptest! {
        #[test]
        fn property_guessing_the_secret_always_wins(word in "[a-z]{1,12}") {
            prop_assert!(is_winning(&evaluate(&word, &word)));
        }

        #[test]
        fn property_one_status_per_character((secret, guess) in word_pair()) {
            prop_assert_eq!(
                evaluate(&secret, &guess).len(),
                secret.chars().count()
            );
        }

        #[test]
        fn property_correct_position_iff_characters_equal(
            (secret, guess) in word_pair()
        ) {
            let statuses = evaluate(&secret, &guess);
            let secret: Vec<char> = secret.chars().collect();
            let guess: Vec<char> = guess.chars().collect();
            for (i, status) in statuses.iter().enumerate() {
                prop_assert_eq!(
                    *status == GuessStatus::CorrectLetterPosition,
                    secret[i] == guess[i]
                );
            }
        }

        #[test]
        fn property_incorrect_iff_letter_absent((secret, guess) in word_pair()) {
            let statuses = evaluate(&secret, &guess);
            let secret_chars: Vec<char> = secret.chars().collect();
            let guess_chars: Vec<char> = guess.chars().collect();
            for (i, status) in statuses.iter().enumerate() {
                let absent = !secret_chars.contains(&guess_chars[i]);
                let mismatched = secret_chars[i] != guess_chars[i];
                prop_assert_eq!(
                    *status == GuessStatus::Incorrect,
                    absent && mismatched
                );
            }
        }

        #[test]
        fn property_evaluation_is_deterministic((secret, guess) in word_pair()) {
            prop_assert_eq!(evaluate(&secret, &guess), evaluate(&secret, &guess));
        }
    }
}
