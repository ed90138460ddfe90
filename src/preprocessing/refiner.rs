//! Menu-line cleanup: strips allergy footnotes and qualifier words from raw
//! NEIS dish names so they work as display labels and search keys.

use regex::Regex;
use std::sync::LazyLock;

/// Qualifier words removed from dish names. Parenthesized forms come first so
/// the alternation consumes the brackets together with the word.
const MODIFIERS: &[&str] = &[
    "(산간)", "(채식)", "(페스코)", "(강조)", "(염도)",
    "친환경", "무농약", "수제", "오븐에구운", "오븐에", "구운",
    "우리밀", "유기농", "산간", "우리땅", "국산", "국내산",
    "GAP", "무항생제", "저당", "저나트륨", "수다날", "특", "오븐",
];

/// Residual "self-serve" marker that survives the bracket pass.
const SELF_SERVE: &str = "자율";

static FOOTNOTE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([0-9.]+\)").expect("footnote pattern"));

static CIRCLED_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{2460}-\x{2472}]").expect("circled digit pattern"));

static MODIFIER_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = MODIFIERS
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){alternation}")).expect("modifier pattern")
});

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*\[\]()<>/]").expect("punctuation pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

pub struct Refiner;

impl Refiner {
    /// Turn a raw menu line into its refined name.
    ///
    /// The result is a fixpoint: refining it again returns it unchanged. A
    /// non-blank line that would be stripped to nothing comes back
    /// whitespace-normalized instead of empty.
    pub fn refine(raw: &str) -> String {
        let fallback = Self::squash(raw);
        if fallback.is_empty() {
            return fallback;
        }

        // After the first pass only deletions can change the name, so this
        // terminates.
        let mut current = fallback.clone();
        loop {
            let next = Self::pass(&current);
            if next == current {
                break;
            }
            current = next;
        }

        if current.is_empty() {
            fallback
        } else {
            current
        }
    }

    fn pass(input: &str) -> String {
        let name = FOOTNOTE_GROUP.replace_all(input, "");
        let name = CIRCLED_DIGITS.replace_all(&name, "");
        let name = MODIFIER_WORDS.replace_all(&name, "");
        let name = PUNCTUATION.replace_all(&name, " ");
        let name = Self::squash(&name);
        Self::squash(&name.replace(SELF_SERVE, ""))
    }

    fn squash(input: &str) -> String {
        WHITESPACE.replace_all(input, " ").trim().to_string()
    }
}

/// Shorthand for [`Refiner::refine`].
pub fn refine(raw: &str) -> String {
    Refiner::refine(raw)
}
