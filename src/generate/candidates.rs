//! Candidate label generator
//!
//! Emits short labels (no TLD) from a handful of pattern families, drops
//! excluded words, and ranks the survivors so the most interesting ones
//! come first.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::filter::{is_pronounceable, ExclusionList, CONSONANTS, DIGITS, LETTERS, VOWELS};

const TECH_PREFIXES: &[&str] = &[
    "lab", "net", "dev", "ops", "sys", "pod", "hub", "box", "bit", "hex",
];
const TECH_SUFFIXES: &[char] = &['x', 'z', 'k', 'r', 'n', 'm', 'y'];

/// Pattern families the generator can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Every pronounceable three-letter string (e.g. "jax", "qiv")
    ThreeLetter,
    /// Consonant-Vowel-Consonant-Vowel (e.g. "koda", "zuri")
    Cvcv,
    /// Vowel-Consonant-Vowel-Consonant (e.g. "avex", "irol")
    Vcvc,
    /// Variations on the seed letter and on "x" ("jek", "jra", "kax", "rex", "bxo", "oxn")
    SeedLetter,
    /// Tech prefix + one letter (e.g. "labx", "devz")
    TechAffix,
    /// Doubled letter at either end (e.g. "ooz", "kee")
    DoubleLetter,
    /// Consonant, vowel and digit in any of three orders (e.g. "ka7", "k7a", "7ka")
    DigitMix,
}

impl Family {
    pub const ALL: [Family; 7] = [
        Family::ThreeLetter,
        Family::Cvcv,
        Family::Vcvc,
        Family::SeedLetter,
        Family::TechAffix,
        Family::DoubleLetter,
        Family::DigitMix,
    ];
}

/// Generator settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Letter that marks a candidate as priority and seeds its own family
    pub seed_letter: char,
    /// Maximum number of ranked candidates
    pub limit: usize,
    pub families: Vec<Family>,
    pub exclusions: ExclusionList,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed_letter: 'j',
            limit: 5000,
            families: Family::ALL.to_vec(),
            exclusions: ExclusionList::builtin(),
        }
    }
}

/// Generated candidates split by rank, each half sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    pub priority: Vec<String>,
    pub regular: Vec<String>,
}

impl CandidateSet {
    pub fn total(&self) -> usize {
        self.priority.len() + self.regular.len()
    }

    /// Priority candidates first, then regular ones, truncated to `limit`
    pub fn ranked(&self, limit: usize) -> Vec<String> {
        self.priority
            .iter()
            .chain(self.regular.iter())
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Generator for short candidate labels
#[derive(Debug, Clone, Default)]
pub struct CandidateGenerator {
    config: GeneratorConfig,
}

impl CandidateGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate every family, de-duplicate and split by rank
    pub fn generate(&self) -> CandidateSet {
        let mut all = BTreeSet::new();
        for family in &self.config.families {
            let words = self.family(*family);
            tracing::debug!(family = ?family, count = words.len(), "Generated candidate family");
            all.extend(words);
        }

        let (priority, regular): (Vec<String>, Vec<String>) =
            all.into_iter().partition(|word| self.is_priority(word));

        tracing::info!(
            priority = priority.len(),
            regular = regular.len(),
            "Generated unique candidates"
        );

        CandidateSet { priority, regular }
    }

    /// Ranked candidates truncated to the configured limit
    pub fn ranked(&self) -> Vec<String> {
        self.generate().ranked(self.config.limit)
    }

    /// Contains the seed letter, is three letters long, or is a short name
    /// featuring or ending in "x"/"z".
    pub fn is_priority(&self, word: &str) -> bool {
        let len = word.chars().count();
        word.contains(self.config.seed_letter)
            || (word.contains('x') && len <= 4)
            || (word.ends_with(['x', 'z']) && len <= 4)
            || len == 3
    }

    /// Raw output of one family, exclusions applied
    pub fn family(&self, family: Family) -> Vec<String> {
        let excluded = &self.config.exclusions;
        let keep = |w: &String| !excluded.contains(w);

        match family {
            Family::ThreeLetter => product3(LETTERS, LETTERS, LETTERS)
                .filter(|w| keep(w) && is_pronounceable(w))
                .collect(),
            Family::Cvcv => product4(CONSONANTS, VOWELS, CONSONANTS, VOWELS)
                .filter(keep)
                .collect(),
            Family::Vcvc => product4(VOWELS, CONSONANTS, VOWELS, CONSONANTS)
                .filter(keep)
                .collect(),
            Family::SeedLetter => self.seed_letter_words().into_iter().filter(keep).collect(),
            Family::TechAffix => TECH_PREFIXES
                .iter()
                .flat_map(|p| TECH_SUFFIXES.iter().map(move |s| format!("{p}{s}")))
                .filter(keep)
                .collect(),
            Family::DoubleLetter => LETTERS
                .iter()
                .flat_map(|&l| {
                    LETTERS
                        .iter()
                        .flat_map(move |&c| [format!("{l}{l}{c}"), format!("{c}{l}{l}")])
                })
                .filter(|w| keep(w) && is_pronounceable(w))
                .collect(),
            Family::DigitMix => CONSONANTS
                .iter()
                .flat_map(|&c| {
                    VOWELS.iter().flat_map(move |&v| {
                        DIGITS
                            .iter()
                            .flat_map(move |&n| {
                                [
                                    format!("{c}{v}{n}"),
                                    format!("{c}{n}{v}"),
                                    format!("{n}{c}{v}"),
                                ]
                            })
                    })
                })
                .collect(),
        }
    }

    fn seed_letter_words(&self) -> Vec<String> {
        let s = self.config.seed_letter;
        let mut words = Vec::new();

        for &v in VOWELS {
            for &c in CONSONANTS {
                words.push(format!("{s}{v}{c}"));
                words.push(format!("{s}{c}{v}"));
                words.push(format!("{c}x{v}"));
                words.push(format!("{v}x{c}"));
            }
        }
        for &c in CONSONANTS {
            if c != s {
                words.push(format!("{c}ax"));
            }
            words.push(format!("{c}ex"));
        }

        words
    }
}

fn product3<'a>(a: &'a [char], b: &'a [char], c: &'a [char]) -> impl Iterator<Item = String> + 'a {
    a.iter().flat_map(move |&x| {
        b.iter()
            .flat_map(move |&y| c.iter().map(move |&z| [x, y, z].iter().collect()))
    })
}

fn product4<'a>(
    a: &'a [char],
    b: &'a [char],
    c: &'a [char],
    d: &'a [char],
) -> impl Iterator<Item = String> + 'a {
    a.iter().flat_map(move |&w| {
        b.iter().flat_map(move |&x| {
            c.iter()
                .flat_map(move |&y| d.iter().map(move |&z| [w, x, y, z].iter().collect()))
        })
    })
}

/// Reproducible random sample of `n` candidates, sorted for display
pub fn sample(candidates: &[String], n: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked: Vec<String> = candidates.choose_multiple(&mut rng, n).cloned().collect();
    picked.sort();
    picked
}
