// WHY: dictionary-based noun lemmatization without POS tagging
// Follows WordNet morphy noun detachment: a suffix rule only counts when its output is a
// known noun lemma, so unknown words pass through untouched and every output is a fixed point

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Known noun base forms, embedded at build time
const NOUN_LEMMAS: &str = include_str!("noun_lemmas.txt");

/// Irregular plural nouns and their dictionary base form
pub const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("men", "man"), ("women", "woman"), ("children", "child"), ("feet", "foot"),
    ("teeth", "tooth"), ("geese", "goose"), ("mice", "mouse"), ("lice", "louse"),
    ("oxen", "ox"), ("dice", "die"), ("data", "datum"), ("media", "medium"),
    ("criteria", "criterion"), ("phenomena", "phenomenon"), ("bacteria", "bacterium"),
    ("curricula", "curriculum"), ("memoranda", "memorandum"), ("analyses", "analysis"),
    ("crises", "crisis"), ("theses", "thesis"), ("hypotheses", "hypothesis"),
    ("diagnoses", "diagnosis"), ("bases", "basis"), ("axes", "axis"),
    ("indices", "index"), ("appendices", "appendix"), ("matrices", "matrix"),
    ("vertices", "vertex"), ("alumni", "alumnus"), ("stimuli", "stimulus"),
    ("cacti", "cactus"), ("fungi", "fungus"), ("nuclei", "nucleus"), ("radii", "radius"),
    ("wolves", "wolf"), ("knives", "knife"), ("lives", "life"), ("wives", "wife"),
    ("leaves", "leaf"), ("halves", "half"), ("shelves", "shelf"), ("thieves", "thief"),
    ("selves", "self"), ("calves", "calf"), ("loaves", "loaf"), ("elves", "elf"),
    ("scarves", "scarf"), ("hooves", "hoof"), ("wharves", "wharf"), ("dwarves", "dwarf"),
    ("housewives", "housewife"), ("midwives", "midwife"), ("potatoes", "potato"),
    ("tomatoes", "tomato"), ("heroes", "hero"), ("echoes", "echo"), ("vetoes", "veto"),
    ("torpedoes", "torpedo"), ("embargoes", "embargo"), ("quizzes", "quiz"),
];

/// Morphy noun detachment rules, tried in order
const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Noun lemmatizer with noun as the assumed part of speech
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<&'static str, &'static str>,
    lemmas: HashSet<&'static str>,
}

impl Lemmatizer {
    pub fn new() -> Self {
        let exceptions: HashMap<_, _> = NOUN_EXCEPTIONS.iter().copied().collect();
        let lemmas = NOUN_LEMMAS
            .lines()
            .filter(|line| !line.starts_with('#'))
            .flat_map(str::split_whitespace)
            .chain(exceptions.values().copied())
            .collect();
        Self { exceptions, lemmas }
    }

    /// Whether `word` is a known noun base form
    pub fn is_lemma(&self, word: &str) -> bool {
        self.lemmas.contains(word)
    }

    /// Reduce a lowercase token to its noun base form
    ///
    /// Irregular forms win, then a token that already is a lemma, then the first
    /// detachment rule whose output is a lemma. A rule output that is itself an
    /// irregular plural ("womens" -> "women") resolves through the exception table.
    /// Anything else is returned unchanged.
    pub fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        if let Some(&lemma) = self.exceptions.get(token) {
            return Cow::Borrowed(lemma);
        }
        if self.lemmas.contains(token) {
            return Cow::Borrowed(token);
        }
        for &(suffix, replacement) in NOUN_RULES {
            let Some(stem) = token.strip_suffix(suffix) else {
                continue;
            };
            let candidate = format!("{stem}{replacement}");
            if let Some(&lemma) = self.exceptions.get(candidate.as_str()) {
                return Cow::Borrowed(lemma);
            }
            if self.lemmas.contains(candidate.as_str()) {
                return Cow::Owned(candidate);
            }
        }
        Cow::Borrowed(token)
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}
