use crate::analysis::stopwords::Stopwords;
use regex::Regex;
use std::{collections::HashMap, sync::LazyLock};

// Words keep internal apostrophes so contractions can be split afterwards.
// Single hyphens also stay inside a word (`state-of-the-art` is one token);
// any other run of non-space symbols, `--` included, is its own token.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+(?:[-']\w+)*|[^\w\s]+").expect("token pattern is valid")
});

const CLITICS: [&str; 6] = ["s", "m", "d", "ll", "re", "ve"];

// Fused forms split in two with no apostrophe involved.
const FUSED: [(&str, usize); 6] = [
    ("cannot", 3),
    ("gimme", 3),
    ("gonna", 3),
    ("gotta", 3),
    ("lemme", 3),
    ("wanna", 3),
];

/// Lowercased word tokens, with contractions split into stem and clitic
/// (`don't` becomes `do` + `n't`, `company's` becomes `company` + `'s`).
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens = Vec::new();

    for m in TOKEN_RE.find_iter(&lowered) {
        split_contraction(m.as_str(), &mut tokens);
    }

    tokens
}

fn split_contraction(token: &str, out: &mut Vec<String>) {
    if let Some(&(_, at)) = FUSED.iter().find(|(word, _)| *word == token) {
        out.push(token[..at].to_string());
        out.push(token[at..].to_string());
        return;
    }

    if let Some(stem) = token.strip_suffix("n't")
        && !stem.is_empty()
    {
        out.push(stem.to_string());
        out.push("n't".to_string());
        return;
    }

    if let Some((stem, clitic)) = token.rsplit_once('\'')
        && !stem.is_empty()
        && CLITICS.contains(&clitic)
    {
        out.push(stem.to_string());
        out.push(format!("'{clitic}"));
        return;
    }

    out.push(token.to_string());
}

/// Frequency-ranked keywords over a fixed stopword set.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stopwords: Stopwords,
    default_limit: usize,
}

impl KeywordExtractor {
    pub fn new(stopwords: Stopwords, default_limit: usize) -> Self {
        Self {
            stopwords,
            default_limit,
        }
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        self.extract_top(text, self.default_limit)
    }

    /// The `n` most frequent alphabetic non-stopword tokens, most frequent
    /// first. Equal counts keep the order in which the words first appeared.
    pub fn extract_top(&self, text: &str, n: usize) -> Vec<String> {
        if text.is_empty() || n == 0 {
            return Vec::new();
        }

        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for token in tokenize(text) {
            if !token.chars().all(char::is_alphabetic) || self.stopwords.contains(&token) {
                continue;
            }
            match slots.get(&token) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(token.clone(), counts.len());
                    counts.push((token, 1));
                }
            }
        }

        // stable: ties stay in first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.into_iter().take(n).map(|(word, _)| word).collect()
    }
}
