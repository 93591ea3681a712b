//! Whole-word keyword classification against the taxonomy.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, error};

use super::{Category, KeywordCategory, TAXONOMY};
use crate::record::Classification;

static STANDARD_CLASSIFIER: Lazy<KeywordClassifier> = Lazy::new(|| KeywordClassifier::new(TAXONOMY));

/// A keyword compiled to a case-insensitive, word-bounded matcher.
#[derive(Debug, Clone)]
struct KeywordMatcher {
    canonical: &'static str,
    regex: Regex,
}

/// Classifies text into keyword categories.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    matchers: HashMap<Category, Vec<KeywordMatcher>>,
}

impl KeywordClassifier {
    /// Compile a classifier over `taxonomy`.
    ///
    /// Keywords are escaped, so compilation only fails on pathological
    /// input; such keywords are logged and skipped.
    #[must_use]
    pub fn new(taxonomy: &[KeywordCategory]) -> Self {
        let mut matchers: HashMap<Category, Vec<KeywordMatcher>> = HashMap::new();
        for entry in taxonomy {
            let compiled = entry
                .keywords
                .iter()
                .filter_map(|&canonical| {
                    let pattern = format!(r"(?i)\b{}\b", regex::escape(canonical));
                    match Regex::new(&pattern) {
                        Ok(regex) => Some(KeywordMatcher { canonical, regex }),
                        Err(e) => {
                            error!("Skipping keyword {canonical}: {e}");
                            None
                        }
                    }
                })
                .collect::<Vec<_>>();
            matchers.entry(entry.category).or_default().extend(compiled);
        }
        Self { matchers }
    }

    /// The process-wide classifier over [`TAXONOMY`].
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD_CLASSIFIER
    }

    /// Keywords of `category` present in `text`.
    ///
    /// Results are distinct, in canonical casing, and ordered by first
    /// occurrence; at the same position the longer keyword comes first.
    #[must_use]
    pub fn classify(&self, text: &str, category: Category) -> Classification {
        let Some(matchers) = self.matchers.get(&category) else {
            return Classification::default();
        };

        let mut hits: Vec<(usize, usize, &'static str)> = matchers
            .iter()
            .enumerate()
            .filter_map(|(order, matcher)| {
                matcher
                    .regex
                    .find(text)
                    .map(|m| (m.start(), order, matcher.canonical))
            })
            .collect();

        hits.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.2.len().cmp(&a.2.len()))
                .then_with(|| a.1.cmp(&b.1))
        });

        let mut seen: Vec<&'static str> = Vec::with_capacity(hits.len());
        for (_, _, canonical) in hits {
            if !seen.contains(&canonical) {
                seen.push(canonical);
            }
        }

        if !seen.is_empty() {
            debug!("Category {} matched: {}", category.as_str(), seen.join(", "));
        }
        Classification::new(seen.into_iter().map(str::to_string).collect())
    }
}
