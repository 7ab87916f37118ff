use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

use crate::rules::{ExtractionRules, MAX_PHRASE_CHARS};

/// Prefix length compared by the duplicate rule
const DEDUP_PREFIX_CHARS: usize = 10;

/// Phrases this short or shorter are noise
const MIN_PHRASE_CHARS: usize = 3;

static WORDS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

/// Line breaks end a sentence too: guided descriptions are one answer per line
static SENTENCE_TERMINATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?\n]").unwrap());

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("extraction rules must name at least one verb")]
    EmptyVocabulary,

    #[error("extraction rules must provide non-empty default task lists")]
    EmptyDefaults,

    #[error("failed to compile extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A short imperative phrase naming one process step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedTask {
    phrase: String,
}

impl ExtractedTask {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    #[must_use]
    pub fn into_phrase(self) -> String {
        self.phrase
    }

    /// Two phrases are duplicates when the first ten lowercase characters of
    /// either occur inside the other.
    #[must_use]
    pub fn is_similar_to(&self, other: &str) -> bool {
        let mine = self.phrase.to_lowercase();
        let theirs = other.to_lowercase();
        theirs.contains(&dedup_prefix(&mine)) || mine.contains(&dedup_prefix(&theirs))
    }
}

impl fmt::Display for ExtractedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase)
    }
}

impl AsRef<str> for ExtractedTask {
    fn as_ref(&self) -> &str {
        &self.phrase
    }
}

fn dedup_prefix(lower: &str) -> String {
    lower.chars().take(DEDUP_PREFIX_CHARS).collect()
}

fn alternation<'a>(words: impl IntoIterator<Item = &'a String>) -> String {
    words
        .into_iter()
        .map(|w| {
            w.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Trim punctuation stuck to a token so "payment)" still reads as "payment"
fn bare(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Capitalize the first letter and cut overlong phrases with an ellipsis
fn finish_phrase(phrase: &str) -> String {
    let mut chars = phrase.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    if capitalized.chars().count() > MAX_PHRASE_CHARS {
        let kept: String = capitalized.chars().take(MAX_PHRASE_CHARS - 3).collect();
        format!("{kept}...")
    } else {
        capitalized
    }
}

/// Ordered, de-duplicated task list under construction
struct TaskList {
    tasks: Vec<ExtractedTask>,
}

impl TaskList {
    fn push(&mut self, phrase: &str) {
        if phrase.chars().count() <= MIN_PHRASE_CHARS {
            return;
        }
        let phrase = finish_phrase(phrase);
        if self.tasks.iter().any(|t| t.is_similar_to(&phrase)) {
            return;
        }
        self.tasks.push(ExtractedTask { phrase });
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }
}

/// Deterministic text-to-task extractor.
///
/// Extraction runs in three graduated passes:
///
/// 1. fragment scan: split on punctuation and separator words, then capture
///    one verb phrase per fragment
/// 2. sentence regex, only when pass 1 found at most one task
/// 3. keyword default list, only when nothing was found
///
/// The result is capped at `rules.max_tasks` and is never empty.
#[derive(Debug, Clone)]
pub struct TaskExtractor {
    rules: ExtractionRules,
    fragment_splitter: Regex,
    sentence_patterns: Vec<Regex>,
    leading_filler: Regex,
}

impl TaskExtractor {
    /// Extractor with the built-in vocabulary
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile.
    pub fn new() -> Result<Self, ExtractionError> {
        Self::with_rules(ExtractionRules::default())
    }

    /// Extractor with a substituted vocabulary
    ///
    /// # Errors
    ///
    /// Returns `EmptyVocabulary` or `EmptyDefaults` for unusable tables (no
    /// verbs, or a generic or keyword default list with no tasks), or
    /// `Pattern` if a word list produces an invalid regex.
    pub fn with_rules(rules: ExtractionRules) -> Result<Self, ExtractionError> {
        let rules = rules.normalized();
        if rules.verbs.is_empty() {
            return Err(ExtractionError::EmptyVocabulary);
        }
        if rules.generic_default.is_empty()
            || rules.keyword_defaults.iter().any(|d| d.tasks.is_empty())
        {
            return Err(ExtractionError::EmptyDefaults);
        }

        let mut splitter = String::from(r"(?i)[,;.!?\n]");
        if !rules.separators.is_empty() {
            splitter.push_str(&format!(r"|\s+(?:{})\s+", alternation(&rules.separators)));
        }

        let verbs = alternation(&rules.verbs);
        let fillers = alternation(&rules.filler_prefixes);
        let lead_ins = alternation(&rules.lead_ins);
        let optional = |group: &str, repeat: &str| {
            if group.is_empty() {
                String::new()
            } else {
                format!(r"(?:(?:{group})\s+){repeat}")
            }
        };

        let sentence_patterns = vec![
            Regex::new(&format!(
                r"(?i)\b{}(?:{verbs})\s+[^,.]*",
                optional(&fillers, "{0,2}")
            ))?,
            Regex::new(&format!(
                r"(?i)\b{}(?:{verbs})\s+[^,.]*",
                optional(&lead_ins, "?")
            ))?,
        ];

        let strippable = alternation(rules.filler_prefixes.iter().chain(&rules.lead_ins));
        let leading_filler = if strippable.is_empty() {
            Regex::new(r"^$")?
        } else {
            Regex::new(&format!(r"(?i)^(?:(?:{strippable})\s+)+"))?
        };

        Ok(Self {
            fragment_splitter: Regex::new(&splitter)?,
            sentence_patterns,
            leading_filler,
            rules,
        })
    }

    #[must_use]
    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    /// Turn a free-text description into an ordered task list.
    ///
    /// Pure and infallible: empty or unrecognizable text yields a default list.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<ExtractedTask> {
        let mut list = TaskList { tasks: Vec::new() };

        for fragment in self.fragment_splitter.split(text) {
            if let Some(phrase) = self.capture_phrase(fragment) {
                list.push(&phrase);
            }
        }
        debug!(found = list.len(), "Fragment scan complete");

        if list.len() <= 1 {
            self.sentence_scan(text, &mut list);
            debug!(found = list.len(), "Sentence scan complete");
        }

        if list.tasks.is_empty() {
            for task in self.default_tasks(text) {
                list.tasks.push(ExtractedTask {
                    phrase: task.clone(),
                });
            }
            debug!(found = list.len(), "Using default task list");
        }

        list.tasks.truncate(self.rules.max_tasks.max(1));
        list.tasks
    }

    /// First verb phrase in a fragment, cleaned but not yet capitalized
    fn capture_phrase(&self, fragment: &str) -> Option<String> {
        let lowered = fragment.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();

        let verb_at = tokens.iter().position(|t| self.rules.is_verb(bare(t)))?;
        let start = if verb_at > 0 && self.rules.is_modifier(bare(tokens[verb_at - 1])) {
            verb_at - 1
        } else {
            verb_at
        };
        let end = tokens[verb_at + 1..]
            .iter()
            .position(|t| {
                let t = bare(t);
                self.rules.is_verb(t) || self.rules.is_discourse_marker(t)
            })
            .map_or(tokens.len(), |offset| verb_at + 1 + offset);

        let mut phrase = tokens[start..end].join(" ");
        if let Some(prefix) = self
            .rules
            .filler_prefixes
            .iter()
            .find(|p| phrase.starts_with(&format!("{p} ")))
        {
            phrase = phrase[prefix.len() + 1..].to_string();
        }
        if let Some((head, last)) = phrase.rsplit_once(' ')
            && self.rules.is_trailing_noun(bare(last))
        {
            phrase = head.to_string();
        }

        Some(phrase.trim().to_string())
    }

    fn sentence_scan(&self, text: &str, list: &mut TaskList) {
        for sentence in SENTENCE_TERMINATORS.split(text) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }
            for pattern in &self.sentence_patterns {
                for m in pattern.find_iter(sentence) {
                    let phrase = self.leading_filler.replace(m.as_str(), "");
                    list.push(phrase.trim());
                }
            }
        }
    }

    fn default_tasks(&self, text: &str) -> &[String] {
        let lowered = text.to_lowercase();
        let words: HashSet<&str> = WORDS.find_iter(&lowered).map(|m| m.as_str()).collect();

        self.rules
            .keyword_defaults
            .iter()
            .find(|d| words.contains(d.keyword.as_str()))
            .map_or(self.rules.generic_default.as_slice(), |d| d.tasks.as_slice())
    }
}

impl Default for TaskExtractor {
    fn default() -> Self {
        Self::new().expect("Failed to create default TaskExtractor")
    }
}

static DEFAULT_EXTRACTOR: LazyLock<TaskExtractor> =
    LazyLock::new(|| TaskExtractor::new().expect("Failed to create default TaskExtractor"));

/// Process-global extractor with the built-in vocabulary
#[must_use]
pub fn default_extractor() -> &'static TaskExtractor {
    &DEFAULT_EXTRACTOR
}

/// Extract tasks with the built-in vocabulary
#[must_use]
pub fn extract_tasks(text: &str) -> Vec<ExtractedTask> {
    default_extractor().extract(text)
}
