//! Vocabulary table driving task extraction

use serde::{Deserialize, Serialize};

/// Upper bound on tasks produced for one description
pub const DEFAULT_MAX_TASKS: usize = 10;

/// Longest phrase kept verbatim; longer phrases are cut with an ellipsis
pub const MAX_PHRASE_CHARS: usize = 50;

const VERBS: &[&str] = &[
    "verify", "check", "process", "ship", "send", "receive", "create", "update", "validate",
    "confirm", "approve", "reject", "assign", "deliver", "pack", "prepare", "review", "analyze",
    "generate", "complete", "schedule", "notify", "calculate", "assess", "determine", "ensure",
    "perform", "execute", "handle", "manage", "organize", "coordinate", "monitor", "track",
    "record", "document", "submit", "forward", "transfer", "allocate", "distribute", "collect",
    "gather",
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// Default task list used when a description mentions `keyword`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordDefault {
    pub keyword: String,
    pub tasks: Vec<String>,
}

impl KeywordDefault {
    fn new(keyword: &str, tasks: &[&str]) -> Self {
        Self {
            keyword: keyword.to_string(),
            tasks: owned(tasks),
        }
    }
}

/// Lexical rules for [`TaskExtractor`](crate::TaskExtractor).
///
/// Every word list is matched case-insensitively against whole tokens.
/// `Default` carries the built-in English vocabulary; tests and callers can
/// substitute any field without touching extraction control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Action verbs that start a task phrase
    pub verbs: Vec<String>,
    /// Words kept in front of a verb ("we", "must", ...)
    pub modifiers: Vec<String>,
    /// Words that end a task phrase
    pub discourse_markers: Vec<String>,
    /// Words that split a sentence into candidate fragments
    pub separators: Vec<String>,
    /// Leading filler removed from a captured phrase; may span several words
    pub filler_prefixes: Vec<String>,
    /// Sequencing words that may precede a verb in the regex pass
    pub lead_ins: Vec<String>,
    /// Generic trailing nouns dropped from a phrase ("task", "step", ...)
    pub trailing_nouns: Vec<String>,
    /// Keyword-triggered defaults, first match wins
    pub keyword_defaults: Vec<KeywordDefault>,
    /// Used when no keyword default applies
    pub generic_default: Vec<String>,
    pub max_tasks: usize,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            verbs: owned(VERBS),
            modifiers: owned(&["we", "to", "need", "must", "will", "should"]),
            discourse_markers: owned(&["then", "and", "after", "before", "next", "finally"]),
            separators: owned(&["and", "then", "to"]),
            filler_prefixes: owned(&["we", "need to", "must", "will", "should", "to"]),
            lead_ins: owned(&["then", "next", "after that"]),
            trailing_nouns: owned(&["task", "step", "process", "activity"]),
            keyword_defaults: vec![
                KeywordDefault::new("order", &["Receive Order", "Process Order", "Fulfill Order"]),
                KeywordDefault::new(
                    "patient",
                    &["Register Patient", "Conduct Examination", "Provide Treatment"],
                ),
                KeywordDefault::new("loan", &["Review Application", "Assess Risk", "Approve Loan"]),
            ],
            generic_default: owned(&["Start Process", "Complete Activity", "Finish Process"]),
            max_tasks: DEFAULT_MAX_TASKS,
        }
    }
}

impl ExtractionRules {
    pub(crate) fn is_verb(&self, token: &str) -> bool {
        self.verbs.iter().any(|v| v == token)
    }

    pub(crate) fn is_modifier(&self, token: &str) -> bool {
        self.modifiers.iter().any(|m| m == token)
    }

    pub(crate) fn is_discourse_marker(&self, token: &str) -> bool {
        self.discourse_markers.iter().any(|m| m == token)
    }

    pub(crate) fn is_trailing_noun(&self, token: &str) -> bool {
        self.trailing_nouns.iter().any(|n| n == token)
    }

    /// Lowercase every word list so matching can compare tokens directly
    pub(crate) fn normalized(mut self) -> Self {
        for list in [
            &mut self.verbs,
            &mut self.modifiers,
            &mut self.discourse_markers,
            &mut self.separators,
            &mut self.filler_prefixes,
            &mut self.lead_ins,
            &mut self.trailing_nouns,
        ] {
            for word in list.iter_mut() {
                *word = word.trim().to_lowercase();
            }
            list.retain(|w| !w.is_empty());
        }
        for default in &mut self.keyword_defaults {
            default.keyword = default.keyword.trim().to_lowercase();
        }
        for tasks in std::iter::once(&mut self.generic_default)
            .chain(self.keyword_defaults.iter_mut().map(|d| &mut d.tasks))
        {
            for task in tasks.iter_mut() {
                *task = task.trim().to_string();
            }
            tasks.retain(|t| !t.is_empty());
        }
        self
    }
}
