//! Notion query response types and question normalization.
//!
//! The raw types mirror the slice of the Notion page-property format the
//! question schema uses (`rich_text`, `title`, `select`); everything else in
//! a property object is ignored. Normalization turns each page into a flat
//! `Question` record and grouping buckets the records by unit.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::prop;

/// Raw response from `POST /databases/{id}/query`.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A single database page (one question record).
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PageProperty>,
}

/// Untyped property bag entry. Only the representations the question schema
/// uses are modeled; a property carries at most one of them.
#[derive(Debug, Default, Deserialize)]
pub struct PageProperty {
    #[serde(default)]
    pub rich_text: Option<Vec<RichTextSpan>>,
    #[serde(default)]
    pub title: Option<Vec<RichTextSpan>>,
    #[serde(default)]
    pub select: Option<SelectOption>,
}

/// One span of rich text.
#[derive(Debug, Deserialize)]
pub struct RichTextSpan {
    #[serde(default)]
    pub plain_text: String,
}

/// A select-property value.
#[derive(Debug, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

fn first_non_empty(spans: Option<&[RichTextSpan]>) -> Option<&str> {
    spans
        .and_then(|s| s.first())
        .map(|s| s.plain_text.as_str())
        .filter(|t| !t.is_empty())
}

impl PageProperty {
    /// Text content: first rich-text span, falling back to the first title
    /// span, then the empty string. Empty spans fall through, matching the
    /// `||` chain this replaces.
    pub fn plain_text(&self) -> String {
        first_non_empty(self.rich_text.as_deref())
            .or_else(|| first_non_empty(self.title.as_deref()))
            .unwrap_or_default()
            .to_string()
    }

    /// Select value name, or the empty string when unset.
    pub fn select_name(&self) -> String {
        self.select.as_ref().map(|s| s.name.clone()).unwrap_or_default()
    }
}

impl Page {
    /// Text property by name, defaulting to the empty string.
    pub fn text(&self, name: &str) -> String {
        self.properties.get(name).map(PageProperty::plain_text).unwrap_or_default()
    }

    /// Select property by name, defaulting to the empty string.
    pub fn select(&self, name: &str) -> String {
        self.properties.get(name).map(PageProperty::select_name).unwrap_or_default()
    }
}

/// A normalized question record, in the shape the application consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text.
    pub q: String,
    /// Hint text.
    pub hint: String,
    /// The four choices, labeled A-D positionally. Always length 4; choices
    /// missing upstream become empty strings.
    pub choices: [String; 4],
    /// Zero-based index of the correct choice.
    pub answer: usize,
    /// Explanation text.
    pub explain: String,
    /// Unit label used as the grouping key.
    pub unit: String,
    /// Difficulty label.
    pub level: String,
}

/// Map a correct-answer letter to a zero-based choice index.
///
/// Unrecognized or missing letters map to 0.
pub fn answer_index(letter: &str) -> usize {
    match letter {
        "A" => 0,
        "B" => 1,
        "C" => 2,
        "D" => 3,
        _ => 0,
    }
}

impl From<&Page> for Question {
    /// Extract the question fields from a page's property bag.
    fn from(page: &Page) -> Self {
        Question {
            q: page.text(prop::QUESTION),
            hint: page.text(prop::HINT),
            choices: [
                page.text(prop::CHOICE_A),
                page.text(prop::CHOICE_B),
                page.text(prop::CHOICE_C),
                page.text(prop::CHOICE_D),
            ],
            answer: answer_index(&page.select(prop::ANSWER)),
            explain: page.text(prop::EXPLANATION),
            unit: page.select(prop::UNIT),
            level: page.select(prop::LEVEL),
        }
    }
}

impl QueryResponse {
    /// Normalize every page in the result set, in upstream order.
    pub fn questions(&self) -> Vec<Question> {
        self.results.iter().map(Question::from).collect()
    }
}

/// Group questions by their unit label.
///
/// Records with an empty unit are dropped. Within each group, the relative
/// order of the upstream records is preserved.
pub fn group_by_unit(questions: Vec<Question>) -> BTreeMap<String, Vec<Question>> {
    let mut grouped: BTreeMap<String, Vec<Question>> = BTreeMap::new();
    for question in questions {
        if question.unit.is_empty() {
            continue;
        }
        grouped.entry(question.unit.clone()).or_default().push(question);
    }
    grouped
}
