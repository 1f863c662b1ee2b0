use std::collections::{BTreeMap, HashMap};

use crate::model::ids::QuestionId;

/// Selected option index per question. One entry per question at most.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    selections: HashMap<QuestionId, usize>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the selection for a question.
    ///
    /// Bounds checking against the question's options is the caller's job.
    pub fn select(&mut self, question: QuestionId, option: usize) {
        self.selections.insert(question, option);
    }

    #[must_use]
    pub fn get(&self, question: &QuestionId) -> Option<usize> {
        self.selections.get(question).copied()
    }

    #[must_use]
    pub fn contains(&self, question: &QuestionId) -> bool {
        self.selections.contains_key(question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, usize)> {
        self.selections.iter().map(|(id, option)| (id, *option))
    }

    /// Persisted form: question id to option index, both as strings.
    #[must_use]
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.selections
            .iter()
            .map(|(id, option)| (id.to_string(), option.to_string()))
            .collect()
    }

    /// Rebuild a sheet from its persisted form, skipping entries that do not parse.
    #[must_use]
    pub fn from_string_map(map: &BTreeMap<String, String>) -> Self {
        map.iter()
            .filter_map(|(id, option)| {
                let id = QuestionId::new(id.as_str()).ok()?;
                let option = option.trim().parse::<usize>().ok()?;
                Some((id, option))
            })
            .collect()
    }
}

impl FromIterator<(QuestionId, usize)> for AnswerSheet {
    fn from_iter<I: IntoIterator<Item = (QuestionId, usize)>>(iter: I) -> Self {
        Self {
            selections: iter.into_iter().collect(),
        }
    }
}
