//! All templates of one field, ordered by capacity.
//!
//! The configuration string separates templates with `|`:
//!
//! ```rust
//! use rat_mask::TemplateSet;
//!
//! let set = TemplateSet::parse("####-##|##");
//! let t = set.iter().map(|(_, t)| t.pattern()).collect::<Vec<_>>();
//! assert_eq!(t, vec!["##", "####-##"]);
//! ```
//!

use crate::MaskError;
use crate::template::Template;
use log::debug;
use std::fmt::{Debug, Formatter};

/// Separator for a list of templates in one string.
pub const TEMPLATE_SEPARATOR: char = '|';

/// Identifies a template within a [TemplateSet].
///
/// Ids are never reused by the same set, so an id of a removed
/// template stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateId(u64);

/// How [TemplateSet::select] compares capacity and raw length.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SelectRule {
    /// capacity >= raw length. A template is chosen as soon
    /// as the content fits.
    #[default]
    AtLeast,
    /// capacity > raw length. A template is only chosen while there
    /// is still room left in it.
    Greater,
}

impl SelectRule {
    #[inline]
    pub fn fits(&self, capacity: usize, raw_len: usize) -> bool {
        match self {
            SelectRule::AtLeast => capacity >= raw_len,
            SelectRule::Greater => capacity > raw_len,
        }
    }
}

#[derive(Clone)]
struct Entry {
    id: TemplateId,
    template: Template,
}

/// Templates ordered by ascending capacity.
///
/// Templates with the same capacity keep their insertion order,
/// but which one is selected is not well-defined.
#[derive(Clone, Default)]
pub struct TemplateSet {
    entries: Vec<Entry>,
    next_id: u64,
    rule: SelectRule,
}

impl Debug for TemplateSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateSet")
            .field("rule", &self.rule)
            .field(
                "templates",
                &self
                    .entries
                    .iter()
                    .map(|v| (v.id, v.template.pattern()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `|` separated list of patterns.
    /// Empty patterns are dropped.
    pub fn parse(patterns: &str) -> Self {
        let mut s = Self::new();
        s.add_all(patterns.split(TEMPLATE_SEPARATOR));
        s
    }

    /// Comparison used by select.
    pub fn set_select_rule(&mut self, rule: SelectRule) {
        self.rule = rule;
    }

    pub fn select_rule(&self) -> SelectRule {
        self.rule
    }

    /// Add a template.
    ///
    /// Returns None for an empty pattern, which is dropped.
    pub fn add(&mut self, pattern: &str) -> Option<TemplateId> {
        let id = self.push(pattern);
        self.sort();
        id
    }

    /// Add several templates.
    pub fn add_all<S: AsRef<str>>(&mut self, patterns: impl IntoIterator<Item = S>) {
        for p in patterns {
            self.push(p.as_ref());
        }
        self.sort();
    }

    /// Replace all templates.
    pub fn set<S: AsRef<str>>(&mut self, patterns: impl IntoIterator<Item = S>) {
        self.entries.clear();
        self.add_all(patterns);
    }

    /// Remove all templates.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push(&mut self, pattern: &str) -> Option<TemplateId> {
        if pattern.is_empty() {
            debug!("drop empty template");
            return None;
        }
        let id = TemplateId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            id,
            template: Template::parse(pattern),
        });
        Some(id)
    }

    // stable, equal capacities keep insertion order.
    fn sort(&mut self) {
        self.entries.sort_by_key(|v| v.template.capacity());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: TemplateId) -> bool {
        self.position(id).is_some()
    }

    /// Index in ascending order.
    pub fn position(&self, id: TemplateId) -> Option<usize> {
        self.entries.iter().position(|v| v.id == id)
    }

    pub fn get(&self, id: TemplateId) -> Option<&Template> {
        self.entries
            .iter()
            .find(|v| v.id == id)
            .map(|v| &v.template)
    }

    /// Like get, but fails for an unknown id.
    pub fn template(&self, id: TemplateId) -> Result<&Template, MaskError> {
        self.get(id).ok_or(MaskError::UnknownTemplate(id))
    }

    /// Iterate in ascending capacity.
    pub fn iter(&self) -> impl Iterator<Item = (TemplateId, &Template)> {
        self.entries.iter().map(|v| (v.id, &v.template))
    }

    pub fn smallest(&self) -> Option<TemplateId> {
        self.entries.first().map(|v| v.id)
    }

    pub fn largest(&self) -> Option<TemplateId> {
        self.entries.last().map(|v| v.id)
    }

    /// First template in ascending order that can hold raw_len
    /// graphemes according to the [SelectRule].
    pub fn select(&self, raw_len: usize) -> Option<TemplateId> {
        self.entries
            .iter()
            .find(|v| self.rule.fits(v.template.capacity(), raw_len))
            .map(|v| v.id)
    }

    /// First template with a capacity strictly greater than the
    /// current one. None if current is the largest or not a member.
    pub fn next_larger(&self, current: TemplateId) -> Option<TemplateId> {
        let cap = self.get(current)?.capacity();
        self.entries
            .iter()
            .find(|v| v.template.capacity() > cap)
            .map(|v| v.id)
    }

    /// Is there a template before this one?
    pub fn has_previous(&self, current: TemplateId) -> bool {
        matches!(self.position(current), Some(pos) if pos > 0)
    }

    /// The template immediately before current.
    ///
    /// Calling this for the smallest template is a contract
    /// violation, guard it with [has_previous](Self::has_previous).
    pub fn previous_smaller(&self, current: TemplateId) -> Result<TemplateId, MaskError> {
        match self.position(current) {
            None => Err(MaskError::UnknownTemplate(current)),
            Some(0) => Err(MaskError::TemplateOutOfRange(current)),
            Some(pos) => Ok(self.entries[pos - 1].id),
        }
    }

    /// Length of a completely filled largest template.
    /// None if there are no templates.
    pub fn max_len(&self) -> Option<usize> {
        self.entries.last().map(|v| v.template.literal_len())
    }

    /// Is this grapheme used as a literal by any template.
    pub fn is_any_literal(&self, grapheme: &str) -> bool {
        self.entries
            .iter()
            .any(|v| v.template.literals().any(|l| l == grapheme))
    }
}
