//! The masking state machine.
//!
//! [MaskEngine] holds the configuration, the [EngineState] is
//! threaded through every call. [MaskEngine::apply] takes the
//! state and one [TextEdit] and returns the next state together
//! with the text that should be shown.
//!
//! ```rust
//! use rat_mask::{MaskEngine, TemplateSet, TextEdit};
//!
//! let engine = MaskEngine::new(TemplateSet::parse("###-##"));
//! let mut state = engine.initial_state();
//! let mut text = String::new();
//! for c in ["1", "2", "3", "4"] {
//!     let r = engine.apply(state, &TextEdit::push(&text, c));
//!     state = r.state;
//!     text = r.text;
//! }
//! assert_eq!(text, "123-4");
//! ```
//!
//! Lengths and positions are counted in graphemes.
//!

use crate::MaskError;
use crate::mask_engine::mask_op::{
    append_literal_run, apply_literal, glen, remove_trailing_literal,
};
use crate::raw::{ExtractMode, extract_raw, raw_positions};
use crate::template::Template;
use crate::template_set::{SelectRule, TemplateId, TemplateSet};
use log::{debug, warn};
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

pub mod mask_op;

pub use mask_op::reflow;

/// Mutable part of the engine.
///
/// The active template is either a member of the template set
/// or None. None means the text is passed through unmasked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineState {
    active: Option<TemplateId>,
    masking: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            active: None,
            masking: true,
        }
    }
}

impl EngineState {
    /// Active template.
    pub fn active(&self) -> Option<TemplateId> {
        self.active
    }

    /// Masking is enabled.
    pub fn is_masking(&self) -> bool {
        self.masking
    }
}

/// One edit as reported by the host.
///
/// The counts are in graphemes. `start` is where the change
/// begins, `removed` graphemes of the previous text have been
/// replaced by `inserted` graphemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    previous: String,
    text: String,
    start: usize,
    removed: usize,
    inserted: usize,
}

impl TextEdit {
    /// New edit from the values reported by the host.
    ///
    /// Fails if the counts don't fit the texts.
    pub fn new(
        previous: impl Into<String>,
        text: impl Into<String>,
        start: usize,
        removed: usize,
        inserted: usize,
    ) -> Result<Self, MaskError> {
        let previous = previous.into();
        let text = text.into();
        let previous_len = glen(&previous);
        let text_len = glen(&text);

        if start + removed > previous_len || previous_len - removed + inserted != text_len {
            return Err(MaskError::InvalidEdit {
                previous_len,
                text_len,
                start,
                removed,
                inserted,
            });
        }

        Ok(Self {
            previous,
            text,
            start,
            removed,
            inserted,
        })
    }

    /// Append at the end.
    pub fn push(previous: &str, s: &str) -> Self {
        let start = glen(previous);
        let mut text = previous.to_string();
        text.push_str(s);
        let inserted = glen(&text).saturating_sub(start);
        Self {
            previous: previous.to_string(),
            text,
            start,
            removed: 0,
            inserted,
        }
    }

    /// Remove the last grapheme. Removing from an empty
    /// text is an edit that doesn't change anything.
    pub fn pop(previous: &str) -> Self {
        let mut graphemes = previous.graphemes(true).collect::<Vec<_>>();
        let removed = if graphemes.pop().is_some() { 1 } else { 0 };
        Self {
            previous: previous.to_string(),
            text: graphemes.concat(),
            start: graphemes.len(),
            removed,
            inserted: 0,
        }
    }

    /// Insert at a grapheme position.
    pub fn insert_str(previous: &str, pos: usize, s: &str) -> Result<Self, MaskError> {
        Self::replace_range(previous, pos..pos, s)
    }

    /// Remove a grapheme range.
    pub fn remove_range(previous: &str, range: Range<usize>) -> Result<Self, MaskError> {
        Self::replace_range(previous, range, "")
    }

    /// Replace a grapheme range.
    pub fn replace_range(previous: &str, range: Range<usize>, s: &str) -> Result<Self, MaskError> {
        let graphemes = previous.graphemes(true).collect::<Vec<_>>();
        if range.start > range.end || range.end > graphemes.len() {
            return Err(MaskError::InvalidEdit {
                previous_len: graphemes.len(),
                text_len: graphemes.len(),
                start: range.start,
                removed: range.end.saturating_sub(range.start),
                inserted: glen(s),
            });
        }

        let mut text = graphemes[..range.start].concat();
        text.push_str(s);
        text.push_str(&graphemes[range.end..].concat());

        Self::new(previous, text, range.start, range.len(), glen(s))
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }

    /// Text after the edit.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn removed(&self) -> usize {
        self.removed
    }

    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// The edit reaches to the end of the previous text.
    pub fn is_tail(&self) -> bool {
        self.start + self.removed == glen(&self.previous)
    }

    /// Exactly one grapheme typed at the end.
    fn is_append_one(&self) -> bool {
        self.removed == 0 && self.inserted == 1 && self.is_tail()
    }

    /// Only removes graphemes at the end.
    fn is_truncate(&self) -> bool {
        self.inserted == 0 && self.removed > 0 && self.is_tail()
    }
}

/// Result of [MaskEngine::apply].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Text to show.
    pub text: String,
    /// Next state.
    pub state: EngineState,
    /// The text is non-empty and fills the largest template.
    pub completed: bool,
}

/// Masking engine.
#[derive(Debug, Clone, Default)]
pub struct MaskEngine {
    templates: TemplateSet,
    extract: ExtractMode,
}

impl MaskEngine {
    pub fn new(templates: TemplateSet) -> Self {
        Self {
            templates,
            extract: Default::default(),
        }
    }

    /// Engine with a `|` separated list of templates.
    pub fn parse(patterns: &str) -> Self {
        Self::new(TemplateSet::parse(patterns))
    }

    /// How raw content is extracted from masked text.
    pub fn set_extract_mode(&mut self, mode: ExtractMode) {
        self.extract = mode;
    }

    pub fn extract_mode(&self) -> ExtractMode {
        self.extract
    }

    /// Comparison used to select a template for some raw content.
    pub fn set_select_rule(&mut self, rule: SelectRule) {
        self.templates.set_select_rule(rule);
    }

    pub fn select_rule(&self) -> SelectRule {
        self.templates.select_rule()
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// State for replaying raw content from an empty text.
    ///
    /// Activates the first template that can hold the raw content.
    /// If none can, the active template is None and the content
    /// will pass through unmasked.
    pub fn assign_state(&self, state: EngineState, raw: &str) -> EngineState {
        if !state.masking {
            return state;
        }
        EngineState {
            active: self.templates.select(glen(raw)),
            masking: true,
        }
    }

    /// Masking enabled and the smallest template active.
    pub fn initial_state(&self) -> EngineState {
        self.reconcile(EngineState::default())
    }

    /// Add a template.
    pub fn add_template(&mut self, state: EngineState, pattern: &str) -> EngineState {
        self.templates.add(pattern);
        self.reconcile(state)
    }

    /// Add several templates.
    pub fn add_templates<S: AsRef<str>>(
        &mut self,
        state: EngineState,
        patterns: impl IntoIterator<Item = S>,
    ) -> EngineState {
        self.templates.add_all(patterns);
        self.reconcile(state)
    }

    /// Replace all templates.
    ///
    /// The active template is gone afterward, so the smallest
    /// new template becomes active.
    pub fn set_templates<S: AsRef<str>>(
        &mut self,
        state: EngineState,
        patterns: impl IntoIterator<Item = S>,
    ) -> EngineState {
        self.templates.set(patterns);
        if self.templates.is_empty() && state.masking {
            warn!("no usable template, masking is off");
        }
        self.reconcile(state)
    }

    /// Remove all templates.
    pub fn clear_templates(&mut self, state: EngineState) -> EngineState {
        self.templates.clear();
        self.reconcile(state)
    }

    /// Enable/disable masking.
    ///
    /// Disabling drops the active template and the length limit.
    /// Enabling activates the smallest template.
    pub fn set_masking(&self, state: EngineState, masking: bool) -> EngineState {
        self.reconcile(EngineState {
            active: if masking { state.active } else { None },
            masking,
        })
    }

    /// Restore the invariants after the template set changed.
    fn reconcile(&self, mut state: EngineState) -> EngineState {
        if !state.masking {
            state.active = None;
            return state;
        }
        if let Some(active) = state.active {
            if !self.templates.contains(active) {
                state.active = None;
            }
        }
        if state.active.is_none() {
            state.active = self.templates.smallest();
        }
        state
    }

    /// Active template, if the state is masked.
    pub fn active_template(&self, state: &EngineState) -> Option<&Template> {
        self.active(state).map(|(_, t)| t)
    }

    fn active(&self, state: &EngineState) -> Option<(TemplateId, &Template)> {
        if !state.masking {
            return None;
        }
        let id = state.active?;
        let template = self.templates.get(id)?;
        if template.is_degenerate() {
            None
        } else {
            Some((id, template))
        }
    }

    /// Maximum accepted length in graphemes. None means unbounded.
    pub fn max_len(&self, state: &EngineState) -> Option<usize> {
        if state.masking {
            self.templates.max_len()
        } else {
            None
        }
    }

    /// Raw content of the text.
    pub fn raw_text(&self, state: &EngineState, text: &str) -> String {
        extract_raw(text, self.active_template(state), self.extract)
    }

    /// Text fills the largest template.
    pub fn is_complete(&self, state: &EngineState, text: &str) -> bool {
        !text.is_empty() && self.max_len(state) == Some(glen(text))
    }

    /// Template to use for content of the given raw length.
    ///
    /// Falls back to the largest template if nothing fits.
    /// The raw content will be truncated in that case.
    pub fn select_for(&self, raw_len: usize) -> Option<TemplateId> {
        self.templates
            .select(raw_len)
            .or_else(|| self.templates.largest())
    }

    /// Process one edit.
    pub fn apply(&self, state: EngineState, edit: &TextEdit) -> EditOutcome {
        let mut state = state;

        let text = match self.active(&state) {
            None => {
                if state.masking && !self.templates.is_empty() {
                    self.reenter(&mut state, edit)
                } else {
                    edit.text().to_string()
                }
            }
            Some((id, template)) => {
                if edit.inserted() > edit.removed() {
                    if edit.is_append_one() {
                        self.insert_tail(&mut state, id, template, edit.text())
                    } else {
                        self.splice(&mut state, template, edit)
                    }
                } else if edit.removed() > edit.inserted() {
                    if edit.is_truncate() {
                        self.remove_tail(&mut state, id, template, edit.text())
                    } else {
                        self.splice(&mut state, template, edit)
                    }
                } else {
                    edit.text().to_string()
                }
            }
        };

        let completed = self.is_complete(&state, &text);
        EditOutcome {
            text,
            state,
            completed,
        }
    }

    fn insert_tail(
        &self,
        state: &mut EngineState,
        id: TemplateId,
        template: &Template,
        text: &str,
    ) -> String {
        if glen(text) > template.literal_len() {
            return self.escalate(state, id, template, text);
        }
        let text = apply_literal(text, template);
        if glen(&text) > template.literal_len() {
            return self.escalate(state, id, template, &text);
        }
        text
    }

    fn escalate(
        &self,
        state: &mut EngineState,
        id: TemplateId,
        template: &Template,
        text: &str,
    ) -> String {
        let raw = extract_raw(text, Some(template), self.extract);

        let (next_id, next) = match self.templates.next_larger(id) {
            Some(next_id) => match self.templates.get(next_id) {
                Some(next) => (next_id, next),
                None => (id, template),
            },
            None => (id, template),
        };
        if next_id != id {
            debug!("escalate {} -> {}", template, next);
        } else {
            debug!("no larger template than {}, truncate", template);
        }

        state.active = Some(next_id);
        append_literal_run(reflow(&raw, next), next)
    }

    fn remove_tail(
        &self,
        state: &mut EngineState,
        id: TemplateId,
        template: &Template,
        text: &str,
    ) -> String {
        if self.templates.len() > 1 && self.templates.has_previous(id) {
            if let Ok(prev_id) = self.templates.previous_smaller(id) {
                if let Some(prev) = self.templates.get(prev_id) {
                    if glen(text) == prev.literal_len() {
                        let raw = extract_raw(text, Some(template), self.extract);
                        if glen(&raw) <= prev.capacity() {
                            debug!("de-escalate {} -> {}", template, prev);
                            state.active = Some(prev_id);
                            return reflow(&raw, prev);
                        }
                    }
                }
            }
        }
        remove_trailing_literal(text, template)
    }

    /// Anything but typing/deleting at the end.
    ///
    /// The raw content before and after the edited region is kept,
    /// inserted literals of any template are dropped. The result is reflowed into
    /// the template selected for the new raw length.
    fn splice(&self, state: &mut EngineState, template: &Template, edit: &TextEdit) -> String {
        let previous = edit.previous().graphemes(true).collect::<Vec<_>>();
        let text = edit.text().graphemes(true).collect::<Vec<_>>();
        let start = edit.start();
        let end = edit.start() + edit.removed();

        let positions = raw_positions(&previous, template, self.extract);
        let mut raw = String::new();
        for i in positions.iter().copied().filter(|i| *i < start) {
            raw.push_str(previous[i]);
        }
        for g in text.get(start..start + edit.inserted()).unwrap_or_default() {
            if !self.templates.is_any_literal(g) {
                raw.push_str(g);
            }
        }
        for i in positions.iter().copied().filter(|i| *i >= end) {
            raw.push_str(previous[i]);
        }

        self.reflow_selected(state, raw, edit.inserted() > edit.removed())
    }

    /// Masking is enabled, but there is no active template.
    /// Try to select one for the current content.
    fn reenter(&self, state: &mut EngineState, edit: &TextEdit) -> String {
        let raw = edit
            .text()
            .graphemes(true)
            .filter(|g| !self.templates.is_any_literal(g))
            .collect::<String>();

        if self.templates.select(glen(&raw)).is_none() {
            return edit.text().to_string();
        }
        self.reflow_selected(state, raw, edit.inserted() > edit.removed())
    }

    fn reflow_selected(&self, state: &mut EngineState, raw: String, growing: bool) -> String {
        let Some(id) = self.select_for(glen(&raw)) else {
            return raw;
        };
        let Some(template) = self.templates.get(id) else {
            return raw;
        };
        if state.active != Some(id) {
            debug!("select {}", template);
        }
        state.active = Some(id);

        let text = reflow(&raw, template);
        if growing {
            append_literal_run(text, template)
        } else {
            text
        }
    }
}
