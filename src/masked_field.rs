//! Masked input field state.
//!
//! Sits between the host text widget and the [MaskEngine].
//! The host reports every change of its text with
//! [MaskedFieldState::text_changed] and writes back
//! [MaskedFieldState::text] if asked to.
//!
//! ```rust
//! use rat_mask::event::MaskOutcome;
//! use rat_mask::{MaskedFieldState, TextEdit};
//!
//! let mut field = MaskedFieldState::new().with_templates("(##) ####-####");
//! let mut host = String::new();
//!
//! for c in ["1", "1", "5"] {
//!     let edit = TextEdit::push(&host, c);
//!     host = edit.text().to_string();
//!     if field.text_changed(&edit) == MaskOutcome::TextChanged {
//!         let write = TextEdit::replace_range(&host, 0..host.chars().count(), field.text())
//!             .expect("valid_range");
//!         host = write.text().to_string();
//!         // the host sees its own write.
//!         assert_eq!(field.text_changed(&write), MaskOutcome::Echo);
//!     }
//! }
//! assert_eq!(host, "(11) 5");
//! assert_eq!(field.raw_text(), "115");
//! ```
//!

use crate::_private::NonExhaustive;
use crate::event::MaskOutcome;
use crate::mask_engine::{EngineState, MaskEngine, TextEdit};
use crate::raw::ExtractMode;
use crate::template::Template;
use crate::template_set::{SelectRule, TEMPLATE_SEPARATOR};
use dyn_clone::DynClone;
use log::trace;
use std::fmt;
use std::fmt::{Debug, Formatter};
use unicode_segmentation::UnicodeSegmentation;

/// Gets notified at the end of every processed edit.
pub trait CompletionListener: DynClone {
    /// The text fills the largest template, or it doesn't.
    ///
    /// Called for every edit, not only when this changes.
    fn on_completion_changed(&mut self, filled: bool);
}

dyn_clone::clone_trait_object!(CompletionListener);

impl<F> CompletionListener for F
where
    F: FnMut(bool) + Clone,
{
    fn on_completion_changed(&mut self, filled: bool) {
        (self)(filled)
    }
}

/// Configuration for a masked field.
#[derive(Debug, Clone)]
pub struct MaskOptions {
    /// `|` separated list of templates.
    pub templates: Option<String>,
    pub masking: Option<bool>,
    pub extract: Option<ExtractMode>,
    pub select: Option<SelectRule>,

    pub non_exhaustive: NonExhaustive,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            templates: None,
            masking: None,
            extract: None,
            select: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

/// State of a masked field.
#[derive(Clone)]
pub struct MaskedFieldState {
    engine: MaskEngine,
    state: EngineState,
    // current text as the host shows it.
    value: String,
    // text we handed out, its write-back is not processed.
    echo: Option<String>,
    completed: bool,
    listener: Option<Box<dyn CompletionListener>>,

    pub non_exhaustive: NonExhaustive,
}

impl Default for MaskedFieldState {
    fn default() -> Self {
        Self {
            engine: Default::default(),
            state: Default::default(),
            value: Default::default(),
            echo: None,
            completed: false,
            listener: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

impl Debug for MaskedFieldState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskedFieldState")
            .field("engine", &self.engine)
            .field("state", &self.state)
            .field("value", &self.value)
            .field("echo", &self.echo)
            .field("completed", &self.completed)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl MaskedFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the templates as `|` separated list.
    pub fn with_templates(mut self, patterns: &str) -> Self {
        self.set_templates(patterns.split(TEMPLATE_SEPARATOR));
        self
    }

    pub fn with_masking(mut self, masking: bool) -> Self {
        self.set_masking_enabled(masking);
        self
    }

    pub fn with_extract_mode(mut self, mode: ExtractMode) -> Self {
        self.engine.set_extract_mode(mode);
        self
    }

    pub fn with_select_rule(mut self, rule: SelectRule) -> Self {
        self.engine.set_select_rule(rule);
        self
    }

    pub fn with_completion_listener(mut self, listener: impl CompletionListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Apply all options that are set.
    pub fn set_options(&mut self, options: MaskOptions) {
        if let Some(extract) = options.extract {
            self.engine.set_extract_mode(extract);
        }
        if let Some(select) = options.select {
            self.engine.set_select_rule(select);
        }
        if let Some(templates) = options.templates {
            self.set_templates(templates.split(TEMPLATE_SEPARATOR));
        }
        if let Some(masking) = options.masking {
            self.set_masking_enabled(masking);
        }
    }

    pub fn set_completion_listener(&mut self, listener: impl CompletionListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_completion_listener(&mut self) {
        self.listener = None;
    }

    /// Add a template. Empty patterns are ignored.
    pub fn add_template(&mut self, pattern: &str) {
        self.state = self.engine.add_template(self.state, pattern);
    }

    /// Add several templates.
    pub fn add_templates<S: AsRef<str>>(&mut self, patterns: impl IntoIterator<Item = S>) {
        self.state = self.engine.add_templates(self.state, patterns);
    }

    /// Replace all templates.
    pub fn set_templates<S: AsRef<str>>(&mut self, patterns: impl IntoIterator<Item = S>) {
        self.state = self.engine.set_templates(self.state, patterns);
    }

    /// Remove all templates. The field is unmasked afterward.
    pub fn clear_templates(&mut self) {
        self.state = self.engine.clear_templates(self.state);
    }

    /// Enable/disable masking.
    ///
    /// Enabling reformats the current text. Disabling leaves
    /// the text as it is, but removes the length limit.
    pub fn set_masking_enabled(&mut self, masking: bool) {
        let was = self.state.is_masking();
        self.state = self.engine.set_masking(self.state, masking);
        if masking && !was {
            let text = self.value.clone();
            self.assign(&text);
        }
    }

    pub fn is_masking(&self) -> bool {
        self.state.is_masking()
    }

    pub fn engine(&self) -> &MaskEngine {
        &self.engine
    }

    pub fn engine_state(&self) -> EngineState {
        self.state
    }

    /// Active template, if any.
    pub fn active_template(&self) -> Option<&Template> {
        self.engine.active_template(&self.state)
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.value
    }

    /// Text without the literals.
    pub fn raw_text(&self) -> String {
        self.engine.raw_text(&self.state, &self.value)
    }

    /// Maximum length of the text in graphemes.
    ///
    /// The host should limit the text to this length.
    /// None if there is no limit.
    pub fn max_len(&self) -> Option<usize> {
        self.engine.max_len(&self.state)
    }

    /// Result of the last processed edit.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Set the text.
    ///
    /// The literals of all templates are removed, the result is
    /// typed into the field grapheme by grapheme. Every grapheme
    /// runs through the normal edit processing and notifies the
    /// listener.
    ///
    /// If no template can hold the content it is set unmasked.
    pub fn assign(&mut self, text: &str) {
        let raw = if self.state.is_masking() {
            text.graphemes(true)
                .filter(|g| !self.engine.templates().is_any_literal(g))
                .collect::<String>()
        } else {
            text.to_string()
        };

        self.state = self.engine.assign_state(self.state, &raw);
        self.value.clear();

        if self.state.is_masking() && self.state.active().is_some() {
            for g in raw.graphemes(true) {
                let r = self.engine.apply(self.state, &TextEdit::push(&self.value, g));
                self.state = r.state;
                self.value = r.text;
                self.notify(r.completed);
            }
        } else {
            self.value = text.to_string();
            let completed = self.engine.is_complete(&self.state, &self.value);
            self.notify(completed);
        }

        self.echo = Some(self.value.clone());
    }

    /// The host text changed.
    ///
    /// Returns [MaskOutcome::TextChanged] if the host should write
    /// back [text](Self::text). Reporting that write is fine, it
    /// will be recognized and answered with [MaskOutcome::Echo].
    pub fn text_changed(&mut self, edit: &TextEdit) -> MaskOutcome {
        if let Some(echo) = self.echo.take() {
            if echo == edit.text() {
                trace!("echo {:?}", echo);
                self.value = echo;
                return MaskOutcome::Echo;
            }
        }

        let r = self.engine.apply(self.state, edit);
        self.state = r.state;
        self.value = r.text;
        self.notify(r.completed);

        if self.value != edit.text() {
            self.echo = Some(self.value.clone());
            MaskOutcome::TextChanged
        } else {
            MaskOutcome::Unchanged
        }
    }

    fn notify(&mut self, completed: bool) {
        self.completed = completed;
        if let Some(listener) = &mut self.listener {
            listener.on_completion_changed(completed);
        }
    }
}
