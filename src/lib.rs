#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod mask_engine;
pub mod masked_field;
pub mod raw;
pub mod template;
pub mod template_set;

pub use mask_engine::{EditOutcome, EngineState, MaskEngine, TextEdit};
pub use masked_field::{CompletionListener, MaskOptions, MaskedFieldState};
pub use raw::{ExtractMode, extract_raw};
pub use template::{PLACEHOLDER, Slot, Template};
pub use template_set::{SelectRule, TemplateId, TemplateSet};

pub mod event {
    //!
    //! Result of feeding an edit notification into a masked field.
    //!

    /// Result of edit handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum MaskOutcome {
        /// The notification was caused by writing back our own
        /// result. It has been acknowledged and dropped.
        Echo,
        /// The edit has been processed, and the host text is
        /// already what the engine wants it to be.
        Unchanged,
        /// The edit has been processed, and the engine produced a
        /// different text. The host should write back
        /// [MaskedFieldState::text](crate::MaskedFieldState::text)
        /// and place the caret at the end.
        TextChanged,
    }

    impl MaskOutcome {
        /// The host has to write back the text.
        pub fn needs_write(&self) -> bool {
            *self == MaskOutcome::TextChanged
        }
    }
}

#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// There is no template before the given one.
    ///
    /// Asking for the previous template of the smallest one is a
    /// contract violation. Check with
    /// [TemplateSet::has_previous](crate::TemplateSet::has_previous).
    TemplateOutOfRange(TemplateId),
    /// The template-id is not a member of the template set.
    UnknownTemplate(TemplateId),
    /// The edit-description doesn't match its texts.
    ///
    /// Contains the length of the previous text, the length of
    /// the new text, and start/removed/inserted, all in graphemes.
    InvalidEdit {
        previous_len: usize,
        text_len: usize,
        start: usize,
        removed: usize,
        inserted: usize,
    },
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MaskError {}

mod _private {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
