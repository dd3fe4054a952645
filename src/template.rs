//! A single input mask.
//!
//! * `#`: placeholder, takes one grapheme of input.
//! * everything else is a literal and is rendered verbatim.
//!
//! There is no escaping, a literal `#` can't be written.
//!

use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;

/// Marks one consumable input position.
pub const PLACEHOLDER: &str = "#";

/// One slot of a template.
#[allow(variant_size_differences)]
#[derive(Clone, PartialEq, Eq)]
pub enum Slot {
    /// Takes one grapheme of raw input.
    Placeholder,
    /// Fixed grapheme, inserted automatically.
    Literal(Box<str>),
}

/// Parsed template.
///
/// Templates are immutable once parsed. The empty pattern is a valid
/// template with capacity 0, it means 'no masking'.
#[derive(Clone, PartialEq, Eq)]
pub struct Template {
    pattern: Box<str>,
    slots: Box<[Slot]>,
    capacity: usize,
}

impl Debug for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Placeholder => write!(f, "{}", PLACEHOLDER),
            Slot::Literal(s) => write!(f, "\\{}", s),
        }
    }
}

impl Slot {
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Placeholder)
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Slot::Literal(_))
    }

    /// Literal value, None for a placeholder.
    #[inline]
    pub fn literal(&self) -> Option<&str> {
        match self {
            Slot::Placeholder => None,
            Slot::Literal(s) => Some(s.as_ref()),
        }
    }
}

impl Template {
    /// Parse a pattern. This never fails.
    pub fn parse(pattern: &str) -> Self {
        let slots = pattern
            .graphemes(true)
            .map(|g| {
                if g == PLACEHOLDER {
                    Slot::Placeholder
                } else {
                    Slot::Literal(Box::from(g))
                }
            })
            .collect::<Box<[Slot]>>();
        let capacity = slots.iter().filter(|v| v.is_placeholder()).count();

        Self {
            pattern: Box::from(pattern),
            slots,
            capacity,
        }
    }

    /// Original pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_ref()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot at the given grapheme position.
    pub fn slot(&self, pos: usize) -> Option<&Slot> {
        self.slots.get(pos)
    }

    /// Number of placeholders.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots, that's the length of a completely
    /// filled text.
    pub fn literal_len(&self) -> usize {
        self.slots.len()
    }

    /// Empty template. Doesn't mask anything.
    pub fn is_degenerate(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at pos is a literal.
    pub fn is_literal_at(&self, pos: usize) -> bool {
        matches!(self.slots.get(pos), Some(Slot::Literal(_)))
    }

    /// Position of the next placeholder at or after pos.
    pub fn next_placeholder(&self, pos: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .skip(pos)
            .find(|(_, v)| v.is_placeholder())
            .map(|(i, _)| i)
    }

    /// The consecutive literals starting at pos.
    /// Empty if pos is a placeholder or beyond the end.
    pub fn literal_run(&self, pos: usize) -> String {
        let mut buf = String::new();
        for slot in self.slots.iter().skip(pos) {
            match slot {
                Slot::Placeholder => break,
                Slot::Literal(s) => buf.push_str(s),
            }
        }
        buf
    }

    /// All literal graphemes used by this template.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|v| v.literal())
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

impl Debug for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Template {:?} cap={} len={}",
            self.pattern,
            self.capacity,
            self.slots.len()
        )
    }
}

impl From<&str> for Template {
    fn from(value: &str) -> Self {
        Template::parse(value)
    }
}
