//! Extract the raw content of a masked text.

use crate::template::{Slot, Template};
use rustc_hash::FxHashSet;
use unicode_segmentation::UnicodeSegmentation;

/// How literals are recognized in a masked text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Walk text and template side by side. Only graphemes that sit
    /// on a literal slot and equal that literal are dropped.
    ///
    /// Raw content that happens to equal a literal survives, as long
    /// as it sits on a placeholder.
    #[default]
    Positional,
    /// Drop every grapheme that is used as a literal anywhere in the
    /// template, and all whitespace.
    ///
    /// A raw grapheme that equals a literal is lost.
    LiteralSet,
}

/// Raw content of text for the active template.
///
/// Returns the text unchanged if there is no template or the template
/// is degenerate.
pub fn extract_raw(text: &str, template: Option<&Template>, mode: ExtractMode) -> String {
    let Some(template) = template else {
        return text.to_string();
    };
    if template.is_degenerate() || text.is_empty() {
        return text.to_string();
    }

    let graphemes = text.graphemes(true).collect::<Vec<_>>();
    raw_positions(&graphemes, template, mode)
        .into_iter()
        .map(|i| graphemes[i])
        .collect()
}

/// Indexes of the graphemes that are raw content.
pub(crate) fn raw_positions(
    graphemes: &[&str],
    template: &Template,
    mode: ExtractMode,
) -> Vec<usize> {
    match mode {
        ExtractMode::Positional => positional(graphemes, template),
        ExtractMode::LiteralSet => {
            let literals = template.literals().collect::<FxHashSet<_>>();
            graphemes
                .iter()
                .enumerate()
                .filter(|(_, g)| !literals.contains(*g))
                .filter(|(_, g)| !g.chars().all(char::is_whitespace))
                .map(|(i, _)| i)
                .collect()
        }
    }
}

// A literal slot consumes the grapheme if it matches, otherwise the
// slot is skipped. Anything beyond the template is raw.
fn positional(graphemes: &[&str], template: &Template) -> Vec<usize> {
    let mut out = Vec::with_capacity(graphemes.len());
    let mut slot = 0;

    'text: for (i, g) in graphemes.iter().enumerate() {
        loop {
            match template.slot(slot) {
                Some(Slot::Literal(l)) => {
                    slot += 1;
                    if &**l == *g {
                        continue 'text;
                    }
                }
                Some(Slot::Placeholder) => {
                    slot += 1;
                    out.push(i);
                    continue 'text;
                }
                None => {
                    out.push(i);
                    continue 'text;
                }
            }
        }
    }

    out
}
