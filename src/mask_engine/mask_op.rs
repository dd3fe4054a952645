use crate::template::{Slot, Template};
use unicode_segmentation::UnicodeSegmentation;

/// Length in graphemes.
#[inline]
pub(crate) fn glen(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Synthesize the masked text for raw content.
///
/// Walks the slots left to right. Literals are written as soon as
/// there is raw content left to reach past them, placeholders take
/// the next raw grapheme. Stops when the raw content is exhausted,
/// raw content beyond the capacity is dropped.
pub fn reflow(raw: &str, template: &Template) -> String {
    let mut raw = raw.graphemes(true).peekable();
    let mut buf = String::new();

    for slot in template.slots() {
        if raw.peek().is_none() {
            break;
        }
        match slot {
            Slot::Literal(l) => buf.push_str(l),
            Slot::Placeholder => {
                if let Some(g) = raw.next() {
                    buf.push_str(g);
                }
            }
        }
    }

    buf
}

/// Fix up a text after one grapheme has been appended.
///
/// If the grapheme landed on a literal slot, the literals are
/// moved in front of it. The literals following the grapheme
/// are appended.
///
/// The result may be longer than the template if there was no
/// placeholder left for the grapheme.
pub(crate) fn apply_literal(text: &str, template: &Template) -> String {
    let mut graphemes = text.graphemes(true).collect::<Vec<_>>();
    let Some(typed) = graphemes.pop() else {
        return String::new();
    };
    let pos = graphemes.len();

    let mut buf = graphemes.concat();
    if template.is_literal_at(pos) {
        buf.push_str(&template.literal_run(pos));
    }
    buf.push_str(typed);

    let next = glen(&buf);
    buf.push_str(&template.literal_run(next));
    buf
}

/// Literals following the text are appended.
pub(crate) fn append_literal_run(mut text: String, template: &Template) -> String {
    let next = glen(&text);
    text.push_str(&template.literal_run(next));
    text
}

/// Remove the literals at the end of the text.
///
/// Only graphemes that sit on a literal slot and equal the literal
/// are removed.
pub(crate) fn remove_trailing_literal(text: &str, template: &Template) -> String {
    let mut graphemes = text.graphemes(true).collect::<Vec<_>>();
    while let Some(last) = graphemes.last() {
        let pos = graphemes.len() - 1;
        match template.slot(pos) {
            Some(Slot::Literal(l)) if &**l == *last => {
                graphemes.pop();
            }
            _ => break,
        }
    }
    graphemes.concat()
}
