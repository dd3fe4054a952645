use rat_mask::{EngineState, MaskEngine, MaskError, TemplateSet, TextEdit};

struct Session {
    engine: MaskEngine,
    state: EngineState,
    text: String,
    completed: bool,
}

impl Session {
    fn new(patterns: &str) -> Self {
        let engine = MaskEngine::new(TemplateSet::parse(patterns));
        let state = engine.initial_state();
        Self {
            engine,
            state,
            text: String::new(),
            completed: false,
        }
    }

    fn edit(&mut self, edit: TextEdit) -> &str {
        let r = self.engine.apply(self.state, &edit);
        self.state = r.state;
        self.text = r.text;
        self.completed = r.completed;
        &self.text
    }

    fn key(&mut self, key: &str) -> &str {
        let edit = TextEdit::push(&self.text, key);
        self.edit(edit)
    }

    fn keys(&mut self, keys: &str) -> &str {
        for c in keys.chars() {
            self.key(&c.to_string());
        }
        &self.text
    }

    fn back(&mut self) -> &str {
        let edit = TextEdit::pop(&self.text);
        self.edit(edit)
    }

    fn template(&self) -> Option<&str> {
        self.engine
            .active_template(&self.state)
            .map(|v| v.pattern())
    }
}

#[test]
fn test_typing() {
    let mut s = Session::new("###-##");
    assert_eq!(s.template(), Some("###-##"));
    assert_eq!(s.key("1"), "1");
    assert_eq!(s.key("2"), "12");
    assert_eq!(s.key("3"), "123-");
    assert!(!s.completed);
    assert_eq!(s.key("4"), "123-4");
    assert!(!s.completed);
    assert_eq!(s.key("5"), "123-45");
    assert!(s.completed);
}

#[test]
fn test_leading_literal() {
    let mut s = Session::new("(##) ####");
    assert_eq!(s.key("1"), "(1");
    assert_eq!(s.key("2"), "(12) ");
    assert_eq!(s.key("3"), "(12) 3");

    assert_eq!(s.back(), "(12");
    assert_eq!(s.back(), "(1");
    assert_eq!(s.back(), "");
    assert_eq!(s.back(), "");
}

#[test]
fn test_remove_literal() {
    let mut s = Session::new("###-##");
    s.keys("1234");
    assert_eq!(s.text, "123-4");
    // the separator goes with the digit.
    assert_eq!(s.back(), "123");
    assert_eq!(s.back(), "12");

    s.keys("3");
    assert_eq!(s.text, "123-");
    // deleting the separator itself.
    assert_eq!(s.back(), "123");
    // typing on the literal slot.
    assert_eq!(s.key("4"), "123-4");
}

#[test]
fn test_replace_is_noop() {
    let mut s = Session::new("###-##");
    s.keys("1234");
    let edit = TextEdit::replace_range(&s.text, 4..5, "9").expect("valid_range");
    assert_eq!(s.edit(edit), "123-9");
    let edit = TextEdit::replace_range(&s.text, 3..4, "x").expect("valid_range");
    assert_eq!(s.edit(edit), "123x9");
}

#[test]
fn test_escalate() {
    let mut s = Session::new("##|####-##");
    assert_eq!(s.keys("12"), "12");
    assert_eq!(s.template(), Some("##"));
    assert!(!s.completed);

    assert_eq!(s.key("3"), "123");
    assert_eq!(s.template(), Some("####-##"));
    assert_eq!(s.engine.raw_text(&s.state, &s.text), "123");

    assert_eq!(s.key("4"), "1234-");
    assert_eq!(s.key("5"), "1234-5");
    assert!(!s.completed);
    assert_eq!(s.key("6"), "1234-56");
    assert!(s.completed);
}

#[test]
fn test_escalate_over_literal() {
    let mut s = Session::new("###|###-###");
    s.keys("123");
    assert_eq!(s.template(), Some("###"));
    assert_eq!(s.key("4"), "123-4");
    assert_eq!(s.template(), Some("###-###"));
}

#[test]
fn test_escalate_appends_literal() {
    let mut s = Session::new("##|###-#");
    s.keys("12");
    assert_eq!(s.key("3"), "123-");
    assert_eq!(s.template(), Some("###-#"));
}

#[test]
fn test_no_larger_template() {
    let mut s = Session::new("###");
    s.keys("123");
    assert!(s.completed);
    assert_eq!(s.key("4"), "123");
    assert_eq!(s.template(), Some("###"));
    assert!(s.completed);
}

#[test]
fn test_deescalate_boundary() {
    let mut s = Session::new("##|####-##");
    s.keys("123456");
    assert_eq!(s.text, "1234-56");

    assert_eq!(s.back(), "1234-5");
    assert!(!s.completed);
    assert_eq!(s.template(), Some("####-##"));
    assert_eq!(s.back(), "1234");
    assert_eq!(s.template(), Some("####-##"));
    // one above
    assert_eq!(s.back(), "123");
    assert_eq!(s.template(), Some("####-##"));
    // exact
    assert_eq!(s.back(), "12");
    assert_eq!(s.template(), Some("##"));

    // and up again
    assert_eq!(s.key("3"), "123");
    assert_eq!(s.template(), Some("####-##"));

    // one below
    let edit = TextEdit::remove_range(&s.text, 1..3).expect("valid_range");
    assert_eq!(s.edit(edit), "1");
    assert_eq!(s.template(), Some("####-##"));
}

#[test]
fn test_deescalate_needs_room() {
    let mut s = Session::new("##-##|#######");
    assert_eq!(s.keys("1234"), "12-34");
    assert_eq!(s.key("5"), "12345");
    assert_eq!(s.template(), Some("#######"));
    assert_eq!(s.key("6"), "123456");

    // length matches the smaller template, content doesn't fit.
    assert_eq!(s.back(), "12345");
    assert_eq!(s.template(), Some("#######"));
    assert_eq!(s.back(), "1234");
    assert_eq!(s.template(), Some("#######"));
}

#[test]
fn test_deescalate_reflow() {
    let mut s = Session::new("##-##|###-###");
    s.keys("123456");
    assert_eq!(s.text, "123-456");
    assert_eq!(s.back(), "123-45");
    assert_eq!(s.template(), Some("###-###"));
    assert_eq!(s.back(), "12-34");
    assert_eq!(s.template(), Some("##-##"));
}

#[test]
fn test_paste() {
    let mut s = Session::new("####-##");
    assert_eq!(s.key("12345"), "1234-5");
    assert_eq!(s.back(), "1234");

    let mut s = Session::new("####-##");
    assert_eq!(s.key("1234-56"), "1234-56");
    assert!(s.completed);

    let mut s = Session::new("####-##");
    assert_eq!(s.key("1234"), "1234-");
}

#[test]
fn test_splice() {
    let mut s = Session::new("####-##");
    s.keys("123456");

    let edit = TextEdit::insert_str(&s.text, 0, "0").expect("valid_range");
    assert_eq!(s.edit(edit), "0123-45");

    let edit = TextEdit::remove_range(&s.text, 1..2).expect("valid_range");
    assert_eq!(s.edit(edit), "0234-5");

    let edit = TextEdit::replace_range(&s.text, 0..2, "9").expect("valid_range");
    assert_eq!(s.edit(edit), "9345");
}

#[test]
fn test_splice_selects_template() {
    let mut s = Session::new("##|####-##");
    s.keys("12345");
    assert_eq!(s.text, "1234-5");

    let edit = TextEdit::remove_range(&s.text, 0..3).expect("valid_range");
    assert_eq!(s.edit(edit), "45");
    assert_eq!(s.template(), Some("##"));

    let edit = TextEdit::insert_str(&s.text, 1, "99").expect("valid_range");
    assert_eq!(s.edit(edit), "4995-");
    assert_eq!(s.template(), Some("####-##"));
}

#[test]
fn test_paste_formatted() {
    let mut s = Session::new("##|####-##");
    assert_eq!(s.key("1234-56"), "1234-56");
    assert_eq!(s.template(), Some("####-##"));
    assert!(s.completed);

    let mut s = Session::new("##|(##) #####-####");
    assert_eq!(s.key("(11) 98765-4321"), "(11) 98765-4321");
    assert_eq!(s.template(), Some("(##) #####-####"));
    assert!(s.completed);

    // partial paste stays in the larger template.
    let mut s = Session::new("##|(##) #####-####");
    assert_eq!(s.key("(11) 9"), "(11) 9");
    assert_eq!(s.template(), Some("(##) #####-####"));
}

#[test]
fn test_clear_templates() {
    let mut s = Session::new("###-##");
    s.keys("12");
    s.state = s.engine.clear_templates(s.state);

    assert_eq!(s.template(), None);
    assert_eq!(s.engine.max_len(&s.state), None);
    assert_eq!(s.keys("345678"), "12345678");
    assert!(!s.completed);
    assert_eq!(s.back(), "1234567");
    assert_eq!(s.engine.raw_text(&s.state, &s.text), "1234567");
}

#[test]
fn test_masking_disabled() {
    let mut s = Session::new("###-##");
    s.state = s.engine.set_masking(s.state, false);
    assert_eq!(s.template(), None);
    assert_eq!(s.engine.max_len(&s.state), None);
    assert_eq!(s.keys("1234567"), "1234567");
    assert!(!s.completed);

    s.state = s.engine.set_masking(s.state, true);
    assert_eq!(s.template(), Some("###-##"));
    assert_eq!(s.engine.max_len(&s.state), Some(6));
}

#[test]
fn test_template_changes() {
    let mut s = Session::new("");
    assert_eq!(s.template(), None);
    assert_eq!(s.engine.max_len(&s.state), None);

    s.state = s.engine.add_template(s.state, "####-##");
    assert_eq!(s.template(), Some("####-##"));
    assert_eq!(s.engine.max_len(&s.state), Some(7));

    // the active template stays.
    s.state = s.engine.add_template(s.state, "##");
    assert_eq!(s.template(), Some("####-##"));
    assert_eq!(s.engine.max_len(&s.state), Some(7));

    s.state = s.engine.add_templates(s.state, ["###.###.###-##"]);
    assert_eq!(s.engine.max_len(&s.state), Some(14));

    s.state = s.engine.set_templates(s.state, ["###", "#"]);
    assert_eq!(s.template(), Some("#"));
    assert_eq!(s.engine.max_len(&s.state), Some(3));

    s.state = s.engine.set_templates(s.state, [""]);
    assert_eq!(s.template(), None);
    assert_eq!(s.engine.max_len(&s.state), None);
}

#[test]
fn test_reenter() {
    let mut s = Session::new("##|###");
    s.state = s.engine.assign_state(s.state, "12345");
    assert_eq!(s.template(), None);
    s.text = "12345".into();

    assert_eq!(s.back(), "1234");
    assert_eq!(s.template(), None);
    assert_eq!(s.back(), "123");
    assert_eq!(s.template(), Some("###"));
    assert_eq!(s.back(), "12");
    assert_eq!(s.template(), Some("##"));
}

#[test]
fn test_invalid_edit() {
    assert_eq!(
        TextEdit::new("12", "123", 2, 0, 2),
        Err(MaskError::InvalidEdit {
            previous_len: 2,
            text_len: 3,
            start: 2,
            removed: 0,
            inserted: 2,
        })
    );
    assert!(TextEdit::new("12", "123", 2, 0, 1).is_ok());
    assert!(TextEdit::new("12", "1", 1, 2, 1).is_err());
    assert!(TextEdit::remove_range("12", 1..5).is_err());
    assert!(TextEdit::insert_str("12", 3, "x").is_err());
}
