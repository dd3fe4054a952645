//!
//! Types keys into a masked field and prints each step.
//!
//! `cargo run --example typing -- "##|####-##" "123456<<"`
//!
//! A `<` is a backspace.
//!

use rat_mask::event::MaskOutcome;
use rat_mask::{MaskedFieldState, TextEdit};
use std::env;
use unicode_segmentation::UnicodeSegmentation;

fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let mut args = env::args().skip(1);
    let templates = args.next().unwrap_or_else(|| "(##) ####-####|(##) #####-####".into());
    let keys = args.next().unwrap_or_else(|| "11987654321<<".into());

    let mut field = MaskedFieldState::new()
        .with_templates(&templates)
        .with_completion_listener(|filled: bool| {
            if filled {
                println!("    ** filled **");
            }
        });
    let mut host = String::new();

    println!("templates {:?} max_len {:?}", templates, field.max_len());
    for key in keys.graphemes(true) {
        let edit = if key == "<" {
            TextEdit::pop(&host)
        } else {
            TextEdit::push(&host, key)
        };
        host = edit.text().to_string();

        if field.text_changed(&edit) == MaskOutcome::TextChanged {
            let len = host.graphemes(true).count();
            let write = TextEdit::replace_range(&host, 0..len, field.text())?;
            host = write.text().to_string();
            let echo = field.text_changed(&write);
            assert_eq!(echo, MaskOutcome::Echo);
        }

        println!(
            "{:>3} -> {:<20} raw {:<14} template {}",
            key,
            format!("{:?}", host),
            format!("{:?}", field.raw_text()),
            field
                .active_template()
                .map(|v| v.pattern().to_string())
                .unwrap_or_default()
        );
    }

    Ok(())
}

fn setup_logging() -> Result<(), anyhow::Error> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("    [{}] {}", record.level(), message))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}
