use dtab_derive::dtab_error;
use std::borrow::Cow;

#[dtab_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    std::fs::read("missing").context("reading fixture")?;
    Ok(())
}

fn main() {
    let _ = read();
    let _: DemoError = "boom".into();
}
