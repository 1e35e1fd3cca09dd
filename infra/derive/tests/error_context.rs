use dtab_derive::dtab_error;
use std::borrow::Cow;

#[dtab_error]
pub enum SampleError {
    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Missing entry{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<serde_json::Value, SampleError> {
    let value = serde_json::from_str(raw).context("parsing sample")?;
    Ok(value)
}

#[test]
fn source_errors_convert_with_context() {
    let err = parse("{ nope").unwrap_err();
    assert!(matches!(err, SampleError::Json { context: Some(_), .. }));
    assert!(err.to_string().starts_with("JSON error (parsing sample): "));
}

#[test]
fn context_is_attached_to_own_variants() {
    let result: Result<(), SampleError> =
        Err(SampleError::Missing { message: "iron_ingot".into(), context: None });
    let err = result.context("registry lookup").unwrap_err();
    assert_eq!(err.to_string(), "Missing entry (registry lookup): iron_ingot");
}

#[test]
fn strings_become_internal_errors() {
    let from_static: SampleError = "boom".into();
    let from_owned: SampleError = String::from("bang").into();
    assert_eq!(from_static.to_string(), "Internal error: boom");
    assert!(matches!(from_owned, SampleError::Internal { .. }));
}
