//! jq pre-processing of input documents (via jaq).
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

use crate::error::{Error, Result};

/// Run `filter_src` over `input`; every output of the filter is one sample.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let mut it = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    while let Some(item) = it.next() {
        let v = item.map_err(|e| Error::Jq(format!("{e:?}")))?;
        // Val only exposes JSON through Display
        let text = format!("{v}");
        let value = serde_json::from_str::<Value>(&text).map_err(|source| Error::Json {
            origin: format!("jq output of `{filter_src}`"),
            source,
        })?;
        out.push(value);
    }
    Ok(out)
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> Error {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    Error::Jq(s.trim_end().to_string())
}

fn format_undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> Error {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    Error::Jq(s.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_fans_out_into_samples() {
        let doc = json!({"data": {"items": [{"a": 1}, {"a": 2}]}});
        let out = run_jaq(".data.items[]", &doc).unwrap();
        assert_eq!(out, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[test]
    fn bad_filter_is_a_jq_error() {
        let err = run_jaq(".[", &json!({})).unwrap_err();
        assert!(matches!(err, Error::Jq(_)));
    }
}
