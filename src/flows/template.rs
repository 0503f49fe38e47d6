//! `{{{field}}}` substitution for prompt templates.

use thiserror::Error;

const OPEN: &str = "{{{";
const CLOSE: &str = "}}}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("placeholder `{0}` has no bound value")]
    Unbound(String),
    #[error("binding `{0}` is not referenced by the template")]
    Unused(&'static str),
    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// Replaces every `{{{name}}}` in `template` with its bound value.
///
/// Values are inserted verbatim. Every placeholder must be bound and every
/// binding must be used at least once.
pub fn render(template: &str, bindings: &[(&'static str, &str)]) -> Result<String, TemplateError> {
    let extra: usize = bindings.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut used = vec![false; bindings.len()];
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or(TemplateError::Unterminated(offset + start))?;
        let name = after_open[..end].trim();

        let idx = bindings
            .iter()
            .position(|(key, _)| *key == name)
            .ok_or_else(|| TemplateError::Unbound(name.to_string()))?;
        out.push_str(bindings[idx].1);
        used[idx] = true;

        let consumed = start + OPEN.len() + end + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);

    if let Some(idx) = used.iter().position(|u| !u) {
        return Err(TemplateError::Unused(bindings[idx].0));
    }

    Ok(out)
}
