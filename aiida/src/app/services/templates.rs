// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

//! Brace-style templates used by computer settings, e.g.
//! `mpirun -np {tot_num_mpiprocs}` or `/scratch/{username}/aiida_run`.
//! `{{` and `}}` are literal braces.

use thiserror::Error as ThisError;

use crate::app::errors::AppError;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown replacement field '{0}'")]
    UnknownField(String),
    #[error("empty replacement field in '{0}'")]
    EmptyField(String),
    #[error("single '}}' encountered in '{0}'")]
    SingleClosingBrace(String),
    #[error("expected '}}' before end of '{0}'")]
    UnterminatedField(String),
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::validation(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    OpenBrace,
    CloseBrace,
    Field(&'a str),
}

fn segments(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut out = Vec::new();
    let bytes = template.as_bytes();
    let mut literal_start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'{' => {
                if literal_start < idx {
                    out.push(Segment::Literal(&template[literal_start..idx]));
                }
                if bytes.get(idx + 1) == Some(&b'{') {
                    out.push(Segment::OpenBrace);
                    idx += 2;
                } else {
                    let rest = &template[idx + 1..];
                    let end = rest
                        .find(['{', '}'])
                        .filter(|pos| rest.as_bytes()[*pos] == b'}')
                        .ok_or_else(|| TemplateError::UnterminatedField(template.to_string()))?;
                    out.push(Segment::Field(&rest[..end]));
                    idx += end + 2;
                }
                literal_start = idx;
            }
            b'}' => {
                if literal_start < idx {
                    out.push(Segment::Literal(&template[literal_start..idx]));
                }
                if bytes.get(idx + 1) != Some(&b'}') {
                    return Err(TemplateError::SingleClosingBrace(template.to_string()));
                }
                out.push(Segment::CloseBrace);
                idx += 2;
                literal_start = idx;
            }
            _ => idx += 1,
        }
    }
    if literal_start < bytes.len() {
        out.push(Segment::Literal(&template[literal_start..]));
    }
    Ok(out)
}

/// Base name of a field: `{name.attr}`, `{name[0]}`, `{name!r}` and
/// `{name:>4}` all refer to `name`.
fn field_name(raw: &str) -> &str {
    let end = raw.find(['.', '[', '!', ':']).unwrap_or(raw.len());
    raw[..end].trim()
}

/// Names of every replacement field, in order of appearance.
pub fn placeholders(template: &str) -> Result<Vec<String>, TemplateError> {
    let mut out = Vec::new();
    for segment in segments(template)? {
        if let Segment::Field(raw) = segment {
            let name = field_name(raw);
            if name.is_empty() {
                return Err(TemplateError::EmptyField(template.to_string()));
            }
            out.push(name.to_string());
        }
    }
    Ok(out)
}

/// Fails on the first placeholder not in `allowed`.
pub fn check_fields(template: &str, allowed: &[&str]) -> Result<(), TemplateError> {
    for name in placeholders(template)? {
        if !allowed.contains(&name.as_str()) {
            return Err(TemplateError::UnknownField(name));
        }
    }
    Ok(())
}

/// Substitutes every field using `lookup`. Format specs are ignored.
pub fn render<F>(template: &str, lookup: F) -> Result<String, TemplateError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    for segment in segments(template)? {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::OpenBrace => out.push('{'),
            Segment::CloseBrace => out.push('}'),
            Segment::Field(raw) => {
                let name = field_name(raw);
                if name.is_empty() {
                    return Err(TemplateError::EmptyField(template.to_string()));
                }
                let value =
                    lookup(name).ok_or_else(|| TemplateError::UnknownField(name.to_string()))?;
                out.push_str(&value);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_lists_fields_in_order() {
        let names = placeholders("mpirun -np {tot_num_mpiprocs} -ppn {num_mpiprocs_per_machine}")
            .unwrap();
        assert_eq!(names, vec!["tot_num_mpiprocs", "num_mpiprocs_per_machine"]);
    }

    #[test]
    fn escaped_braces_are_not_fields() {
        assert!(placeholders("echo {{literal}}").unwrap().is_empty());
        assert_eq!(
            render("echo {{x}} {a}", |_| Some("1".to_string())).unwrap(),
            "echo {x} 1"
        );
    }

    #[test]
    fn check_fields_names_the_unknown_field() {
        let err = check_fields("mpirun -np {unknown_key}", &["tot_num_mpiprocs"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown replacement field 'unknown_key'");
    }

    #[test]
    fn format_specs_and_attributes_use_base_name() {
        let names = placeholders("{a:>4} {b.attr} {c[0]} {d!r}").unwrap();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn unbalanced_braces_fail() {
        assert!(matches!(
            placeholders("mpirun {tot"),
            Err(TemplateError::UnterminatedField(_))
        ));
        assert!(matches!(
            placeholders("mpirun }"),
            Err(TemplateError::SingleClosingBrace(_))
        ));
        assert!(matches!(
            placeholders("mpirun {}"),
            Err(TemplateError::EmptyField(_))
        ));
    }

    #[test]
    fn render_substitutes_username() {
        let rendered = render("/scratch/{username}/aiida_run", |name| {
            (name == "username").then(|| "ada".to_string())
        })
        .unwrap();
        assert_eq!(rendered, "/scratch/ada/aiida_run");
    }
}
