//! Built-in comparers
//!
//! Each comparer returns `None` when the values match and a report otherwise.

use std::collections::BTreeMap;

use tenon::value::{text_repr, unordered_eq};
use tenon::{Model, Value};

use crate::context::CompareContext;
use crate::diff;
use crate::error::CompareResult;
use crate::registry::CustomComparer;

#[derive(Clone)]
pub(crate) enum Comparer {
    Simple,
    WithType,
    Text,
    Sequence,
    Unordered,
    Set,
    Mapping,
    Model,
    Custom(CustomComparer),
}

impl Comparer {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Comparer::Simple => "simple",
            Comparer::WithType => "with_type",
            Comparer::Text => "text",
            Comparer::Sequence => "sequence",
            Comparer::Unordered => "unordered",
            Comparer::Set => "set",
            Comparer::Mapping => "mapping",
            Comparer::Model => "model",
            Comparer::Custom(_) => "custom",
        }
    }

    /// Whether the report of this comparer is shown with its path when nested
    pub(crate) fn is_specific(&self) -> bool {
        !matches!(self, Comparer::Simple)
    }
}

pub(crate) fn run_builtin(
    comparer: &Comparer,
    x: &Value,
    y: &Value,
    ctx: &mut CompareContext<'_>,
) -> CompareResult<Option<String>> {
    match (comparer, x, y) {
        (Comparer::WithType, _, _) => Ok(compare_with_type(x, y)),
        (Comparer::Text, Value::Text(a), Value::Text(b)) => Ok(compare_text(a, b, ctx)),
        (Comparer::Sequence, Value::List(a), Value::List(b)) => compare_sequence(a, b, ctx),
        (Comparer::Unordered, Value::List(a), Value::List(b)) => {
            Ok(compare_unordered(a, b, "sequence", ctx))
        }
        (Comparer::Set, Value::Set(a), Value::Set(b)) => Ok(compare_unordered(a, b, "set", ctx)),
        (Comparer::Mapping, Value::Map(a), Value::Map(b)) => compare_mapping(a, b, Some("dict"), ctx),
        _ => Ok(compare_simple(x, y, ctx)),
    }
}

pub(crate) fn compare_simple(x: &Value, y: &Value, ctx: &CompareContext<'_>) -> Option<String> {
    if x == y && !ctx.options().strict {
        return None;
    }
    let (x_repr, y_repr) = (x.repr(), y.repr());
    if x_repr == y_repr {
        if x.type_name() != y.type_name() {
            return compare_with_type(x, y);
        }
        if x == y {
            return None;
        }
        return Some(format!(
            "Both {} and {} appear as {}, but are not equal!",
            ctx.options().x_label.as_deref().unwrap_or("x"),
            ctx.options().y_label.as_deref().unwrap_or("y"),
            x_repr
        ));
    }
    Some(format!("{} != {}", ctx.label_x(x_repr), ctx.label_y(y_repr)))
}

pub(crate) fn compare_with_type(x: &Value, y: &Value) -> Option<String> {
    Some(format!(
        "{} (<class '{}'>) != {} (<class '{}'>)",
        x.repr(),
        x.type_name(),
        y.repr(),
        y.type_name()
    ))
}

pub(crate) fn compare_text(x: &str, y: &str, ctx: &CompareContext<'_>) -> Option<String> {
    if x == y {
        return None;
    }
    let labelled_x = ctx.label_x(text_repr(x));
    let labelled_y = ctx.label_y(text_repr(y));

    if x.chars().count() > 10 || y.chars().count() > 10 {
        if x.contains('\n') || y.contains('\n') {
            Some(format!("\n{}", diff::unified(x, y, ctx.x_name(), ctx.y_name())))
        } else {
            Some(format!("\n{}\n!=\n{}", labelled_x, labelled_y))
        }
    } else {
        Some(format!("{} != {}", labelled_x, labelled_y))
    }
}

pub(crate) fn compare_sequence(
    x: &[Value],
    y: &[Value],
    ctx: &mut CompareContext<'_>,
) -> CompareResult<Option<String>> {
    let mut i = 0;
    while i < x.len() && i < y.len() {
        if ctx.different(&x[i], &y[i], &format!("[{}]", i))? {
            break;
        }
        i += 1;
    }

    if x.len() == y.len() && i == x.len() {
        return Ok(None);
    }

    Ok(Some(format!(
        "sequence not as expected:\n\nsame:\n{}\n\n{}:\n{}\n\n{}:\n{}",
        list_repr(&x[..i]),
        ctx.x_name(),
        list_repr(&x[i..]),
        ctx.y_name(),
        list_repr(&y[i..]),
    )))
}

pub(crate) fn compare_unordered(
    x: &[Value],
    y: &[Value],
    header: &str,
    ctx: &CompareContext<'_>,
) -> Option<String> {
    if unordered_eq(x, y) {
        return None;
    }

    let x_not_y = unmatched(x, y);
    let y_not_x = unmatched(y, x);

    let mut lines = vec![format!("{} not as expected:", header), String::new()];
    if !x_not_y.is_empty() {
        lines.push(format!("in {} but not {}:", ctx.x_name(), ctx.y_name()));
        lines.push(sorted_list_repr(&x_not_y));
        lines.push(String::new());
    }
    if !y_not_x.is_empty() {
        lines.push(format!("in {} but not {}:", ctx.y_name(), ctx.x_name()));
        lines.push(sorted_list_repr(&y_not_x));
        lines.push(String::new());
    }
    Some(lines.join("\n") + "\n")
}

pub(crate) fn compare_mapping(
    x: &BTreeMap<String, Value>,
    y: &BTreeMap<String, Value>,
    header: Option<&str>,
    ctx: &mut CompareContext<'_>,
) -> CompareResult<Option<String>> {
    let x_not_y: Vec<&String> = x.keys().filter(|key| !y.contains_key(*key)).collect();
    let y_not_x: Vec<&String> = y.keys().filter(|key| !x.contains_key(*key)).collect();

    let mut same = Vec::new();
    let mut diffs = Vec::new();
    for (key, x_value) in x {
        let Some(y_value) = y.get(key) else {
            continue;
        };
        let key_repr = text_repr(key);
        if ctx.different(x_value, y_value, &format!("[{}]", key_repr))? {
            diffs.push(format!(
                "{}: {} != {}",
                key_repr,
                ctx.label_x(x_value.repr()),
                ctx.label_y(y_value.repr())
            ));
        } else {
            same.push(key_repr);
        }
    }

    if x_not_y.is_empty() && y_not_x.is_empty() && diffs.is_empty() {
        return Ok(None);
    }

    let mut lines = Vec::new();
    if let Some(header) = header {
        lines.push(format!("{} not as expected:", header));
    }
    if !same.is_empty() {
        lines.push(String::new());
        lines.push("same:".to_string());
        lines.push(format!("[{}]", same.join(", ")));
    }
    if !x_not_y.is_empty() {
        lines.push(String::new());
        lines.push(format!("in {} but not {}:", ctx.x_name(), ctx.y_name()));
        lines.extend(x_not_y.iter().map(|key| format!("{}: {}", text_repr(key), x[*key].repr())));
    }
    if !y_not_x.is_empty() {
        lines.push(String::new());
        lines.push(format!("in {} but not {}:", ctx.y_name(), ctx.x_name()));
        lines.extend(y_not_x.iter().map(|key| format!("{}: {}", text_repr(key), y[*key].repr())));
    }
    if !diffs.is_empty() {
        lines.push(String::new());
        lines.push("values differ:".to_string());
        lines.extend(diffs);
    }
    Ok(Some(lines.join("\n")))
}

/// Default comparer for two instances of the same model type
pub fn compare_model(
    x: &dyn Model,
    y: &dyn Model,
    ctx: &mut CompareContext<'_>,
) -> CompareResult<Option<String>> {
    let x_attributes = ctx.model_attributes(x)?;
    let y_attributes = ctx.model_attributes(y)?;
    compare_mapping(&x_attributes, &y_attributes, Some(x.model_name()), ctx)
}

/// Elements of `from` left over after pairing each with an equal element of `against`
fn unmatched<'v>(from: &'v [Value], against: &[Value]) -> Vec<&'v Value> {
    let mut used = vec![false; against.len()];
    from.iter()
        .filter(|item| {
            let found = against
                .iter()
                .enumerate()
                .position(|(i, candidate)| !used[i] && candidate == *item);
            match found {
                Some(i) => {
                    used[i] = true;
                    false
                }
                None => true,
            }
        })
        .collect()
}

fn list_repr(values: &[Value]) -> String {
    let reprs: Vec<String> = values.iter().map(Value::repr).collect();
    format!("[{}]", reprs.join(", "))
}

fn sorted_list_repr(values: &[&Value]) -> String {
    let mut reprs: Vec<String> = values.iter().map(|value| value.repr()).collect();
    reprs.sort();
    format!("[{}]", reprs.join(", "))
}
