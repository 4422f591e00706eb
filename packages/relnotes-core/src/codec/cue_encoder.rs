use crate::{
    codec::cue_decoder::is_identifier,
    types::{Fields, Release, Value},
};

pub const PACKAGE_NAME: &str = "metadata";

/// Lists whose struct items are written one per line.
const INLINE_ITEM_LISTS: [&str; 1] = ["commits"];

/// Writes values in the canonical layout used by release files: tab
/// indentation, multi-line strings as `"""` blocks and one commit per line.
pub struct CueEncoder;

impl CueEncoder {
    pub fn encode_release(release: &Release) -> String {
        let mut out = format!("package {PACKAGE_NAME}\n\nreleases: ");
        out.push_str(&encode_label(&release.version.to_string()));
        out.push_str(": ");
        write_value(&mut out, &release.clone().into_value(), 0, false);
        out.push('\n');

        out
    }

    /// Writes the fields of a root struct at the top level. Other values are
    /// written as they are.
    pub fn encode_value(value: &Value) -> String {
        let mut out = String::new();
        match value {
            Value::Struct(fields) => {
                for (label, value) in fields.iter() {
                    write_field(&mut out, label, value, 0);
                }
            }
            other => {
                write_value(&mut out, other, 0, false);
                out.push('\n');
            }
        }

        out
    }
}

fn indent(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat('\t').take(depth));
}

fn encode_label(label: &str) -> String {
    if is_identifier(label) {
        label.to_string()
    } else {
        quote(label)
    }
}

fn write_field(out: &mut String, label: &str, value: &Value, depth: usize) {
    indent(out, depth);
    out.push_str(&encode_label(label));
    out.push_str(": ");
    write_value(out, value, depth, INLINE_ITEM_LISTS.contains(&label));
    out.push('\n');
}

/// `depth` is the indentation of the line the value starts on.
fn write_value(out: &mut String, value: &Value, depth: usize, inline_items: bool) {
    match value {
        Value::String(s) if s.contains('\n') => write_multiline(out, s, depth + 1),
        Value::List(items) if items.is_empty() => out.push_str("[]"),
        Value::List(items) if items.iter().all(is_single_line_scalar) => {
            write_inline(out, value);
        }
        Value::List(items) => {
            out.push_str("[\n");
            for item in items {
                indent(out, depth + 1);
                if inline_items {
                    write_inline(out, item);
                } else {
                    write_value(out, item, depth + 1, false);
                }
                out.push_str(",\n");
            }
            indent(out, depth);
            out.push(']');
        }
        Value::Struct(fields) if fields.is_empty() => out.push_str("{}"),
        Value::Struct(fields) => {
            out.push_str("{\n");
            for (label, value) in fields.iter() {
                write_field(out, label, value, depth + 1);
            }
            indent(out, depth);
            out.push('}');
        }
        scalar => write_inline(out, scalar),
    }
}

fn is_single_line_scalar(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.contains('\n'),
        other => other.is_scalar(),
    }
}

/// Single-line rendition of any value. Strings are always quoted.
fn write_inline(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(&b.to_string()),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(x) => out.push_str(&format!("{x:?}")),
        Value::String(s) => out.push_str(&quote(s)),
        Value::List(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_inline(out, item);
            }
            out.push(']');
        }
        Value::Struct(fields) => write_inline_struct(out, fields),
    }
}

fn write_inline_struct(out: &mut String, fields: &Fields) {
    out.push('{');
    for (idx, (label, value)) in fields.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push_str(&encode_label(label));
        out.push_str(": ");
        write_inline(out, value);
    }
    out.push('}');
}

fn write_multiline(out: &mut String, s: &str, depth: usize) {
    out.push_str("\"\"\"\n");
    for line in escape_multiline(s).split('\n') {
        if !line.is_empty() {
            indent(out, depth);
            out.push_str(line);
        }
        out.push('\n');
    }
    indent(out, depth);
    out.push_str("\"\"\"");
}

fn escape_control(c: char, out: &mut String) {
    out.push_str(&format!("\\u{:04x}", c as u32));
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => escape_control(c, &mut out),
            c => out.push(c),
        }
    }
    out.push('"');

    out
}

fn escape_multiline(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' | '\t' => out.push(c),
            c if c.is_control() => escape_control(c, &mut out),
            c => out.push(c),
        }
    }

    out.replace("\"\"\"", "\\\"\"\"")
}
