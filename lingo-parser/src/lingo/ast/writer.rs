//! Literal notation writer
//!
//! Canonical form: `, ` between elements, `#key: value` entries, `[:]` for an empty
//! property list. Floats always carry a decimal point so they read back as floats.

use super::Node;
use std::fmt::{self, Write};

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(n) => write!(f, "{}", n),
            Node::FloatNumber(x) => write_float(f, *x),
            Node::String(s) => write_string(f, s),
            Node::Symbol(s) => write!(f, "#{}", s),
            Node::List(items) => {
                f.write_char('[')?;
                write_separated(f, items)?;
                f.write_char(']')
            }
            Node::PropertyList(entries) if entries.is_empty() => f.write_str("[:]"),
            Node::PropertyList(entries) => {
                f.write_char('[')?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "#{}: {}", key, value)?;
                }
                f.write_char(']')
            }
            Node::Call { name, args } => {
                write!(f, "{}(", name)?;
                write_separated(f, args)?;
                f.write_char(')')
            }
        }
    }
}

fn write_separated(f: &mut fmt::Formatter<'_>, items: &[Node]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

// `Display` for f64 never uses exponents, so only the missing `.0` needs fixing
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    let text = x.to_string();
    if x.is_finite() && !text.contains('.') {
        write!(f, "{}.0", text)
    } else {
        f.write_str(&text)
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            other => f.write_char(other)?,
        }
    }
    f.write_char('"')
}
