use std::cmp::Ordering;

use crate::renderer::renderer::repr_flat;
use crate::value::Value;

/// Helper for rendering scalar literals
pub struct LiteralRenderer;

impl LiteralRenderer {
    pub fn render_bool(&self, b: bool) -> &'static str {
        if b {
            "True"
        } else {
            "False"
        }
    }

    /// Shortest round-trip form, exponent written as `e+XX` / `e-XX`.
    pub fn render_float(&self, f: f64) -> String {
        if f.is_nan() {
            return "nan".to_string();
        }
        if f.is_infinite() {
            return if f > 0.0 { "inf" } else { "-inf" }.to_string();
        }

        let debug = format!("{:?}", f);
        match debug.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => debug,
        }
    }

    /// Quoted string literal. Single quotes unless the text contains a
    /// single quote and no double quote.
    pub fn render_str(&self, s: &str) -> String {
        let quote = if s.contains('\'') && !s.contains('"') {
            '"'
        } else {
            '\''
        };

        let mut output = String::with_capacity(s.len() + 2);
        output.push(quote);
        for c in s.chars() {
            match c {
                '\\' => output.push_str("\\\\"),
                '\n' => output.push_str("\\n"),
                '\r' => output.push_str("\\r"),
                '\t' => output.push_str("\\t"),
                c if c == quote => {
                    output.push('\\');
                    output.push(c);
                }
                c if c.is_control() || (c.is_whitespace() && c != ' ') => {
                    let code = c as u32;
                    if code <= 0xff {
                        output.push_str(&format!("\\x{:02x}", code));
                    } else if code <= 0xffff {
                        output.push_str(&format!("\\u{:04x}", code));
                    } else {
                        output.push_str(&format!("\\U{:08x}", code));
                    }
                }
                c => output.push(c),
            }
        }
        output.push(quote);
        output
    }

    /// Keyword names are shown bare: `alpha=1`, not `'alpha'=1`.
    pub fn render_keyword(&self, name: &str) -> String {
        self.strip_quotes(&self.render_str(name)).to_string()
    }

    pub fn strip_quotes<'s>(&self, literal: &'s str) -> &'s str {
        literal.trim_matches('\'')
    }
}

pub fn recursion_marker(type_name: &str) -> String {
    format!("<Recursion on {}>", type_name)
}

/// Deterministic ordering for dict entries.
///
/// Keys of the same kind compare natively (numbers by value, strings
/// lexicographically, tuples element by element). Anything else falls back
/// to the type name and then the rendered form.
pub struct KeyOrdering;

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl KeyOrdering {
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        if let (Some(x), Some(y)) = (Self::number(a), Self::number(b)) {
            return Self::compare_numbers(x, y);
        }

        match (a, b) {
            (Value::Str(x), Value::Str(y)) => x.cmp(y),
            (Value::None, Value::None) => Ordering::Equal,
            (Value::Tuple(x), Value::Tuple(y)) => x
                .iter()
                .zip(y.iter())
                .map(|(x, y)| self.compare(x, y))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| x.len().cmp(&y.len())),
            _ => self.fallback(a, b),
        }
    }

    pub fn compare_entries(&self, a: &(Value, Value), b: &(Value, Value)) -> Ordering {
        self.compare(&a.0, &b.0)
            .then_with(|| self.compare(&a.1, &b.1))
    }

    pub fn sorted<'e>(&self, entries: &'e [(Value, Value)]) -> Vec<&'e (Value, Value)> {
        let mut sorted: Vec<_> = entries.iter().collect();
        sorted.sort_by(|a, b| self.compare_entries(a, b));
        sorted
    }

    fn fallback(&self, a: &Value, b: &Value) -> Ordering {
        a.type_name()
            .cmp(b.type_name())
            .then_with(|| repr_flat(a).cmp(&repr_flat(b)))
    }

    /// Total order over numbers: by value, with every NaN equal to the others
    /// and greater than any number.
    fn compare_numbers(x: Number, y: Number) -> Ordering {
        match (x, y) {
            (Number::Float(x), Number::Float(y)) if x.is_nan() || y.is_nan() => {
                x.is_nan().cmp(&y.is_nan())
            }
            (Number::Float(x), _) if x.is_nan() => Ordering::Greater,
            (_, Number::Float(y)) if y.is_nan() => Ordering::Less,
            (Number::Int(x), Number::Int(y)) => x.cmp(&y),
            (Number::Int(x), Number::Float(y)) => Self::compare_int_float(x, y),
            (Number::Float(x), Number::Int(y)) => Self::compare_int_float(y, x).reverse(),
            (Number::Float(x), Number::Float(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        }
    }

    /// Exact int/float comparison for a non-NaN float.
    fn compare_int_float(int: i64, float: f64) -> Ordering {
        // 2^63, the first float above every i64
        let bound = -(i64::MIN as f64);
        if float >= bound {
            return Ordering::Less;
        }
        if float < i64::MIN as f64 {
            return Ordering::Greater;
        }
        let floor = float.floor();
        match int.cmp(&(floor as i64)) {
            Ordering::Equal if float > floor => Ordering::Less,
            ordering => ordering,
        }
    }

    fn number(value: &Value) -> Option<Number> {
        match value {
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }
}
