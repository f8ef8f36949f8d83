//! Multi-line layout.
//!
//! A value is first rendered flat. If that does not fit in what is left of
//! the line, containers and objects are broken up: children are packed onto
//! lines greedily (compact mode) and anything wider than a whole line is laid
//! out recursively on its own line.

use crate::renderer::components::*;
use crate::renderer::traits::*;
use crate::value::{Describe, Value};

/// Result of a full layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub readable: bool,
    pub recursive: bool,
}

struct Sink {
    output: String,
    readable: bool,
    recursive: bool,
}

impl Sink {
    fn new() -> Self {
        Self {
            output: String::new(),
            readable: true,
            recursive: false,
        }
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn note(&mut self, repr: &Repr) {
        self.readable &= repr.readable;
        self.recursive |= repr.recursive;
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryStyle {
    /// `key: value`
    Dict,
    /// `key=value`, key quotes stripped
    Params,
}

impl EntryStyle {
    fn separator(self) -> &'static str {
        match self {
            EntryStyle::Dict => ": ",
            EntryStyle::Params => "=",
        }
    }

    fn key(self, literal: String) -> String {
        match self {
            EntryStyle::Dict => literal,
            EntryStyle::Params => LiteralRenderer.strip_quotes(&literal).to_string(),
        }
    }
}

fn char_len(text: &str) -> isize {
    text.chars().count() as isize
}

pub struct PrettyPrinter {
    width: usize,
    compact: bool,
    indent_at_name: bool,
    max_depth: Option<usize>,
    max_elements: Option<usize>,
}

impl PrettyPrinter {
    pub fn new(options: &ReprOptions) -> Self {
        Self {
            width: options.width,
            compact: options.compact,
            indent_at_name: true,
            max_depth: options.max_depth,
            max_elements: options.max_elements,
        }
    }

    pub fn pformat(&self, node: Node<'_>) -> Rendered {
        let mut sink = Sink::new();
        let mut context = RenderContext::new();
        context.max_depth = self.max_depth;
        context.max_elements = self.max_elements;

        self.format(node, &mut sink, 0, 0, &mut context, 0);

        Rendered {
            text: sink.output,
            readable: sink.readable,
            recursive: sink.recursive,
        }
    }

    fn flat(&self, node: Node<'_>, sink: &mut Sink, context: &mut RenderContext, level: usize) -> String {
        let repr = node.render(context, level);
        sink.note(&repr);
        repr.text
    }

    fn format(
        &self,
        node: Node<'_>,
        sink: &mut Sink,
        indent: usize,
        allowance: usize,
        context: &mut RenderContext,
        level: usize,
    ) {
        let identity = node.identity();
        if let Some(id) = identity {
            if context.is_active(id) {
                sink.write(&recursion_marker(node.type_name()));
                sink.recursive = true;
                sink.readable = false;
                return;
            }
        }

        let rep = self.flat(node, sink, context, level);
        let max_width = self.width as isize - indent as isize - allowance as isize;
        if char_len(&rep) > max_width {
            if let Node::Value(Value::Str(text)) = node {
                self.format_str(text, sink, indent, allowance, level + 1);
                return;
            }
            if let Some(id) = identity {
                if let Some(mut entered) = context.enter(id) {
                    self.format_expanded(node, rep, sink, indent, allowance, &mut entered, level + 1);
                    return;
                }
            }
        }
        sink.write(&rep);
    }

    #[allow(clippy::too_many_arguments)]
    fn format_expanded(
        &self,
        node: Node<'_>,
        rep: String,
        sink: &mut Sink,
        indent: usize,
        allowance: usize,
        context: &mut RenderContext,
        level: usize,
    ) {
        match node {
            Node::Object(object) => {
                self.format_object(object, sink, indent, allowance, context, level)
            }
            Node::Value(Value::Object(object)) => {
                self.format_object(object.as_ref(), sink, indent, allowance, context, level)
            }
            Node::Value(Value::Dict(entries)) => {
                sink.write("{");
                let entries = entries.borrow();
                if !entries.is_empty() {
                    let sorted: Vec<(&Value, &Value)> = KeyOrdering
                        .sorted(&entries)
                        .into_iter()
                        .map(|entry| (&entry.0, &entry.1))
                        .collect();
                    self.format_entries(&sorted, EntryStyle::Dict, sink, indent, allowance + 1, context, level);
                }
                sink.write("}");
            }
            Node::Value(Value::List(items)) => {
                sink.write("[");
                self.format_items(&items.borrow(), sink, indent, allowance + 1, context, level);
                sink.write("]");
            }
            Node::Value(Value::Tuple(items)) => {
                let endchar = if items.len() == 1 { ",)" } else { ")" };
                sink.write("(");
                self.format_items(items, sink, indent, allowance + endchar.len(), context, level);
                sink.write(endchar);
            }
            Node::Value(_) => sink.write(&rep),
        }
    }

    /// A string too wide for its line, split after whitespace into adjacent
    /// literals. Line breaks inside the string always end a piece. At the top
    /// level the pieces are wrapped in parentheses.
    fn format_str(
        &self,
        text: &str,
        sink: &mut Sink,
        indent: usize,
        allowance: usize,
        level: usize,
    ) {
        let literals = LiteralRenderer;
        let top = level == 1;
        let (indent, allowance) = if top {
            (indent + 1, allowance as isize + 1)
        } else {
            (indent, allowance as isize)
        };
        let max_width = self.width as isize - indent as isize;

        let lines = split_lines(text);
        let mut chunks = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let last_line = i + 1 == lines.len();
            let rep = literals.render_str(line);
            let line_width = if last_line { max_width - allowance } else { max_width };
            if char_len(&rep) <= line_width {
                chunks.push(rep);
                continue;
            }

            let parts = word_parts(line);
            let mut current = String::new();
            for (j, part) in parts.iter().enumerate() {
                let candidate = format!("{}{}", current, part);
                let part_width = if last_line && j + 1 == parts.len() {
                    max_width - allowance
                } else {
                    max_width
                };
                if char_len(&literals.render_str(&candidate)) > part_width {
                    if !current.is_empty() {
                        chunks.push(literals.render_str(&current));
                    }
                    current = part.to_string();
                } else {
                    current = candidate;
                }
            }
            if !current.is_empty() {
                chunks.push(literals.render_str(&current));
            }
        }

        if chunks.len() <= 1 {
            sink.write(&literals.render_str(text));
            return;
        }

        let separator = format!("\n{}", " ".repeat(indent));
        if top {
            sink.write("(");
        }
        sink.write(&chunks.join(&separator));
        if top {
            sink.write(")");
        }
    }

    fn format_object(
        &self,
        object: &dyn Describe,
        sink: &mut Sink,
        indent: usize,
        allowance: usize,
        context: &mut RenderContext,
        level: usize,
    ) {
        let name = object.type_name();
        sink.write(name);
        sink.write("(");
        let indent = if self.indent_at_name {
            indent + name.chars().count()
        } else {
            indent
        };

        let params = object.params();
        let keys: Vec<Value> = params.keys().map(|key| Value::Str(key.clone())).collect();
        let entries: Vec<(&Value, &Value)> = keys.iter().zip(params.values()).collect();
        self.format_entries(&entries, EntryStyle::Params, sink, indent, allowance + 1, context, level);
        sink.write(")");
    }

    fn format_items(
        &self,
        items: &[Value],
        sink: &mut Sink,
        indent: usize,
        allowance: usize,
        context: &mut RenderContext,
        level: usize,
    ) {
        self.format_run(
            items,
            sink,
            indent,
            allowance,
            context,
            |item, sink, context| self.flat(Node::from(item), sink, context, level),
            |item, sink, indent, allowance, context| {
                self.format(Node::from(item), sink, indent, allowance, context, level)
            },
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn format_entries(
        &self,
        entries: &[(&Value, &Value)],
        style: EntryStyle,
        sink: &mut Sink,
        indent: usize,
        allowance: usize,
        context: &mut RenderContext,
        level: usize,
    ) {
        self.format_run(
            entries,
            sink,
            indent,
            allowance,
            context,
            |(key, value), sink, context| {
                let key = style.key(self.flat(Node::from(*key), sink, context, level));
                let value = self.flat(Node::from(*value), sink, context, level);
                format!("{}{}{}", key, style.separator(), value)
            },
            |(key, value), sink, indent, allowance, context| {
                self.format_entry(key, value, style, sink, indent, allowance, context, level + 1)
            },
        );
    }

    /// An entry too wide for one line: key inline, value laid out after it.
    #[allow(clippy::too_many_arguments)]
    fn format_entry(
        &self,
        key: &Value,
        value: &Value,
        style: EntryStyle,
        sink: &mut Sink,
        indent: usize,
        allowance: usize,
        context: &mut RenderContext,
        level: usize,
    ) {
        let key = style.key(self.flat(Node::from(key), sink, context, level));
        let separator = style.separator();
        sink.write(&key);
        sink.write(separator);
        let indent = indent + key.chars().count() + separator.len();
        self.format(Node::from(value), sink, indent, allowance, context, level);
    }

    /// Greedy line filling shared by sequences, dicts and parameters.
    ///
    /// `flat` renders an item on one line; `full` lays it out when it does
    /// not fit a whole line. The last item reserves `allowance` columns for
    /// the closing punctuation.
    #[allow(clippy::too_many_arguments)]
    fn format_run<T>(
        &self,
        items: &[T],
        sink: &mut Sink,
        indent: usize,
        allowance: usize,
        context: &mut RenderContext,
        flat: impl Fn(&T, &mut Sink, &mut RenderContext) -> String,
        full: impl Fn(&T, &mut Sink, usize, usize, &mut RenderContext),
    ) {
        let indent = indent + 1;
        let newline_delim = format!(",\n{}", " ".repeat(indent));
        let mut delim: &str = "";
        let mut max_width = self.width as isize - indent as isize + 1;
        let mut width = max_width;

        for (index, item) in items.iter().enumerate() {
            if self.max_elements == Some(index) {
                sink.write(if index == 0 { "..." } else { ", ..." });
                break;
            }

            let last = index + 1 == items.len();
            if last {
                max_width -= allowance as isize;
                width -= allowance as isize;
            }

            if self.compact {
                let rep = flat(item, sink, context);
                let w = char_len(&rep) + 2;
                if width < w {
                    width = max_width;
                    if !delim.is_empty() {
                        delim = &newline_delim;
                    }
                }
                if width >= w {
                    width -= w;
                    sink.write(delim);
                    delim = ", ";
                    sink.write(&rep);
                    continue;
                }
            }

            sink.write(delim);
            delim = &newline_delim;
            full(item, sink, indent, if last { allowance } else { 1 }, context);
        }
    }
}

/// Splits after each line boundary, keeping the boundary with its line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        let end = match c {
            '\r' => match chars.peek() {
                Some(&(next, '\n')) => {
                    chars.next();
                    next + 1
                }
                _ => index + 1,
            },
            '\n' | '\u{b}' | '\u{c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}' => index + c.len_utf8(),
            _ => continue,
        };
        lines.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Runs of non-blank characters, each followed by the blanks after it.
fn word_parts(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_blank = false;
    for (index, c) in line.char_indices() {
        if c.is_whitespace() {
            in_blank = true;
        } else if in_blank {
            parts.push(&line[start..index]);
            start = index;
            in_blank = false;
        }
    }
    if start < line.len() {
        parts.push(&line[start..]);
    }
    parts
}
