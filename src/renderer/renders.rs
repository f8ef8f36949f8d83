use tracing::trace;

use crate::renderer::components::*;
use crate::renderer::traits::*;
use crate::value::{Describe, Value};

/// Accumulates child renderings and their flags.
struct Components {
    parts: Vec<String>,
    readable: bool,
    recursive: bool,
}

impl Components {
    fn new() -> Self {
        Self {
            parts: Vec::new(),
            readable: true,
            recursive: false,
        }
    }

    fn absorb(&mut self, repr: &Repr) {
        self.readable &= repr.readable;
        self.recursive |= repr.recursive;
    }

    fn finish(mut self, open: &str, close: &str, truncated: bool) -> Repr {
        if truncated {
            self.parts.push("...".to_string());
        }
        Repr {
            text: format!("{}{}{}", open, self.parts.join(", "), close),
            readable: self.readable,
            recursive: self.recursive,
        }
    }
}

/// Shared prologue for containers: depth limit first, then the cycle guard.
/// `expand` runs with the identity registered and the level advanced.
fn render_container(
    context: &mut RenderContext,
    id: usize,
    level: usize,
    type_name: &str,
    placeholder: &str,
    expand: impl FnOnce(&mut RenderContext, usize) -> Repr,
) -> Repr {
    if context.depth_exhausted(level) {
        return Repr {
            text: placeholder.to_string(),
            readable: false,
            recursive: context.is_active(id),
        };
    }

    match context.enter(id) {
        Some(mut entered) => expand(&mut entered, level + 1),
        None => {
            trace!(type_name, "recursion detected");
            Repr {
                text: recursion_marker(type_name),
                readable: false,
                recursive: true,
            }
        }
    }
}

impl Render for Value {
    fn render(&self, context: &mut RenderContext, level: usize) -> Repr {
        let literals = LiteralRenderer;
        let id = self.identity().unwrap_or_default();
        match self {
            Value::None => Repr::literal("None"),
            Value::Bool(b) => Repr::literal(literals.render_bool(*b)),
            Value::Int(i) => Repr::literal(i.to_string()),
            Value::Float(f) => Repr::literal(literals.render_float(*f)),
            Value::Str(s) => Repr::literal(literals.render_str(s)),
            Value::Dict(entries) => {
                let entries = entries.borrow();
                if entries.is_empty() {
                    return Repr::literal("{}");
                }
                render_container(context, id, level, "dict", "{...}", |context, level| {
                    let sorted = KeyOrdering.sorted(&entries);
                    let shown = context.shown(sorted.len());
                    let mut components = Components::new();
                    for (key, value) in sorted.iter().take(shown).map(|entry| (&entry.0, &entry.1)) {
                        let key = key.render(context, level);
                        let value = value.render(context, level);
                        components.absorb(&key);
                        components.absorb(&value);
                        components.parts.push(format!("{}: {}", key.text, value.text));
                    }
                    components.finish("{", "}", shown < sorted.len())
                })
            }
            Value::List(items) => {
                let items = items.borrow();
                if items.is_empty() {
                    return Repr::literal("[]");
                }
                render_container(context, id, level, "list", "[...]", |context, level| {
                    render_items(&items, context, level).finish_with("[", "]")
                })
            }
            Value::Tuple(items) => {
                let (open, close) = match items.len() {
                    0 => return Repr::literal("()"),
                    1 => ("(", ",)"),
                    _ => ("(", ")"),
                };
                let placeholder = format!("{}...{}", open, close);
                render_container(context, id, level, "tuple", &placeholder, |context, level| {
                    render_items(items, context, level).finish_with(open, close)
                })
            }
            Value::Object(object) => object.as_ref().render(context, level),
            Value::Opaque(text) => Repr {
                text: text.clone(),
                readable: !text.is_empty() && !text.starts_with('<'),
                recursive: false,
            },
        }
    }
}

struct Items {
    components: Components,
    truncated: bool,
}

impl Items {
    fn finish_with(self, open: &str, close: &str) -> Repr {
        self.components.finish(open, close, self.truncated)
    }
}

fn render_items(items: &[Value], context: &mut RenderContext, level: usize) -> Items {
    let shown = context.shown(items.len());
    let mut components = Components::new();
    for item in &items[..shown] {
        let repr = item.render(context, level);
        components.absorb(&repr);
        components.parts.push(repr.text);
    }
    Items {
        components,
        truncated: shown < items.len(),
    }
}

impl<'a> Render for dyn Describe + 'a {
    fn render(&self, context: &mut RenderContext, level: usize) -> Repr {
        let id = self as *const _ as *const () as usize;
        let type_name = self.type_name();
        // Objects at the depth limit collapse like a dict.
        render_container(context, id, level, type_name, "{...}", |context, level| {
            let literals = LiteralRenderer;
            let params = self.params();
            let shown = context.shown(params.len());
            let mut components = Components::new();
            for (key, value) in params.iter().take(shown) {
                let value = value.render(context, level);
                components.absorb(&value);
                components
                    .parts
                    .push(format!("{}={}", literals.render_keyword(key), value.text));
            }
            let open = format!("{}(", type_name);
            components.finish(&open, ")", shown < params.len())
        })
    }
}

impl Render for Node<'_> {
    fn render(&self, context: &mut RenderContext, level: usize) -> Repr {
        match *self {
            Node::Value(value) => value.render(context, level),
            Node::Object(object) => object.render(context, level),
        }
    }
}
