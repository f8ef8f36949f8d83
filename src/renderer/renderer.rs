use crate::renderer::layout::*;
use crate::renderer::traits::*;
use crate::renderer::truncate::*;
use crate::value::{Describe, Value};

/// Renders values with a fixed set of options.
pub struct ReprRenderer {
    options: ReprOptions,
}

impl ReprRenderer {
    pub fn new(options: ReprOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReprOptions {
        &self.options
    }

    pub fn render(&self, value: &Value) -> String {
        self.render_node(Node::from(value)).text
    }

    pub fn render_object(&self, object: &dyn Describe) -> String {
        self.render_node(Node::Object(object)).text
    }

    /// Full layout followed by the character budget, with the flags
    /// collected on the way.
    pub fn render_node(&self, node: Node<'_>) -> Rendered {
        let mut rendered = PrettyPrinter::new(&self.options).pformat(node);
        if let Some(max_chars) = self.options.max_chars {
            rendered.text = truncate_nonblank(&rendered.text, max_chars);
        }
        rendered
    }
}

impl Default for ReprRenderer {
    fn default() -> Self {
        Self::new(ReprOptions::default())
    }
}

pub fn render(value: &Value, options: &ReprOptions) -> String {
    ReprRenderer::new(options.clone()).render(value)
}

pub fn render_object(object: &dyn Describe, options: &ReprOptions) -> String {
    ReprRenderer::new(options.clone()).render_object(object)
}

/// One line, no limits.
pub fn repr_flat(value: &Value) -> String {
    Node::from(value).render(&mut RenderContext::new(), 0).text
}
