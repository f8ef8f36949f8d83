use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::value::{Describe, Value};

pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_MAX_ELEMENTS: usize = 30;
pub const DEFAULT_MAX_CHARS: usize = 700;

/// Knobs for a top-level render call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReprOptions {
    /// Nesting level at which containers collapse to `[...]`. `None` or `0`
    /// means unlimited.
    pub max_depth: Option<usize>,
    /// Entries shown per container before `, ...`.
    pub max_elements: Option<usize>,
    /// Approximate budget of non-blank characters for the whole output.
    pub max_chars: Option<usize>,
    pub width: usize,
    pub compact: bool,
}

impl ReprOptions {
    pub fn new() -> Self {
        Self {
            max_depth: None,
            max_elements: Some(DEFAULT_MAX_ELEMENTS),
            max_chars: Some(DEFAULT_MAX_CHARS),
            width: DEFAULT_WIDTH,
            compact: true,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_max_depth(mut self, depth: impl Into<Option<usize>>) -> Self {
        self.max_depth = depth.into();
        self
    }

    pub fn with_max_elements(mut self, count: impl Into<Option<usize>>) -> Self {
        self.max_elements = count.into();
        self
    }

    pub fn with_max_chars(mut self, count: impl Into<Option<usize>>) -> Self {
        self.max_chars = count.into();
        self
    }

    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

impl Default for ReprOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// State for one top-level render call: the identities on the active
/// rendering path plus the limits that apply while walking.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    active: HashSet<usize>,
    pub max_depth: Option<usize>,
    pub max_elements: Option<usize>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: &ReprOptions) -> Self {
        Self {
            active: HashSet::new(),
            max_depth: options.max_depth,
            max_elements: options.max_elements,
        }
    }

    pub fn depth_exhausted(&self, level: usize) -> bool {
        matches!(self.max_depth, Some(max) if max > 0 && level >= max)
    }

    /// How many of `len` entries a container may show.
    pub fn shown(&self, len: usize) -> usize {
        self.max_elements.map_or(len, |max| max.min(len))
    }

    pub fn is_active(&self, id: usize) -> bool {
        self.active.contains(&id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Marks `id` as being rendered until the returned guard drops.
    /// `None` if it is already on the path.
    pub fn enter(&mut self, id: usize) -> Option<Entered<'_>> {
        if self.active.insert(id) {
            Some(Entered { context: self, id })
        } else {
            None
        }
    }
}

/// Scope guard for one frame of the cycle guard.
pub struct Entered<'c> {
    context: &'c mut RenderContext,
    id: usize,
}

impl Deref for Entered<'_> {
    type Target = RenderContext;

    fn deref(&self) -> &RenderContext {
        self.context
    }
}

impl DerefMut for Entered<'_> {
    fn deref_mut(&mut self) -> &mut RenderContext {
        self.context
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.context.active.remove(&self.id);
    }
}

/// Outcome of a single-line render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repr {
    pub text: String,
    pub readable: bool,
    pub recursive: bool,
}

impl Repr {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            readable: true,
            recursive: false,
        }
    }
}

/// Either a value or a borrowed object; the unit the renderers walk.
#[derive(Clone, Copy)]
pub enum Node<'a> {
    Value(&'a Value),
    Object(&'a dyn Describe),
}

impl<'a> Node<'a> {
    pub fn identity(&self) -> Option<usize> {
        match self {
            Node::Value(value) => value.identity(),
            Node::Object(object) => Some(*object as *const _ as *const () as usize),
        }
    }

    pub fn type_name(&self) -> &'a str {
        match *self {
            Node::Value(value) => value.type_name(),
            Node::Object(object) => object.type_name(),
        }
    }
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Object(object) => Node::Object(object.as_ref()),
            other => Node::Value(other),
        }
    }
}

/// Single-line rendering of anything the renderer understands
pub trait Render {
    fn render(&self, context: &mut RenderContext, level: usize) -> Repr;
}
