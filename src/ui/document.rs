//! Arena-backed markup tree the renderer builds into.
//!
//! Elements are addressed by [`ElementId`] so interaction bindings can refer
//! to them and single cells can be re-rendered in place. Detached elements
//! stay in the arena; they are simply unreachable from the root.

use indexmap::IndexMap;

use crate::ui::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(ElementId),
    Text(Span),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    attrs: IndexMap<String, String>,
    classes: Vec<String>,
    children: Vec<Child>,
    parent: Option<ElementId>,
    hidden: bool,
}

impl Element {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: IndexMap::new(),
            classes: Vec::new(),
            children: Vec::new(),
            parent: None,
            hidden: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut root = Element::new("div");
        root.classes.push("schemagrid".to_string());
        Self {
            elements: vec![root],
        }
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Drops everything but an empty root.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Creates a detached element.
    pub fn create(&mut self, tag: &'static str) -> ElementId {
        self.elements.push(Element::new(tag));
        ElementId(self.elements.len() - 1)
    }

    /// Creates an element and appends it to `parent`.
    pub fn create_in(&mut self, parent: ElementId, tag: &'static str) -> ElementId {
        let id = self.create(tag);
        self.append(parent, id);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn append(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.elements[child.0].parent = Some(parent);
        self.elements[parent.0].children.push(Child::Element(child));
    }

    /// Like [`append`](Self::append) but inserts before the existing children.
    pub fn prepend(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.elements[child.0].parent = Some(parent);
        self.elements[parent.0].children.insert(0, Child::Element(child));
    }

    pub fn append_text(&mut self, parent: ElementId, text: impl Into<String>) {
        self.append_span(parent, Span::new(text));
    }

    pub fn append_span(&mut self, parent: ElementId, span: Span) {
        self.elements[parent.0].children.push(Child::Text(span));
    }

    /// Removes `id` from its parent's children. No-op for detached elements.
    pub fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.elements[id.0].parent.take() else {
            return;
        };
        self.elements[parent.0]
            .children
            .retain(|child| *child != Child::Element(id));
    }

    pub fn clear_children(&mut self, id: ElementId) {
        let children = std::mem::take(&mut self.elements[id.0].children);
        for child in children {
            if let Child::Element(child) = child {
                self.elements[child.0].parent = None;
            }
        }
    }

    pub fn children(&self, id: ElementId) -> &[Child] {
        self.elements[id.0].children.as_slice()
    }

    pub fn child_elements(&self, id: ElementId) -> Vec<ElementId> {
        self.children(id)
            .iter()
            .filter_map(|child| match child {
                Child::Element(id) => Some(*id),
                Child::Text(_) => None,
            })
            .collect()
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id.0)?.parent
    }

    /// `id` followed by each ancestor up to its topmost element.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(Some(id), move |current| self.parent(*current))
    }

    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        self.ancestors(id).any(|current| current == ancestor)
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        self.contains(self.root(), id)
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        self.elements[id.0].attrs.insert(name.to_string(), value.into());
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements.get(id.0)?.attrs.get(name).map(String::as_str)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        let classes = &mut self.elements[id.0].classes;
        if !classes.iter().any(|existing| existing == class) {
            classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.elements[id.0].classes.retain(|existing| existing != class);
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(id.0)
            .is_some_and(|element| element.classes.iter().any(|existing| existing == class))
    }

    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        self.elements[id.0].hidden = hidden;
    }

    pub fn is_hidden(&self, id: ElementId) -> bool {
        self.elements.get(id.0).is_some_and(|element| element.hidden)
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: ElementId, out: &mut String) {
        for child in self.children(id) {
            match child {
                Child::Text(span) => out.push_str(&span.text),
                Child::Element(child) => self.collect_text(*child, out),
            }
        }
    }

    /// Attached elements carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.visit(self.root(), &mut |doc, id| {
            if doc.has_class(id, class) {
                out.push(id);
            }
        });
        out
    }

    /// Attached descendants of `scope` (inclusive) with the given tag.
    pub fn find_by_tag(&self, scope: ElementId, tag: &str) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.visit(scope, &mut |doc, id| {
            if doc.elements[id.0].tag == tag {
                out.push(id);
            }
        });
        out
    }

    fn visit(&self, id: ElementId, f: &mut impl FnMut(&Self, ElementId)) {
        f(self, id);
        for child in self.child_elements(id) {
            self.visit(child, f);
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root(), &mut out);
        out
    }

    pub fn write_html(&self, id: ElementId, out: &mut String) {
        let element = &self.elements[id.0];
        out.push('<');
        out.push_str(element.tag);
        if !element.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape(&element.classes.join(" ")));
            out.push('"');
        }
        for (name, value) in &element.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        if element.hidden {
            out.push_str(" hidden");
        }
        out.push('>');

        if is_void(element.tag) {
            return;
        }

        for child in &element.children {
            match child {
                Child::Text(span) if span.style.is_plain() => out.push_str(&escape(&span.text)),
                Child::Text(span) => {
                    out.push_str("<span class=\"");
                    out.push_str(&span.style.classes());
                    out.push_str("\">");
                    out.push_str(&escape(&span.text));
                    out.push_str("</span>");
                }
                Child::Element(child) => self.write_html(*child, out),
            }
        }
        out.push_str("</");
        out.push_str(element.tag);
        out.push('>');
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "hr")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
