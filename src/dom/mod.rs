// Minimal mutable document model. The crate targets a static site shell, so
// this models only what the navigation core observes and mutates: ids,
// classes, attributes, text content, child lists, and viewport scroll state.
pub mod parse;
pub mod selector;

pub use selector::Selector;

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) usize);

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub(crate) tag: String,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) text: String,
    pub(crate) children: Vec<ElementId>,
    pub(crate) parent: Option<ElementId>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Element>,
    root: ElementId,
    scroll_y: f64,
    scroll_locked: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let body = Element {
            tag: "body".into(),
            ..Element::default()
        };
        Self {
            nodes: vec![body],
            root: ElementId(0),
            scroll_y: 0.0,
            scroll_locked: false,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.nodes[id.0]
    }

    fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.push(Element {
            tag: tag.into(),
            ..Element::default()
        });
        ElementId(self.nodes.len() - 1)
    }

    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.element_mut(child).parent = Some(parent);
        self.element_mut(parent).children.push(child);
    }

    /// Replaces the element's entire child list. Detached subtrees stay in
    /// the arena but become unreachable, which is fine for a session-lived
    /// document.
    pub fn replace_children(&mut self, parent: ElementId, children: Vec<ElementId>) {
        let old = std::mem::take(&mut self.element_mut(parent).children);
        for id in old {
            self.element_mut(id).parent = None;
        }
        for &id in &children {
            self.element_mut(id).parent = Some(parent);
        }
        self.element_mut(parent).children = children;
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).parent
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.element(id).children
    }

    // Attribute / class / text mutation

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        self.element_mut(id).text = text.into();
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        if name == "id" {
            self.element_mut(id).id = Some(value.into());
        }
        self.element_mut(id).attrs.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, id: ElementId, name: &str) {
        self.element_mut(id).attrs.remove(name);
    }

    pub fn set_id(&mut self, id: ElementId, value: &str) {
        self.set_attr(id, "id", value);
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        let el = self.element_mut(id);
        if !el.classes.iter().any(|c| c == class) {
            el.classes.push(class.into());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.element_mut(id).classes.retain(|c| c != class);
    }

    // Queries

    /// Document-order traversal of every element reachable from the root.
    pub fn walk(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.element(id).children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    pub fn get_element_by_id(&self, id_value: &str) -> Option<ElementId> {
        self.walk()
            .into_iter()
            .find(|&id| self.element(id).id.as_deref() == Some(id_value))
    }

    pub fn select(&self, selector: &Selector) -> Option<ElementId> {
        self.walk()
            .into_iter()
            .find(|&id| selector.matches(self.element(id)))
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.walk()
            .into_iter()
            .filter(|&id| selector.matches(self.element(id)))
            .collect()
    }

    /// Whether `ancestor` contains `id` (inclusive).
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.element(c).parent;
        }
        false
    }

    // Viewport state

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_y = 0.0;
    }

    pub fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }
}
