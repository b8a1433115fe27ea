// Bridge from scraper's parsed HTML into the mutable document arena.
use crate::core::error::{AppError, Result};
use crate::dom::{Document, ElementId};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html};

static BODY_SELECTOR: Lazy<scraper::Selector> =
    Lazy::new(|| scraper::Selector::parse("body").expect("static selector"));

/// Parses a full page shell (an `index.html`) into a fresh document. The
/// shell's `<body>` subtree becomes the document root's children.
pub fn parse_shell(html: &str) -> Result<Document> {
    let parsed = Html::parse_document(html);
    let body = parsed
        .select(&BODY_SELECTOR)
        .next()
        .ok_or_else(|| AppError::Parse("shell document has no <body>".into()))?;

    let mut doc = Document::new();
    let root = doc.root();
    let (children, text) = convert_children(&mut doc, body);
    for child in children {
        doc.append_child(root, child);
    }
    doc.set_text(root, &text);
    Ok(doc)
}

/// Parses an HTML fragment and swaps it in as the target element's entire
/// content. The new subtree is built detached first, so a parse failure
/// leaves the target untouched.
pub fn inject_fragment(doc: &mut Document, target: ElementId, html: &str) -> Result<()> {
    let parsed = Html::parse_fragment(html);
    let root = parsed.root_element();

    let (children, text) = convert_children(doc, root);
    doc.replace_children(target, children);
    doc.set_text(target, &text);
    Ok(())
}

/// Converts an element subtree; direct text is concatenated per element the
/// way `textContent` accumulates it.
fn convert_element(doc: &mut Document, el: ElementRef<'_>) -> ElementId {
    let id = doc.create_element(el.value().name());

    for (name, value) in el.value().attrs() {
        if name == "class" {
            continue;
        }
        doc.set_attr(id, name, value);
    }
    for class in el.value().classes() {
        doc.add_class(id, class);
    }

    let (children, text) = convert_children(doc, el);
    for child in children {
        doc.append_child(id, child);
    }
    doc.set_text(id, &text);
    id
}

fn convert_children(doc: &mut Document, el: ElementRef<'_>) -> (Vec<ElementId>, String) {
    let mut children = Vec::new();
    let mut text = String::new();

    for node in el.children() {
        if let Some(child) = ElementRef::wrap(node) {
            children.push(convert_element(doc, child));
        } else if let Some(t) = node.value().as_text() {
            text.push_str(t);
        }
    }

    (children, text.trim().to_string())
}
