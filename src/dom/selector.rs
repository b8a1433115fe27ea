// Compound selector matcher for the handful of selector shapes the site
// shell uses: `tag`, `#id`, `.class`, `[attr]`, `[attr="value"]`, and any
// concatenation of those applied to a single element. Combinators are not
// supported; the configured selectors never need them.
use crate::core::error::{AppError, Result};
use crate::dom::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Exists(String),
    Equals(String, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AppError::Parse("empty selector".into()));
        }

        let mut selector = Selector::default();
        let mut chars = input.chars().peekable();

        while let Some(&c) = chars.peek() {
            match c {
                '#' => {
                    chars.next();
                    let name = take_ident(&mut chars);
                    if name.is_empty() {
                        return Err(AppError::Parse(format!("bad id in selector '{}'", input)));
                    }
                    selector.id = Some(name);
                }
                '.' => {
                    chars.next();
                    let name = take_ident(&mut chars);
                    if name.is_empty() {
                        return Err(AppError::Parse(format!("bad class in selector '{}'", input)));
                    }
                    selector.classes.push(name);
                }
                '[' => {
                    chars.next();
                    let mut body = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        body.push(c);
                    }
                    if !closed {
                        return Err(AppError::Parse(format!(
                            "unterminated attribute in selector '{}'",
                            input
                        )));
                    }
                    selector.attrs.push(parse_attr(&body, input)?);
                }
                _ => {
                    let name = take_ident(&mut chars);
                    if name.is_empty() {
                        return Err(AppError::Parse(format!(
                            "unexpected '{}' in selector '{}'",
                            c, input
                        )));
                    }
                    selector.tag = Some(name);
                }
            }
        }

        Ok(selector)
    }

    pub fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if el.tag() != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id() != Some(id.as_str()) {
                return false;
            }
        }
        for class in &self.classes {
            if !el.has_class(class) {
                return false;
            }
        }
        for attr in &self.attrs {
            match attr {
                AttrMatch::Exists(name) => {
                    if el.attr(name).is_none() {
                        return false;
                    }
                }
                AttrMatch::Equals(name, value) => {
                    if el.attr(name) != Some(value.as_str()) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    out
}

fn parse_attr(body: &str, full: &str) -> Result<AttrMatch> {
    match body.split_once('=') {
        None => {
            let name = body.trim();
            if name.is_empty() {
                return Err(AppError::Parse(format!(
                    "empty attribute in selector '{}'",
                    full
                )));
            }
            Ok(AttrMatch::Exists(name.to_string()))
        }
        Some((name, value)) => {
            let name = name.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if name.is_empty() {
                return Err(AppError::Parse(format!(
                    "empty attribute name in selector '{}'",
                    full
                )));
            }
            Ok(AttrMatch::Equals(name.to_string(), value.to_string()))
        }
    }
}
