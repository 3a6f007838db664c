//! 簡易文件樹：頁面以元素樹表示，由 reducer 產生的 patch 修改，最後序列化為 HTML。

use crate::utils::error::{Result, SiteError};

pub const LOADING_PLACEHOLDER: &str = "loading-placeholder";

const VOID_ELEMENTS: [&str; 4] = ["br", "input", "link", "meta"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// 不經跳脫直接輸出的標記（例如內嵌 SVG 圖示）
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(&class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(&name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_raw(mut self, markup: impl Into<String>) -> Self {
        self.children.push(Node::Raw(markup.into()));
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(key, _)| key != name);
        before != self.attributes.len()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn replace_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    /// 等同 DOM 的 textContent 賦值：清空子節點後放入單一文字節點
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => el.collect_text(out),
                Node::Raw(_) => {}
            }
        }
    }

    /// 深度優先搜尋第一個符合條件的元素（包含自己）
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.child_elements().find_map(|el| el.find(pred))
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            Node::Element(el) => el.find_mut(pred),
            _ => None,
        })
    }

    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if pred(self) {
            out.push(self);
        }
        for el in self.child_elements() {
            el.find_all(pred, out);
        }
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_html(&self.classes.join(" "))));
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            match child {
                Node::Element(el) => el.write_html(out),
                Node::Text(text) => out.push_str(&escape_html(text)),
                Node::Raw(markup) => out.push_str(markup),
            }
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// patch 的作用對象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTarget {
    Id(String),
    /// `.service-card[data-title=…] .description`
    CardDescription(String),
    /// 表單內的 `button[type=submit]`，參數為表單 id
    SubmitButton(String),
}

impl NodeTarget {
    pub fn id(id: impl Into<String>) -> Self {
        NodeTarget::Id(id.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomPatch {
    SetText { target: NodeTarget, text: String },
    SetValue { target: NodeTarget, value: String },
    AddClass { target: NodeTarget, class: String },
    RemoveClass { target: NodeTarget, class: String },
    SetAttribute { target: NodeTarget, name: String, value: String },
    RemoveAttribute { target: NodeTarget, name: String },
}

impl DomPatch {
    pub fn target(&self) -> &NodeTarget {
        match self {
            DomPatch::SetText { target, .. }
            | DomPatch::SetValue { target, .. }
            | DomPatch::AddClass { target, .. }
            | DomPatch::RemoveClass { target, .. }
            | DomPatch::SetAttribute { target, .. }
            | DomPatch::RemoveAttribute { target, .. } => target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<&Element> {
        self.root.find(&|el| el.id() == Some(id))
    }

    pub fn get_element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.root.find_mut(&|el| el.id() == Some(id))
    }

    pub fn require(&self, id: &str) -> Result<&Element> {
        self.get_element_by_id(id)
            .ok_or_else(|| SiteError::MissingElementError { id: id.to_string() })
    }

    pub fn require_mut(&mut self, id: &str) -> Result<&mut Element> {
        self.get_element_by_id_mut(id)
            .ok_or_else(|| SiteError::MissingElementError { id: id.to_string() })
    }

    pub fn query_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        self.root.find_all(pred, &mut out);
        out
    }

    pub fn find_card(&self, title: &str) -> Option<&Element> {
        self.root
            .find(&|el| el.has_class("service-card") && el.attr("data-title") == Some(title))
    }

    /// 套用一個 patch，回傳被修改的節點數。卡片找不到時回傳 0，不視為錯誤。
    pub fn apply(&mut self, patch: &DomPatch) -> Result<usize> {
        let Some(el) = self.resolve_mut(patch.target())? else {
            return Ok(0);
        };

        match patch {
            DomPatch::SetText { text, .. } => el.set_text(text.clone()),
            DomPatch::SetValue { value, .. } => {
                if el.tag() == "textarea" {
                    el.set_text(value.clone());
                } else {
                    el.set_attr("value", value.clone());
                }
            }
            DomPatch::AddClass { class, .. } => el.add_class(class),
            DomPatch::RemoveClass { class, .. } => el.remove_class(class),
            DomPatch::SetAttribute { name, value, .. } => el.set_attr(name, value.clone()),
            DomPatch::RemoveAttribute { name, .. } => {
                el.remove_attr(name);
            }
        }
        Ok(1)
    }

    pub fn apply_all(&mut self, patches: &[DomPatch]) -> Result<usize> {
        let mut touched = 0;
        for patch in patches {
            touched += self.apply(patch)?;
        }
        Ok(touched)
    }

    fn resolve_mut(&mut self, target: &NodeTarget) -> Result<Option<&mut Element>> {
        match target {
            NodeTarget::Id(id) => self.require_mut(id).map(Some),
            NodeTarget::CardDescription(title) => {
                let card = self.root.find_mut(&|el| {
                    el.has_class("service-card") && el.attr("data-title") == Some(title.as_str())
                });
                Ok(card.and_then(|card| card.find_mut(&|el| el.has_class("description"))))
            }
            NodeTarget::SubmitButton(form_id) => {
                let form = self.require_mut(form_id)?;
                form.find_mut(&|el| el.tag() == "button" && el.attr("type") == Some("submit"))
                    .map(Some)
                    .ok_or_else(|| SiteError::MissingElementError {
                        id: format!("{} button[type=submit]", form_id),
                    })
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        self.root.write_html(&mut out);
        out.push('\n');
        out
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(
            Element::new("body")
                .with_child(Element::new("p").with_id("tagline").with_class(LOADING_PLACEHOLDER))
                .with_child(
                    Element::new("div").with_id("services-container").with_child(
                        Element::new("div")
                            .with_class("service-card")
                            .with_attr("data-title", "A & B")
                            .with_child(Element::new("h3").with_text("A & B"))
                            .with_child(
                                Element::new("p")
                                    .with_class("description")
                                    .with_class(LOADING_PLACEHOLDER),
                            ),
                    ),
                )
                .with_child(
                    Element::new("form").with_id("contact-form").with_child(
                        Element::new("button").with_attr("type", "submit").with_text("Send"),
                    ),
                ),
        )
    }

    #[test]
    fn test_get_element_by_id() {
        let doc = sample();
        assert_eq!(doc.get_element_by_id("tagline").unwrap().tag(), "p");
        assert!(doc.get_element_by_id("missing").is_none());
        assert!(matches!(
            doc.require("missing"),
            Err(SiteError::MissingElementError { .. })
        ));
    }

    #[test]
    fn test_card_description_patch() {
        let mut doc = sample();
        let target = NodeTarget::CardDescription("A & B".to_string());
        let touched = doc
            .apply_all(&[
                DomPatch::SetText {
                    target: target.clone(),
                    text: "Generated".to_string(),
                },
                DomPatch::RemoveClass {
                    target,
                    class: LOADING_PLACEHOLDER.to_string(),
                },
            ])
            .unwrap();

        assert_eq!(touched, 2);
        let card = doc.find_card("A & B").unwrap();
        let description = card.find(&|el| el.has_class("description")).unwrap();
        assert_eq!(description.text_content(), "Generated");
        assert!(!description.has_class(LOADING_PLACEHOLDER));
    }

    #[test]
    fn test_unknown_card_is_silently_ignored() {
        let mut doc = sample();
        let touched = doc
            .apply(&DomPatch::SetText {
                target: NodeTarget::CardDescription("Nope".to_string()),
                text: "x".to_string(),
            })
            .unwrap();
        assert_eq!(touched, 0);
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let mut doc = sample();
        let result = doc.apply(&DomPatch::AddClass {
            target: NodeTarget::id("nope"),
            class: "invalid".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_submit_button_attribute_patch() {
        let mut doc = sample();
        let target = NodeTarget::SubmitButton("contact-form".to_string());
        doc.apply(&DomPatch::SetAttribute {
            target: target.clone(),
            name: "disabled".to_string(),
            value: "disabled".to_string(),
        })
        .unwrap();

        let form = doc.get_element_by_id("contact-form").unwrap();
        let button = form.find(&|el| el.tag() == "button").unwrap();
        assert_eq!(button.attr("disabled"), Some("disabled"));

        doc.apply(&DomPatch::RemoveAttribute {
            target,
            name: "disabled".to_string(),
        })
        .unwrap();
        let form = doc.get_element_by_id("contact-form").unwrap();
        assert!(form.find(&|el| el.tag() == "button").unwrap().attr("disabled").is_none());
    }

    #[test]
    fn test_html_serialization_escapes_text_but_not_raw() {
        let doc = Document::new(
            Element::new("div")
                .with_attr("data-title", "Renovation & \"Redevelopment\"")
                .with_text("<b>")
                .with_raw("<svg></svg>")
                .with_child(Element::new("input").with_attr("value", "")),
        );
        let html = doc.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("data-title=\"Renovation &amp; &quot;Redevelopment&quot;\""));
        assert!(html.contains("&lt;b&gt;<svg></svg>"));
        assert!(html.contains("<input value=\"\"></div>"));
    }
}
