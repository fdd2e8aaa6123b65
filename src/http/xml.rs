//! Owned XML element tree for response bodies.

use anyhow::Result;

use super::error::HttpError;

/// An XML element with its attributes, direct text and child elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Concatenated text directly inside this element, trimmed.
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Parses a document and returns its root element.
    pub fn parse(document: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(document)
            .map_err(|e| HttpError::parse(format!("invalid XML: {}", e)))?;
        Ok(Self::from_element(doc.root_element()))
    }

    fn from_element(node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();

        let text = node
            .children()
            .filter(|c| c.is_text())
            .filter_map(|c| c.text())
            .collect::<String>()
            .trim()
            .to_string();

        let children = node
            .children()
            .filter(|c| c.is_element())
            .map(Self::from_element)
            .collect();

        Self {
            name: node.tag_name().name().to_string(),
            attributes,
            text,
            children,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First child element called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let root = XmlNode::parse(
            r#"<?xml version="1.0"?>
            <slideshow title="Sample" author="Yours Truly">
                <slide type="all"><title>Wake up</title></slide>
                <slide type="all"><title>Overview</title><item>Why</item></slide>
            </slideshow>"#,
        )
        .unwrap();

        assert_eq!(root.name, "slideshow");
        assert_eq!(root.attribute("title"), Some("Sample"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children_named("slide").count(), 2);

        let second = &root.children[1];
        assert_eq!(second.child("title").unwrap().text, "Overview");
        assert_eq!(second.child("item").unwrap().text, "Why");
        assert_eq!(root.text, "");
    }

    #[test]
    fn test_parse_invalid_document() {
        let err = XmlNode::parse("<open>").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HttpError>(),
            Some(HttpError::Parse(_))
        ));
    }
}
