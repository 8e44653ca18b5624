//! Attribute system for render-tree elements
//!
//! Attributes are kept as an ordered `Vec<(String, String)>`: card markup has
//! a fixed attribute order, so insertion order is part of the output contract.

/// Element attributes as ordered key-value pairs
pub type Attrs = Vec<(String, String)>;

/// Extension trait for attribute operations on Attrs
pub trait AttrsExt {
    /// Get an attribute value by name
    fn get_attr(&self, name: &str) -> Option<&str>;

    /// Check if an attribute exists
    fn has_attr(&self, name: &str) -> bool;

    /// Set an attribute value (update in place if present, append if not)
    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>);

    /// Remove an attribute by name, returning the old value if present
    fn remove_attr(&mut self, name: &str) -> Option<String>;
}

impl AttrsExt for Attrs {
    fn get_attr(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_attr(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(attr) = self.iter_mut().find(|(k, _)| k == &name) {
            attr.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }
}

// =============================================================================
// ClassList
// =============================================================================

/// Ordered, de-duplicated `class` attribute builder.
///
/// Cards always start from a fixed base (`kg-card kg-image-card`) and append
/// modifiers in a fixed order, so this never sorts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: Vec<String>,
}

impl ClassList {
    /// Start from a space separated base list.
    pub fn new(base: &str) -> Self {
        let mut list = Self::default();
        for class in base.split_whitespace() {
            list.push(class);
        }
        list
    }

    /// Append a class unless already present.
    pub fn push(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !class.is_empty() && !self.contains(&class) {
            self.classes.push(class);
        }
    }

    /// Append a class only when `condition` holds.
    pub fn push_if(&mut self, condition: bool, class: impl Into<String>) {
        if condition {
            self.push(class);
        }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Space separated attribute value.
    pub fn value(&self) -> String {
        self.classes.join(" ")
    }
}

/// Check whether a raw `class` attribute value contains `class`.
pub fn has_class(value: &str, class: &str) -> bool {
    value.split_whitespace().any(|c| c == class)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrs_operations() {
        let mut attrs: Attrs = Vec::new();

        attrs.set_attr("src", "/image.png");
        attrs.set_attr("class", "kg-image");
        assert_eq!(attrs.len(), 2);

        assert_eq!(attrs.get_attr("src"), Some("/image.png"));
        assert_eq!(attrs.get_attr("alt"), None);
        assert!(attrs.has_attr("class"));

        // Update keeps the original position
        attrs.set_attr("src", "/other.png");
        assert_eq!(attrs[0], ("src".to_string(), "/other.png".to_string()));
        assert_eq!(attrs.len(), 2);

        let removed = attrs.remove_attr("src");
        assert_eq!(removed.as_deref(), Some("/other.png"));
        assert!(!attrs.has_attr("src"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_class_list_order_and_dedup() {
        let mut classes = ClassList::new("kg-card kg-image-card");
        classes.push_if(true, "kg-card-hascaption");
        classes.push_if(false, "kg-width-wide");
        classes.push("kg-card");

        assert_eq!(classes.value(), "kg-card kg-image-card kg-card-hascaption");
    }

    #[test]
    fn test_has_class() {
        assert!(has_class("kg-card  kg-image-card", "kg-image-card"));
        assert!(!has_class("kg-card kg-image-card", "kg-image"));
    }
}
