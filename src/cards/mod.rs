//! Card renderers.
//!
//! One pure function per card type mapping `(payload, dom, options)` to a
//! `<figure>` fragment. A renderer returns `None` when the payload is missing
//! a required field; it never panics on bad payloads.
//!
//! Class lists always start with `kg-card kg-<type>-card`, followed by the
//! modifiers in a fixed order: `kg-card-hascaption`, then the width modifier.

pub mod embed;
pub mod gallery;
pub mod image;
pub mod srcset;

pub use embed::{EmbedPayload, render_embed};
pub use gallery::{GalleryImage, GalleryPayload, render_gallery};
pub use image::{ImagePayload, render_image};
pub use srcset::{SRCSET_RULES, SrcsetRule, build_srcset};

use serde::{Deserialize, Deserializer};

use crate::attr::ClassList;
use crate::dom::Dom;

// =============================================================================
// CardWidth
// =============================================================================

/// Layout width of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardWidth {
    #[default]
    Regular,
    Wide,
    Full,
}

impl CardWidth {
    /// Lenient parse: `""`, `"regular"` and unknown values are all regular.
    pub fn parse(value: &str) -> Self {
        match value {
            "wide" => Self::Wide,
            "full" => Self::Full,
            _ => Self::Regular,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Wide => "wide",
            Self::Full => "full",
        }
    }

    /// Modifier class, `None` for regular width.
    pub fn modifier_class(self) -> Option<&'static str> {
        match self {
            Self::Regular => None,
            Self::Wide => Some("kg-width-wide"),
            Self::Full => Some("kg-width-full"),
        }
    }
}

// =============================================================================
// Shared markup helpers
// =============================================================================

/// Class list for a card root: base classes, caption modifier, width modifier.
pub(crate) fn card_classes(base: &str, caption: &str, width: CardWidth) -> ClassList {
    let mut classes = ClassList::new(base);
    classes.push_if(!caption.is_empty(), "kg-card-hascaption");
    if let Some(modifier) = width.modifier_class() {
        classes.push(modifier);
    }
    classes
}

/// Field deserializer that reads `null` as the field's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Create an element and set its attributes in order.
pub(crate) fn create_with_attrs<D: Dom>(dom: &mut D, tag: &str, attrs: &[(&str, &str)]) -> D::Element {
    let mut element = dom.create_element(tag);
    for (name, value) in attrs {
        dom.set_attribute(&mut element, name, value);
    }
    element
}

/// Append `<figcaption>` with trusted caption HTML when the caption is non-empty.
pub(crate) fn append_caption<D: Dom>(dom: &mut D, figure: &mut D::Element, caption: &str) {
    if caption.is_empty() {
        return;
    }
    let mut figcaption = dom.create_element("figcaption");
    dom.append_raw_html(&mut figcaption, caption);
    dom.append_child(figure, figcaption);
}

/// Wrap `child` in `<a href>` when `href` is non-empty.
pub(crate) fn wrap_in_link<D: Dom>(dom: &mut D, child: D::Element, href: &str) -> D::Element {
    if href.is_empty() {
        return child;
    }
    let mut link = create_with_attrs(dom, "a", &[("href", href)]);
    dom.append_child(&mut link, child);
    link
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_width_modifiers() {
        assert_eq!(CardWidth::parse("").modifier_class(), None);
        assert_eq!(CardWidth::parse("regular").modifier_class(), None);
        assert_eq!(CardWidth::parse("wide").modifier_class(), Some("kg-width-wide"));
        assert_eq!(CardWidth::parse("full").modifier_class(), Some("kg-width-full"));
        assert_eq!(CardWidth::parse("huge"), CardWidth::Regular);
    }

    #[test]
    fn test_card_classes_order() {
        let classes = card_classes("kg-card kg-image-card", "caption", CardWidth::Full);
        assert_eq!(classes.value(), "kg-card kg-image-card kg-card-hascaption kg-width-full");
    }
}
