/*!
 * Image tag extraction from legacy HTML content.
 *
 * This is deliberately not an HTML parser: tags are found with a lazy
 * pattern and attributes are read by plain substring search, which is
 * exactly what the legacy content shape needs.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// `<img` up to the first `>` on the same line, with a `src=` inside the tag
static IMG_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<img[^>\n]*?src\s*=[^>\n]*>").unwrap()
});

/// An `<img>` tag found in a content field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Raw tag markup
    pub tag: String,
    /// Byte offset of the tag in the content
    pub start: usize,
}

impl ImageReference {
    /// Byte offset just past the tag
    pub fn end(&self) -> usize {
        self.start + self.tag.len()
    }

    /// Value of the double-quoted `src` attribute
    pub fn src(&self) -> Option<&str> {
        attribute(&self.tag, "src")
    }

    /// Optional presentation attributes of the tag
    pub fn attributes(&self) -> ImageAttributes {
        ImageAttributes::from_tag(&self.tag)
    }
}

/// Presentation attributes carried over to the shortcode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAttributes {
    pub width: Option<String>,
    pub height: Option<String>,
    pub class: Option<String>,
    pub alt: Option<String>,
    pub title: Option<String>,
}

impl ImageAttributes {
    /// Read the attributes from raw tag markup
    pub fn from_tag(tag: &str) -> Self {
        let get = |name: &str| attribute(tag, name).map(str::to_string);
        Self {
            width: get("width"),
            height: get("height"),
            class: get("class"),
            alt: get("alt"),
            title: get("title"),
        }
    }

    /// Present attributes in shortcode order
    pub fn ordered(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("width", &self.width),
            ("height", &self.height),
            ("class", &self.class),
            ("alt", &self.alt),
            ("title", &self.title),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
    }
}

/// Find every image tag in document order
pub fn find_image_tags(content: &str) -> Vec<ImageReference> {
    IMG_TAG_REGEX
        .find_iter(content)
        .map(|m| ImageReference {
            tag: m.as_str().to_string(),
            start: m.start(),
        })
        .collect()
}

/// Text between the first `name="` and the next `"`
///
/// The search is a plain substring match, so `src` also matches inside
/// `data-src="..."` if that comes first.
pub fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", name);
    let (_, rest) = tag.split_once(needle.as_str())?;
    rest.split('"').next()
}
