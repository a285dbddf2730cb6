//! Partial results of a run and their deep merge.
//!
//! [`ContentDocument`] comes from the content pipeline, [`ImageSet`] from the
//! image pipeline. Both serialize to JSON trees whose section keys line up, so
//! [`MergedDocument::merge`] can overlay the images onto the copy with
//! [`deep_merge`] before the template mapper projects the result.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Button {
    pub name: String,
    pub layout: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Banner {
    pub h1: String,
    pub h2: String,
    pub button: Vec<Button>,
}

/// Heading plus one paragraph (about, secondary blog)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSection {
    pub h2: String,
    pub p: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub h3: String,
    pub p: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogSection {
    pub h2: String,
    pub post: Vec<Post>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub h3: String,
    pub p: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqSection {
    pub h2: String,
    pub question: Vec<Question>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSection {
    pub map_src: String,
}

/// Phone, email and address, in that order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footer {
    pub info: Vec<String>,
}

/// Sections the text service writes in one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageBody {
    pub banner: Banner,
    pub about: TextSection,
    pub blogs: BlogSection,
    pub faq: FaqSection,
    pub blog2: TextSection,
}

impl PageBody {
    /// Read the sections out of any JSON value.
    ///
    /// Total: missing or mistyped fields fall back to their defaults, numbers
    /// and booleans are accepted where text is expected, and numeric strings
    /// where numbers are expected.
    pub fn from_value(value: &Value) -> Self {
        let banner = section(value, "banner");
        let blogs = section(value, "blogs");
        let faq = section(value, "faq");
        Self {
            banner: Banner {
                h1: text_field(banner, "h1"),
                h2: text_field(banner, "h2"),
                button: list_field(banner, "button")
                    .iter()
                    .enumerate()
                    .map(|(i, button)| Button {
                        name: text_field(button, "name"),
                        layout: number_field(button, "layout").unwrap_or(i as u32 + 1),
                    })
                    .collect(),
            },
            about: TextSection::from_value(section(value, "about")),
            blogs: BlogSection {
                h2: text_field(blogs, "h2"),
                post: list_field(blogs, "post")
                    .iter()
                    .map(|post| Post {
                        h3: text_field(post, "h3"),
                        p: text_field(post, "p"),
                    })
                    .collect(),
            },
            faq: FaqSection {
                h2: text_field(faq, "h2"),
                question: list_field(faq, "question")
                    .iter()
                    .map(|question| Question {
                        id: number_field(question, "id"),
                        h3: text_field(question, "h3"),
                        p: text_field(question, "p"),
                    })
                    .collect(),
            },
            blog2: TextSection::from_value(section(value, "blog2")),
        }
    }
}

impl TextSection {
    fn from_value(value: &Value) -> Self {
        Self {
            h2: text_field(value, "h2"),
            p: text_field(value, "p"),
        }
    }
}

fn section<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&Value::Null)
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn number_field(value: &Value, key: &str) -> Option<u32> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn list_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Locally generated contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FooterContent {
    pub map: MapSection,
    pub footer: Footer,
}

/// All copy for one page. Every section key is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDocument {
    pub meta: Meta,
    pub banner: Banner,
    pub about: TextSection,
    pub blogs: BlogSection,
    pub faq: FaqSection,
    pub blog2: TextSection,
    pub map: MapSection,
    pub footer: Footer,
}

impl ContentDocument {
    pub fn assemble(meta: Meta, body: PageBody, footer: FooterContent) -> Self {
        Self {
            meta,
            banner: body.banner,
            about: body.about,
            blogs: body.blogs,
            faq: body.faq,
            blog2: body.blog2,
            map: footer.map,
            footer: footer.footer,
        }
    }
}

/// Page sections that get their own generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSection {
    Banner,
    About,
    Contact,
    SecondaryBlog,
}

impl ImageSection {
    pub const ALL: [ImageSection; 4] = [
        ImageSection::Banner,
        ImageSection::About,
        ImageSection::Contact,
        ImageSection::SecondaryBlog,
    ];

    /// Key of the section in the content tree.
    pub fn key(&self) -> &'static str {
        match self {
            ImageSection::Banner => "banner",
            ImageSection::About => "about",
            ImageSection::Contact => "contactus",
            ImageSection::SecondaryBlog => "blog2",
        }
    }
}

/// Generated images, base64-encoded. A failed image is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    pub logo: String,
    pub banner: String,
    pub about: String,
    pub contact: String,
    pub secondary_blog: String,
    /// Successful gallery images in arrival order
    pub gallery: Vec<String>,
}

impl ImageSet {
    pub const GALLERY_SIZE: usize = 8;

    pub fn section(&self, section: ImageSection) -> &str {
        match section {
            ImageSection::Banner => &self.banner,
            ImageSection::About => &self.about,
            ImageSection::Contact => &self.contact,
            ImageSection::SecondaryBlog => &self.secondary_blog,
        }
    }

    pub fn set_section(&mut self, section: ImageSection, image: String) {
        let slot = match section {
            ImageSection::Banner => &mut self.banner,
            ImageSection::About => &mut self.about,
            ImageSection::Contact => &mut self.contact,
            ImageSection::SecondaryBlog => &mut self.secondary_blog,
        };
        *slot = image;
    }

    /// Tree shaped to overlay a serialized [`ContentDocument`].
    pub fn to_value(&self) -> Value {
        let mut tree = Map::new();
        tree.insert("logo".to_string(), json!({ "image": self.logo }));
        for section in ImageSection::ALL {
            tree.insert(
                section.key().to_string(),
                json!({ "image": self.section(section) }),
            );
        }
        tree.insert("gallery".to_string(), json!({ "image": self.gallery }));
        Value::Object(tree)
    }
}

/// Merge `overrides` into `base`, returning a new tree.
///
/// Objects merge key by key; any other override value replaces what was there.
/// A non-object or empty `overrides` leaves `base` unchanged.
pub fn deep_merge(base: &Value, overrides: &Value) -> Value {
    let overrides = match overrides {
        Value::Object(map) if !map.is_empty() => map,
        _ => return base.clone(),
    };

    let mut merged = match base {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    for (key, value) in overrides {
        let next = match value {
            Value::Object(_) => {
                let existing = merged
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new()));
                deep_merge(&existing, value)
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    Value::Object(merged)
}

/// Copy with images overlaid; input to the template mapper.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDocument(Value);

impl MergedDocument {
    pub fn merge(content: &ContentDocument, images: &ImageSet) -> Result<Self, ApiError> {
        let content = serde_json::to_value(content)?;
        Ok(Self(deep_merge(&content, &images.to_value())))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// String at a JSON pointer, if present.
    pub fn text(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(Value::as_str)
    }

    /// Array at a JSON pointer; empty when absent.
    pub fn list(&self, pointer: &str) -> &[Value] {
        self.0
            .pointer(pointer)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
