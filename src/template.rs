//! Template mapper
//!
//! Projects a [`MergedDocument`] onto the fixed ten-block page layout. The
//! projection is total: every block is emitted at its fixed position even when
//! its source sections are missing, in which case the block keeps its template
//! defaults.

use crate::document::{Button, MergedDocument};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of blocks in every layout document.
pub const LAYOUT_BLOCKS: usize = 10;

const CONTACT_HEADING: &str = "Have a question?";
const CONTACT_SUBHEADING: &str = "Contact us today!";
const FOOTER_HEADING: &str = "Contact Info";
const ABOUT_HEADING: &str = "About Us";
const FAQ_HEADING: &str = "Frequently Asked Questions";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub position: u8,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenteredImageBlock {
    pub position: u8,
    pub button: Vec<Button>,
    pub image: String,
    pub h1: String,
    pub h2: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightImageBlock {
    pub position: u8,
    pub h2: String,
    pub paragraph: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogCard {
    pub h2: String,
    pub paragraph: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeBlogsBlock {
    pub position: u8,
    pub h2: String,
    pub blogs: Vec<BlogCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUsBlock {
    pub position: u8,
    pub h1: String,
    pub h4: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub h3: String,
    pub paragraph: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqBlock {
    pub position: u8,
    pub h2: String,
    #[serde(rename = "Faq")]
    pub faq: Vec<FaqEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryBlock {
    pub position: u8,
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapBlock {
    pub position: u8,
    pub map_src: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterBlock {
    pub position: u8,
    pub h1: String,
    pub paragraph: Vec<String>,
    pub image: String,
}

/// One block of the page, serialized as `{"layout": <tag>, "value": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", content = "value")]
pub enum LayoutBlock {
    #[serde(rename = "Layout_header_1")]
    Header(HeaderBlock),
    #[serde(rename = "Layout_centered_image_1")]
    CenteredImage(CenteredImageBlock),
    #[serde(rename = "Layout_right_image_1")]
    About(RightImageBlock),
    #[serde(rename = "Layout_three_blogs_1")]
    ThreeBlogs(ThreeBlogsBlock),
    #[serde(rename = "Layout_contact_us_1")]
    ContactUs(ContactUsBlock),
    #[serde(rename = "Layout_frequently_asked_questions_1")]
    Faq(FaqBlock),
    #[serde(rename = "Layout_gallery_1")]
    Gallery(GalleryBlock),
    #[serde(rename = "Layout_right_image_2")]
    SecondaryBlog(RightImageBlock),
    #[serde(rename = "Layout_map_1")]
    Map(MapBlock),
    #[serde(rename = "Layout_footer_1")]
    Footer(FooterBlock),
}

impl LayoutBlock {
    pub fn position(&self) -> u8 {
        match self {
            LayoutBlock::Header(b) => b.position,
            LayoutBlock::CenteredImage(b) => b.position,
            LayoutBlock::About(b) | LayoutBlock::SecondaryBlog(b) => b.position,
            LayoutBlock::ThreeBlogs(b) => b.position,
            LayoutBlock::ContactUs(b) => b.position,
            LayoutBlock::Faq(b) => b.position,
            LayoutBlock::Gallery(b) => b.position,
            LayoutBlock::Map(b) => b.position,
            LayoutBlock::Footer(b) => b.position,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            LayoutBlock::Header(_) => "Layout_header_1",
            LayoutBlock::CenteredImage(_) => "Layout_centered_image_1",
            LayoutBlock::About(_) => "Layout_right_image_1",
            LayoutBlock::ThreeBlogs(_) => "Layout_three_blogs_1",
            LayoutBlock::ContactUs(_) => "Layout_contact_us_1",
            LayoutBlock::Faq(_) => "Layout_frequently_asked_questions_1",
            LayoutBlock::Gallery(_) => "Layout_gallery_1",
            LayoutBlock::SecondaryBlog(_) => "Layout_right_image_2",
            LayoutBlock::Map(_) => "Layout_map_1",
            LayoutBlock::Footer(_) => "Layout_footer_1",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    pub title: String,
    pub description: String,
}

/// Final artifact: the ordered layout plus page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDocument {
    pub layouts: Vec<LayoutBlock>,
    pub meta_data: MetaData,
}

/// Map the merged document onto the page layout.
pub fn project(document: &MergedDocument) -> SiteDocument {
    let text = |pointer: &str, default: &str| -> String {
        document.text(pointer).unwrap_or(default).to_string()
    };
    let present = |pointer: &str| document.as_value().pointer(pointer).is_some();
    let logo = text("/logo/image", "");

    let button = if present("/banner/button") {
        document
            .list("/banner/button")
            .iter()
            .enumerate()
            .map(|(i, b)| Button {
                name: str_field(b, "name"),
                layout: b
                    .get("layout")
                    .and_then(Value::as_u64)
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or(i as u32 + 1),
            })
            .collect()
    } else {
        (1..=2)
            .map(|layout| Button {
                name: String::new(),
                layout,
            })
            .collect()
    };

    let blogs = if present("/blogs/post") {
        document
            .list("/blogs/post")
            .iter()
            .map(|post| BlogCard {
                h2: str_field(post, "h3"),
                paragraph: str_field(post, "p"),
            })
            .collect()
    } else {
        vec![BlogCard::default(); 3]
    };

    let faq = if present("/faq/question") {
        document
            .list("/faq/question")
            .iter()
            .map(|q| FaqEntry {
                h3: str_field(q, "h3"),
                paragraph: str_field(q, "p"),
            })
            .collect()
    } else {
        vec![FaqEntry::default()]
    };

    let images = if present("/gallery/image") {
        document
            .list("/gallery/image")
            .iter()
            .map(|image| GalleryImage {
                url: image.as_str().unwrap_or_default().to_string(),
                alt: String::new(),
            })
            .collect()
    } else {
        vec![GalleryImage::default()]
    };

    let footer = if present("/footer/info") {
        document
            .list("/footer/info")
            .iter()
            .map(|line| line.as_str().unwrap_or_default().to_string())
            .collect()
    } else {
        vec![String::new(); 3]
    };

    let layouts = vec![
        LayoutBlock::Header(HeaderBlock {
            position: 0,
            image: logo.clone(),
        }),
        LayoutBlock::CenteredImage(CenteredImageBlock {
            position: 1,
            button,
            image: text("/banner/image", ""),
            h1: text("/banner/h1", ""),
            h2: text("/banner/h2", ""),
        }),
        LayoutBlock::About(RightImageBlock {
            position: 2,
            h2: text("/about/h2", ABOUT_HEADING),
            paragraph: text("/about/p", ""),
            image: text("/about/image", ""),
        }),
        LayoutBlock::ThreeBlogs(ThreeBlogsBlock {
            position: 3,
            h2: text("/blogs/h2", ""),
            blogs,
        }),
        LayoutBlock::ContactUs(ContactUsBlock {
            position: 4,
            h1: CONTACT_HEADING.to_string(),
            h4: CONTACT_SUBHEADING.to_string(),
            image: text("/contactus/image", ""),
        }),
        LayoutBlock::Faq(FaqBlock {
            position: 5,
            h2: text("/faq/h2", FAQ_HEADING),
            faq,
        }),
        LayoutBlock::Gallery(GalleryBlock {
            position: 6,
            images,
        }),
        LayoutBlock::SecondaryBlog(RightImageBlock {
            position: 7,
            h2: text("/blog2/h2", ""),
            paragraph: text("/blog2/p", ""),
            image: text("/blog2/image", ""),
        }),
        LayoutBlock::Map(MapBlock {
            position: 8,
            map_src: text("/map/map_src", ""),
        }),
        LayoutBlock::Footer(FooterBlock {
            position: 9,
            h1: FOOTER_HEADING.to_string(),
            paragraph: footer,
            image: logo,
        }),
    ];

    SiteDocument {
        layouts,
        meta_data: MetaData {
            title: text("/meta/title", ""),
            description: text("/meta/description", ""),
        },
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
