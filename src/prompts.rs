//! Prompt text sent to the text-generation service.

use crate::provider::ChatMessage;

/// System message prepended to every single-prompt request.
pub const SYSTEM_PERSONA: &str = "You are a web designer whose objective is to identify search engine \
optimized long-tail keywords and write website content that improves a site's visibility, \
drives organic traffic and improves online business performance.";

pub fn industry(topic: &str) -> String {
    format!("Generate an industry for these keywords, no explanation is needed: {topic}")
}

pub fn location(topic: &str) -> String {
    format!(
        "Generate an address (Building number, Street name, Postal Code, City/Town name, State, \
         Country) in one line for these keywords, no explanation is needed: {topic}"
    )
}

pub fn long_tail_keywords(topic: &str) -> String {
    format!("Generate 5 SEO-optimized long-tail keywords related to the topic: {topic}.")
}

pub fn title(company: &str, keyword: &str) -> String {
    format!("Suggest 1 SEO optimized headline about '{keyword}' for the company {company}")
}

pub fn meta_description(topic: &str, keyword: &str) -> String {
    format!(
        "Generate a meta description for a website based on this topic: '{topic}'.\n\
         Use these keywords in the meta description: {keyword}"
    )
}

/// Shape the body response must follow. The pipeline extracts and parses it.
const BODY_FORMAT: &str = r#"{
    "banner": {
        "h1": "...",
        "h2": "...",
        "button": [
            {"name": "...", "layout": 1},
            {"name": "...", "layout": 2}
        ] (pick from: Learn More, Contact Us, Get Started, Sign Up, Subscribe, Shop Now, Book Now, Get Offer, Get Quote, Browse Now, Try It Free, Join Now, Request Demo, Request Quote, Start Free Trial)
    },
    "about": {
        "h2": "About Us",
        "p": "..."
    },
    "blogs": {
        "h2": "... (e.g. Our Services, Customer Reviews, Insights, Resources)",
        "post": [
            {"h3": "...", "p": "..."},
            {"h3": "...", "p": "..."},
            {"h3": "...", "p": "..."}
        ]
    },
    "faq": {
        "h2": "Frequently Asked Questions",
        "question": [
            {"id": 1, "h3": "...", "p": "..."},
            {"id": 2, "h3": "...", "p": "..."},
            {"id": 3, "h3": "...", "p": "..."},
            {"id": 4, "h3": "...", "p": "..."},
            {"id": 5, "h3": "...", "p": "..."}
        ]
    },
    "blog2": {
        "h2": "Our Mission",
        "p": "..."
    }
}"#;

pub fn body_content(company: &str, title: &str, industry: &str, topic: &str, keyword: &str) -> String {
    format!(
        "Create SEO optimized website content with the following specifications:\n\
         Company Name: {company}\n\
         Title: {title}\n\
         Industry: {industry}\n\
         Core Keywords: {topic}\n\
         Keywords: {keyword}\n\
         Format: {BODY_FORMAT}\n\
         Requirements:\n\
         1) The content should be about 700 words long.\n\
         2) The content should be engaging and unique.\n\
         3) The FAQ section should follow the SERP and rich result guidelines."
    )
}

pub fn logo_concept(company: &str, topic: &str, industry: &str) -> String {
    format!(
        "Generate 1 logo concept for my company {company} that incorporates sleek geometric shapes \
         and a modern style, reflecting {topic} and {industry}. Which color scheme would best \
         complement this design? Write it in a few sentences."
    )
}

fn image_request(subject: &str, theme: &str) -> String {
    format!(
        "Generate 1 short paragraph about the detailed description of an image about {subject}. \
         The image should also be about {theme}."
    )
}

/// (subject, theme, description) examples used to steer image descriptions.
const IMAGE_EXAMPLES: &[(&str, &str, &str)] = &[
    (
        "wood cutting carpentry workshop",
        "carpentry workshop",
        "Saw and sawdust, blurred workshop background, 3D, digital art.",
    ),
    (
        "affordable toy oven for children",
        "toy oven",
        "Easy bake oven, toy, bright colors, blurred playroom background, natural lighting.",
    ),
    (
        "top acoustic guitar brands for professionals",
        "acoustic guitar",
        "Fine acoustic guitar, side angle, natural lighting, bioluminescence.",
    ),
    (
        "fish aquarium digital art gallery",
        "fish aquarium digital art",
        "Stained glass window of fish, side angle, rubble, dramatic lighting, light rays, digital art.",
    ),
    (
        "contemporary ergonomic chair design",
        "modern chair",
        "Wide shot of a sleek and modern chair design, highly detailed, beautiful setting in the \
         background, golden hour lighting, ultra realistic.",
    ),
    (
        "trendy modern designer handbags for women",
        "modern designer handbag",
        "Close-up of a modern designer handbag with a beautiful background, photorealistic, \
         magazine editorial.",
    ),
    (
        "luxury vintage-inspired and timeless watch",
        "vintage-inspired timeless design watch",
        "Vintage-inspired watch with an elegant and timeless design, intricate details, detailed \
         lighting, smooth finish, facing the viewer.",
    ),
    (
        "best modern designer lamp design",
        "electrical lighting store",
        "Close-up of a minimalist and contemporary designer lamp with clean lines and detailed \
         lighting, perfect for any contemporary space.",
    ),
    (
        "award winning artistic design for a futuristic concept car",
        "futuristic concept car",
        "Overhead view of a sleek futuristic concept car with aerodynamic curves and a glossy black \
         finish on a winding mountain road, highly detailed, ultra realistic, concept art.",
    ),
    (
        "finest hand-crafted quality sofa",
        "sofa manufacturer",
        "Close-up of a designer hand-crafting a sofa with intricate details, detailed lighting, \
         smooth finish.",
    ),
    (
        "trendy designer sunglasses for summer",
        "sunglasses",
        "Low angle shot of sleek sunglasses with reflective lenses worn by a model on a city street \
         corner with tall buildings in the background, highly detailed, ultra realistic.",
    ),
];

/// Few-shot conversation asking for an image description of `keyword` within `topic`.
pub fn image_description(keyword: &str, topic: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(IMAGE_EXAMPLES.len() * 2 + 2);
    messages.push(ChatMessage::system(SYSTEM_PERSONA));
    for (subject, theme, description) in IMAGE_EXAMPLES {
        messages.push(ChatMessage::user(image_request(subject, theme)));
        messages.push(ChatMessage::assistant(*description));
    }
    messages.push(ChatMessage::user(image_request(keyword, topic)));
    messages
}
