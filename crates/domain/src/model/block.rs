// crates/domain/src/model/block.rs

//! Page body blocks and the cards nested inside them.

use crate::content::{content_types as ct, Asset, ContentItem, SystemAttributes};
use crate::model::expand::{Expander, Link};
use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Shared field types
// ─────────────────────────────────────────────────────────────────────────────

/// Rich text HTML plus the components embedded in it, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RichText {
    pub html: String,
    pub components: Vec<Link<Block>>,
}

impl RichText {
    pub fn decode(item: &ContentItem, element: &str, expander: Expander<'_>) -> Self {
        let (html, refs) = item.rich_text(element);
        Self {
            html: html.to_string(),
            components: expander.any_links(refs, Block::decode),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePosition {
    Left,
    Right,
}

// ─────────────────────────────────────────────────────────────────────────────
// Block
// ─────────────────────────────────────────────────────────────────────────────

/// A renderable unit of page body content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub system: SystemAttributes,
    pub kind: BlockKind,
}

/// The closed set of block kinds this site knows how to render.
///
/// `Unknown` keeps the type tag of anything else so content types added in
/// the CMS ahead of code support degrade instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum BlockKind {
    Hero(Hero),
    FeatureGrid(FeatureGrid),
    TextWithImage(TextWithImage),
    Testimonials(Testimonials),
    CallToAction(CallToAction),
    PricingTable(PricingTable),
    ContactForm(ContactForm),
    LogoCloud(LogoCloud),
    Faq(Faq),
    RichText(RichTextBlock),
    Unknown { content_type: String },
}

impl Block {
    /// Decode any item into a block. Never fails: unrecognized types become
    /// `BlockKind::Unknown`.
    pub fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        let kind = match item.content_type() {
            ct::HERO => BlockKind::Hero(Hero::decode(item)),
            ct::FEATURE_GRID => BlockKind::FeatureGrid(FeatureGrid::decode(item, expander)),
            ct::TEXT_WITH_IMAGE => BlockKind::TextWithImage(TextWithImage::decode(item, expander)),
            ct::TESTIMONIALS => BlockKind::Testimonials(Testimonials::decode(item, expander)),
            ct::CALL_TO_ACTION => BlockKind::CallToAction(CallToAction::decode(item, expander)),
            ct::PRICING_TABLE => BlockKind::PricingTable(PricingTable::decode(item, expander)),
            ct::CONTACT_FORM => BlockKind::ContactForm(ContactForm::decode(item, expander)),
            ct::LOGO_CLOUD => BlockKind::LogoCloud(LogoCloud::decode(item)),
            ct::FAQ => BlockKind::Faq(Faq::decode(item, expander)),
            ct::RICH_TEXT_BLOCK => BlockKind::RichText(RichTextBlock::decode(item, expander)),
            other => BlockKind::Unknown {
                content_type: other.to_string(),
            },
        };

        Self {
            system: item.system.clone(),
            kind,
        }
    }

    pub fn content_type(&self) -> &str {
        &self.system.content_type
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block field schemas
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hero {
    pub headline: String,
    pub subheadline: String,
    pub cta_button_label: String,
    pub cta_button_url: String,
    pub background_image: Vec<Asset>,
}

impl Hero {
    fn decode(item: &ContentItem) -> Self {
        Self {
            headline: item.text("headline").to_string(),
            subheadline: item.text("subheadline").to_string(),
            cta_button_label: item.text("cta_button_label").to_string(),
            cta_button_url: item.text("cta_button_url").to_string(),
            background_image: item.assets("background_image").to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureGrid {
    pub title: String,
    pub subtitle: String,
    pub cards: Vec<Link<FeatureCard>>,
}

impl FeatureGrid {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            title: item.text("title").to_string(),
            subtitle: item.text("subtitle").to_string(),
            cards: expander.links(item.linked("cards"), ct::FEATURE_CARD, FeatureCard::decode),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCard {
    pub system: SystemAttributes,
    pub icon: Vec<Asset>,
    pub title: String,
    pub description: RichText,
}

impl FeatureCard {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            system: item.system.clone(),
            icon: item.assets("icon").to_vec(),
            title: item.text("title").to_string(),
            description: RichText::decode(item, "description", expander),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextWithImage {
    pub content: RichText,
    pub image: Vec<Asset>,
    pub image_position: ImagePosition,
}

impl TextWithImage {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        let image_position = if item.first_choice_is("layout", "image_left") {
            ImagePosition::Left
        } else {
            ImagePosition::Right
        };

        Self {
            content: RichText::decode(item, "content", expander),
            image: item.assets("image").to_vec(),
            image_position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Testimonials {
    pub title: String,
    pub cards: Vec<Link<TestimonialCard>>,
}

impl Testimonials {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            title: item.text("title").to_string(),
            cards: expander.links(
                item.linked("cards"),
                ct::TESTIMONIAL_CARD,
                |card, _| TestimonialCard::decode(card),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestimonialCard {
    pub system: SystemAttributes,
    pub quote: String,
    pub author_name: String,
    pub author_role: String,
    pub avatar: Vec<Asset>,
}

impl TestimonialCard {
    fn decode(item: &ContentItem) -> Self {
        Self {
            system: item.system.clone(),
            quote: item.text("quote").to_string(),
            author_name: item.text("author_name").to_string(),
            author_role: item.text("author_role").to_string(),
            avatar: item.assets("avatar").to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallToAction {
    pub headline: String,
    pub body: RichText,
    pub button_label: String,
    pub button_url: String,
}

impl CallToAction {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            headline: item.text("headline").to_string(),
            body: RichText::decode(item, "body", expander),
            button_label: item.text("button_label").to_string(),
            button_url: item.text("button_url").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingTable {
    pub title: String,
    pub subtitle: String,
    pub cards: Vec<Link<PricingCard>>,
}

impl PricingTable {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            title: item.text("title").to_string(),
            subtitle: item.text("subtitle").to_string(),
            cards: expander.links(item.linked("cards"), ct::PRICING_CARD, PricingCard::decode),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingCard {
    pub system: SystemAttributes,
    pub plan_name: String,
    pub price: String,
    pub billing_period: String,
    pub feature_list: RichText,
    pub cta_label: String,
    pub cta_url: String,
    pub is_popular: bool,
}

impl PricingCard {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            system: item.system.clone(),
            plan_name: item.text("plan_name").to_string(),
            price: item.text("price").to_string(),
            billing_period: item.text("billing_period").to_string(),
            feature_list: RichText::decode(item, "feature_list", expander),
            cta_label: item.text("cta_label").to_string(),
            cta_url: item.text("cta_url").to_string(),
            is_popular: item.first_choice_is("is_popular", "yes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactForm {
    pub heading: String,
    pub description: RichText,
    pub success_message: String,
}

impl ContactForm {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            heading: item.text("heading").to_string(),
            description: RichText::decode(item, "description", expander),
            success_message: item.text("success_message").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogoCloud {
    pub title: String,
    pub logos: Vec<Asset>,
}

impl LogoCloud {
    fn decode(item: &ContentItem) -> Self {
        Self {
            title: item.text("title").to_string(),
            logos: item.assets("logos").to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Faq {
    pub title: String,
    pub items: Vec<Link<FaqItem>>,
}

impl Faq {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            title: item.text("title").to_string(),
            items: expander.links(item.linked("items"), ct::FAQ_ITEM, FaqItem::decode),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqItem {
    pub system: SystemAttributes,
    pub question: String,
    pub answer: RichText,
}

impl FaqItem {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            system: item.system.clone(),
            question: item.text("question").to_string(),
            answer: RichText::decode(item, "answer", expander),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichTextBlock {
    pub body: RichText,
}

impl RichTextBlock {
    fn decode(item: &ContentItem, expander: Expander<'_>) -> Self {
        Self {
            body: RichText::decode(item, "body", expander),
        }
    }
}
