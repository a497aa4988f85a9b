// crates/domain/src/content.rs

//! Wire-level content items, shaped like the Delivery API returns them.
//!
//! Every fetched item carries `system` attributes plus a map of elements
//! keyed by element codename. Linked items come back separately, in a flat
//! `modular_content` arena keyed by codename; the order of that arena means
//! nothing, only the referencing element's list order does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Content type codenames known to this site.
pub mod content_types {
    pub const NAVIGATION_ITEM: &str = "navigation_item";
    pub const FOOTER_COLUMN: &str = "footer_column";
    pub const FOOTER: &str = "footer";
    pub const SITE_CONFIG: &str = "site_config";
    pub const HERO: &str = "hero";
    pub const FEATURE_CARD: &str = "feature_card";
    pub const FEATURE_GRID: &str = "feature_grid";
    pub const TEXT_WITH_IMAGE: &str = "text_with_image";
    pub const TESTIMONIAL_CARD: &str = "testimonial_card";
    pub const TESTIMONIALS: &str = "testimonials";
    pub const CALL_TO_ACTION: &str = "call_to_action";
    pub const PRICING_CARD: &str = "pricing_card";
    pub const PRICING_TABLE: &str = "pricing_table";
    pub const CONTACT_FORM: &str = "contact_form";
    pub const LOGO_CLOUD: &str = "logo_cloud";
    pub const FAQ_ITEM: &str = "faq_item";
    pub const FAQ: &str = "faq";
    pub const RICH_TEXT_BLOCK: &str = "rich_text_block";
    pub const PAGE: &str = "page";
    pub const BLOG_POST: &str = "blog_post";
}

// ─────────────────────────────────────────────────────────────────────────────
// System attributes
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of a content item variant.
///
/// `id` is opaque and assigned by the CMS. `codename` is the editor-assigned
/// stable key; it is unique across the project and shared by every language
/// variant of the same item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemAttributes {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub codename: String,
    #[serde(default)]
    pub language: String,
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Elements
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub mime_type: String,
    #[serde(default)]
    pub size: Option<u64>,
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    pub codename: String,
}

/// One element value. Unknown element kinds decode to `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Text {
        #[serde(default, deserialize_with = "nullable")]
        value: String,
    },
    RichText {
        #[serde(default, deserialize_with = "nullable")]
        value: String,
        #[serde(default, deserialize_with = "nullable")]
        modular_content: Vec<String>,
    },
    UrlSlug {
        #[serde(default, deserialize_with = "nullable")]
        value: String,
    },
    Number {
        #[serde(default)]
        value: Option<f64>,
    },
    DateTime {
        #[serde(default)]
        value: Option<DateTime<Utc>>,
    },
    Asset {
        #[serde(default, deserialize_with = "nullable")]
        value: Vec<Asset>,
    },
    MultipleChoice {
        #[serde(default, deserialize_with = "nullable")]
        value: Vec<Choice>,
    },
    ModularContent {
        #[serde(default, deserialize_with = "nullable")]
        value: Vec<String>,
    },
    Taxonomy {
        #[serde(default, deserialize_with = "nullable")]
        value: Vec<Choice>,
    },
    Custom {
        #[serde(default, deserialize_with = "nullable")]
        value: String,
    },
    #[serde(other)]
    Other,
}

/// `null` and a missing value both decode to the type's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Content item
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub system: SystemAttributes,
    #[serde(default)]
    pub elements: BTreeMap<String, Element>,
}

impl ContentItem {
    pub fn codename(&self) -> &str {
        &self.system.codename
    }

    pub fn content_type(&self) -> &str {
        &self.system.content_type
    }

    pub fn language(&self) -> &str {
        &self.system.language
    }

    /// Plain text value; a missing element reads as the empty string, the
    /// same way the CMS reports an element nobody filled in.
    pub fn text(&self, element: &str) -> &str {
        match self.elements.get(element) {
            Some(Element::Text { value })
            | Some(Element::UrlSlug { value })
            | Some(Element::Custom { value }) => value.as_str(),
            Some(Element::RichText { value, .. }) => value.as_str(),
            _ => "",
        }
    }

    /// The `slug` element. Empty is a valid slug (the site root).
    pub fn slug(&self) -> &str {
        self.text("slug")
    }

    /// Rich text HTML plus the codenames of components embedded in it.
    pub fn rich_text(&self, element: &str) -> (&str, &[String]) {
        match self.elements.get(element) {
            Some(Element::RichText {
                value,
                modular_content,
            }) => (value.as_str(), modular_content.as_slice()),
            Some(Element::Text { value }) => (value.as_str(), &[]),
            _ => ("", &[]),
        }
    }

    /// Linked item codenames in authored order.
    pub fn linked(&self, element: &str) -> &[String] {
        match self.elements.get(element) {
            Some(Element::ModularContent { value }) => value.as_slice(),
            _ => &[],
        }
    }

    pub fn assets(&self, element: &str) -> &[Asset] {
        match self.elements.get(element) {
            Some(Element::Asset { value }) => value.as_slice(),
            _ => &[],
        }
    }

    pub fn choices(&self, element: &str) -> &[Choice] {
        match self.elements.get(element) {
            Some(Element::MultipleChoice { value }) | Some(Element::Taxonomy { value }) => {
                value.as_slice()
            }
            _ => &[],
        }
    }

    /// True if the first selected option of a multiple choice element has
    /// `codename`.
    pub fn first_choice_is(&self, element: &str, codename: &str) -> bool {
        self.choices(element)
            .first()
            .is_some_and(|c| c.codename == codename)
    }

    pub fn date_time(&self, element: &str) -> Option<DateTime<Utc>> {
        match self.elements.get(element) {
            Some(Element::DateTime { value }) => *value,
            _ => None,
        }
    }

    pub fn number(&self, element: &str) -> Option<f64> {
        match self.elements.get(element) {
            Some(Element::Number { value }) => *value,
            _ => None,
        }
    }

    /// Every codename this item references, from linked-item elements and
    /// from components embedded in rich text.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.elements.values().flat_map(|el| {
            let refs: &[String] = match el {
                Element::ModularContent { value } => value.as_slice(),
                Element::RichText {
                    modular_content, ..
                } => modular_content.as_slice(),
                _ => &[],
            };
            refs.iter().map(String::as_str)
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// Flat codename → item arena that accompanies a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkedItems(HashMap<String, ContentItem>);

impl LinkedItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, codename: &str) -> Option<&ContentItem> {
        self.0.get(codename)
    }

    pub fn contains(&self, codename: &str) -> bool {
        self.0.contains_key(codename)
    }

    pub fn insert(&mut self, item: ContentItem) {
        self.0.insert(item.system.codename.clone(), item);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ContentItem> for LinkedItems {
    fn from_iter<I: IntoIterator<Item = ContentItem>>(iter: I) -> Self {
        let mut linked = LinkedItems::new();
        for item in iter {
            linked.insert(item);
        }
        linked
    }
}

/// Result of a listing query: matching items in response order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemListing {
    #[serde(default)]
    pub items: Vec<ContentItem>,
    #[serde(default)]
    pub modular_content: LinkedItems,
}

/// Result of a single-item query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub item: ContentItem,
    #[serde(default)]
    pub modular_content: LinkedItems,
}
