// crates/adapt/src/dispatch.rs

//! Block → renderer dispatch.
//!
//! The set of block kinds is closed. Each known kind maps to exactly one
//! renderer and hands it the block's already-expanded fields by reference.
//! Anything else is unknown: development builds get a visible diagnostic,
//! production builds skip the block.

use domain::{
    model::{
        Block, BlockKind, CallToAction, ContactForm, Faq, FeatureGrid, Hero, Link, LogoCloud,
        PricingTable, RichTextBlock, Testimonials, TextWithImage,
    },
    setting::BuildEnv,
};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Renderer {
    Hero,
    FeatureGrid,
    TextWithImage,
    Testimonials,
    CallToAction,
    PricingTable,
    ContactForm,
    LogoCloud,
    Faq,
    RichText,
    Diagnostic,
}

/// Renderer input. Known kinds borrow the block's fields untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockView<'a> {
    Hero(&'a Hero),
    FeatureGrid(&'a FeatureGrid),
    TextWithImage(&'a TextWithImage),
    Testimonials(&'a Testimonials),
    CallToAction(&'a CallToAction),
    PricingTable(&'a PricingTable),
    ContactForm(&'a ContactForm),
    LogoCloud(&'a LogoCloud),
    Faq(&'a Faq),
    RichText(&'a RichTextBlock),
    Diagnostic { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderDescriptor<'a> {
    pub renderer: Renderer,
    /// Item id, for editor annotations. Empty for unresolved references.
    pub item_id: &'a str,
    pub codename: &'a str,
    pub props: BlockView<'a>,
}

impl<'a> RenderDescriptor<'a> {
    fn diagnostic(item_id: &'a str, codename: &'a str, message: String) -> Self {
        Self {
            renderer: Renderer::Diagnostic,
            item_id,
            codename,
            props: BlockView::Diagnostic { message },
        }
    }
}

/// Pick the renderer for `block`.
pub fn dispatch(block: &Block, env: BuildEnv) -> Option<RenderDescriptor<'_>> {
    let (renderer, props) = match &block.kind {
        BlockKind::Hero(f) => (Renderer::Hero, BlockView::Hero(f)),
        BlockKind::FeatureGrid(f) => (Renderer::FeatureGrid, BlockView::FeatureGrid(f)),
        BlockKind::TextWithImage(f) => (Renderer::TextWithImage, BlockView::TextWithImage(f)),
        BlockKind::Testimonials(f) => (Renderer::Testimonials, BlockView::Testimonials(f)),
        BlockKind::CallToAction(f) => (Renderer::CallToAction, BlockView::CallToAction(f)),
        BlockKind::PricingTable(f) => (Renderer::PricingTable, BlockView::PricingTable(f)),
        BlockKind::ContactForm(f) => (Renderer::ContactForm, BlockView::ContactForm(f)),
        BlockKind::LogoCloud(f) => (Renderer::LogoCloud, BlockView::LogoCloud(f)),
        BlockKind::Faq(f) => (Renderer::Faq, BlockView::Faq(f)),
        BlockKind::RichText(f) => (Renderer::RichText, BlockView::RichText(f)),
        BlockKind::Unknown { content_type } => {
            warn!(
                codename = %block.system.codename,
                content_type = %content_type,
                "no renderer for block type"
            );
            return env.is_development().then(|| {
                RenderDescriptor::diagnostic(
                    &block.system.id,
                    &block.system.codename,
                    format!("Unknown component type: {content_type}"),
                )
            });
        }
    };

    Some(RenderDescriptor {
        renderer,
        item_id: &block.system.id,
        codename: &block.system.codename,
        props,
    })
}

/// Dispatch a page body in order.
///
/// References that were never expanded carry no fields to render; they
/// surface as diagnostics in development and vanish in production.
pub fn dispatch_body(body: &[Link<Block>], env: BuildEnv) -> Vec<RenderDescriptor<'_>> {
    body.iter()
        .filter_map(|link| match link {
            Link::Resolved(block) => dispatch(block, env),
            Link::Unresolved { codename } => {
                debug!(%codename, "unresolved block reference");
                env.is_development().then(|| {
                    RenderDescriptor::diagnostic(
                        "",
                        codename,
                        format!("Unresolved component: {codename}"),
                    )
                })
            }
        })
        .collect()
}
