pub mod block;
pub mod expand;
pub mod navigation;
pub mod page;

pub use block::{
    Block, BlockKind, CallToAction, ContactForm, Faq, FaqItem, FeatureCard, FeatureGrid, Hero,
    ImagePosition, LogoCloud, PricingCard, PricingTable, RichText, RichTextBlock, TestimonialCard,
    Testimonials, TextWithImage,
};
pub use expand::{Expander, Link};
pub use navigation::{NavId, NavNode, Navigation, NAVIGATION_DEPTH};
pub use page::{BlogPost, Footer, FooterColumn, Page, SiteConfig};
