// crates/domain/src/model/expand.rs

use crate::content::{ContentItem, LinkedItems};
use serde::Serialize;
use tracing::warn;

/// A reference to another item that may or may not have been expanded.
///
/// References that point past the expansion depth, or at items absent from
/// the response arena, stay `Unresolved` and keep only the codename.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Link<T> {
    Resolved(T),
    Unresolved { codename: String },
}

impl<T> Link<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Link::Resolved(v) => Some(v),
            Link::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Link::Resolved(_))
    }

    pub fn unresolved_codename(&self) -> Option<&str> {
        match self {
            Link::Resolved(_) => None,
            Link::Unresolved { codename } => Some(codename),
        }
    }
}

/// Walks the linked-item arena of one response with a hop budget.
///
/// The budget starts at the expansion depth the items were fetched with and
/// every `follow` spends one unit, so a walk ends after at most `depth` hops
/// even if the arena holds cyclic references.
#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    linked: &'a LinkedItems,
    budget: u8,
}

impl<'a> Expander<'a> {
    pub fn new(linked: &'a LinkedItems, depth: u8) -> Self {
        Self {
            linked,
            budget: depth,
        }
    }

    pub fn budget(&self) -> u8 {
        self.budget
    }

    /// Look `codename` up one hop further down.
    pub fn follow(&self, codename: &str) -> Option<(&'a ContentItem, Expander<'a>)> {
        if self.budget == 0 {
            return None;
        }
        let item = self.linked.get(codename)?;
        Some((
            item,
            Expander {
                linked: self.linked,
                budget: self.budget - 1,
            },
        ))
    }

    /// Resolve a list of references, keeping their order.
    ///
    /// Items whose type is not `expected` are left unresolved instead of
    /// failing the whole walk; an editor linking the wrong item into a slot
    /// should not take a page down.
    pub fn links<T>(
        &self,
        codenames: &[String],
        expected: &str,
        decode: impl Fn(&'a ContentItem, Expander<'a>) -> T,
    ) -> Vec<Link<T>> {
        codenames
            .iter()
            .map(|codename| match self.follow(codename) {
                Some((item, next)) if item.content_type() == expected => {
                    Link::Resolved(decode(item, next))
                }
                Some((item, _)) => {
                    warn!(
                        codename = %codename,
                        found = %item.content_type(),
                        expected = %expected,
                        "linked item has unexpected type; leaving unresolved"
                    );
                    Link::Unresolved {
                        codename: codename.clone(),
                    }
                }
                None => Link::Unresolved {
                    codename: codename.clone(),
                },
            })
            .collect()
    }

    /// Resolve a list of references of any type, keeping their order.
    pub fn any_links<T>(
        &self,
        codenames: &[String],
        decode: impl Fn(&'a ContentItem, Expander<'a>) -> T,
    ) -> Vec<Link<T>> {
        codenames
            .iter()
            .map(|codename| match self.follow(codename) {
                Some((item, next)) => Link::Resolved(decode(item, next)),
                None => Link::Unresolved {
                    codename: codename.clone(),
                },
            })
            .collect()
    }
}
