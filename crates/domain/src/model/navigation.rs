// crates/domain/src/model/navigation.rs

//! Navigation trees stored as a flat arena.
//!
//! `navigation_item` references itself through `children`. Instead of a
//! recursive object graph the items are copied into a `Vec<NavNode>` and
//! parents keep child indices. Construction stops at `NAVIGATION_DEPTH`
//! levels and never re-enters an item already on the current branch.

use crate::content::content_types as ct;
use crate::model::expand::Expander;
use serde::Serialize;

/// Levels kept: top-level items plus one level of children.
pub const NAVIGATION_DEPTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NavId(usize);

impl NavId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavNode {
    pub codename: String,
    pub label: String,
    pub url: String,
    pub children: Vec<NavId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    nodes: Vec<NavNode>,
    roots: Vec<NavId>,
}

struct Pending<'a> {
    codename: &'a str,
    expander: Expander<'a>,
    level: usize,
    parent: Option<NavId>,
}

impl Navigation {
    /// Build the arena from top-level codenames, resolving children through
    /// `expander` breadth-first.
    pub fn build(codenames: &[String], expander: Expander<'_>) -> Self {
        let mut nav = Navigation::default();
        let mut queue: std::collections::VecDeque<Pending<'_>> = codenames
            .iter()
            .map(|c| Pending {
                codename: c,
                expander,
                level: 0,
                parent: None,
            })
            .collect();

        while let Some(next) = queue.pop_front() {
            let Some((item, below)) = next.expander.follow(next.codename) else {
                continue;
            };
            if item.content_type() != ct::NAVIGATION_ITEM {
                continue;
            }
            if nav.on_branch(next.parent, next.codename) {
                continue;
            }

            let id = NavId(nav.nodes.len());
            nav.nodes.push(NavNode {
                codename: item.codename().to_string(),
                label: item.text("label").to_string(),
                url: item.text("url").to_string(),
                children: Vec::new(),
            });

            match next.parent {
                Some(parent) => nav.nodes[parent.0].children.push(id),
                None => nav.roots.push(id),
            }

            if next.level + 1 < NAVIGATION_DEPTH {
                queue.extend(item.linked("children").iter().map(|c| Pending {
                    codename: c,
                    expander: below,
                    level: next.level + 1,
                    parent: Some(id),
                }));
            }
        }

        nav
    }

    /// True if `codename` is `parent` or one of its ancestors.
    fn on_branch(&self, mut parent: Option<NavId>, codename: &str) -> bool {
        while let Some(id) = parent {
            if self.nodes[id.0].codename == codename {
                return true;
            }
            parent = self.parent_of(id);
        }
        false
    }

    fn parent_of(&self, child: NavId) -> Option<NavId> {
        self.nodes
            .iter()
            .position(|n| n.children.contains(&child))
            .map(NavId)
    }

    pub fn get(&self, id: NavId) -> Option<&NavNode> {
        self.nodes.get(id.0)
    }

    pub fn roots(&self) -> impl Iterator<Item = &NavNode> {
        self.roots.iter().map(|id| &self.nodes[id.0])
    }

    pub fn children<'n>(&'n self, node: &'n NavNode) -> impl Iterator<Item = &'n NavNode> {
        node.children.iter().map(|id| &self.nodes[id.0])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentItem, LinkedItems};
    use serde_json::json;

    fn nav_item(codename: &str, label: &str, children: &[&str]) -> ContentItem {
        serde_json::from_value(json!({
            "system": { "id": codename, "codename": codename, "language": "default", "type": "navigation_item" },
            "elements": {
                "label": { "type": "text", "value": label },
                "url": { "type": "text", "value": format!("/{codename}") },
                "children": { "type": "modular_content", "value": children }
            }
        }))
        .expect("nav item decodes")
    }

    #[test]
    fn builds_one_level_of_children_in_order() {
        let linked: LinkedItems = [
            nav_item("services", "Services", &["consulting", "training"]),
            nav_item("consulting", "Consulting", &["deep"]),
            nav_item("training", "Training", &[]),
            nav_item("deep", "Too deep", &[]),
            nav_item("about", "About", &[]),
        ]
        .into_iter()
        .collect();

        let nav = Navigation::build(
            &["services".to_string(), "about".to_string()],
            Expander::new(&linked, 3),
        );

        let roots: Vec<&str> = nav.roots().map(|n| n.label.as_str()).collect();
        assert_eq!(roots, vec!["Services", "About"]);

        let services = nav.roots().next().expect("services root");
        let children: Vec<&str> = nav.children(services).map(|n| n.label.as_str()).collect();
        assert_eq!(children, vec!["Consulting", "Training"]);

        // "deep" sits on a third level and is never stored.
        assert_eq!(nav.len(), 4);
        assert!(nav.roots().all(|r| nav.children(r).all(|c| c.children.is_empty())));
    }

    #[test]
    fn self_reference_is_not_followed() {
        let linked: LinkedItems = [nav_item("loop", "Loop", &["loop"])].into_iter().collect();
        let nav = Navigation::build(&["loop".to_string()], Expander::new(&linked, 5));

        assert_eq!(nav.len(), 1);
        let root = nav.roots().next().expect("root");
        assert!(root.children.is_empty());
    }

    #[test]
    fn depth_budget_limits_children() {
        let linked: LinkedItems = [
            nav_item("services", "Services", &["consulting"]),
            nav_item("consulting", "Consulting", &[]),
        ]
        .into_iter()
        .collect();

        // One hop reaches the top level only.
        let nav = Navigation::build(&["services".to_string()], Expander::new(&linked, 1));
        assert_eq!(nav.len(), 1);
    }

    #[test]
    fn skips_items_of_other_types() {
        let mut hero = nav_item("hero", "Hero", &[]);
        hero.system.content_type = "hero".to_string();
        let linked: LinkedItems = [hero].into_iter().collect();

        let nav = Navigation::build(&["hero".to_string()], Expander::new(&linked, 2));
        assert!(nav.is_empty());
    }
}
