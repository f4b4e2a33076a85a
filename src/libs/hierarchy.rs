//! Section tree view-model.
//!
//! The backend answers the sections query either with the nested tree
//! (the synthetic root and its subsections) or with a flat list linked by
//! `parent_id`. [`build_tree`] accepts both shapes, rebuilds the nesting from
//! the parent links and then projects it the way the caller asked for:
//!
//! - as a tree: the root's subsections, with the root id kept aside so that
//!   "move to no parent" can still address the true root;
//! - leaves only: every section without subsections, flattened depth-first;
//! - otherwise: every non-root section flattened depth-first.

use super::section::Section;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

pub const NO_PARENT_LABEL: &str = "No parent section";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("section {0} not found")]
    SectionNotFound(Uuid),
    #[error("the sections list has no root section")]
    RootMissing,
}

/// Shape requested from the sections collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SectionsQuery {
    pub as_tree: bool,
    pub leaves_only: bool,
}

impl SectionsQuery {
    pub fn tree() -> Self {
        Self {
            as_tree: true,
            leaves_only: false,
        }
    }

    pub fn leaves() -> Self {
        Self {
            as_tree: false,
            leaves_only: true,
        }
    }

    pub fn flat() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionTree {
    pub root_id: Option<Uuid>,
    pub sections: Vec<Section>,
}

impl SectionTree {
    pub fn root_id(&self) -> Result<Uuid, HierarchyError> {
        self.root_id.ok_or(HierarchyError::RootMissing)
    }

    pub fn find(&self, id: Uuid) -> Result<&Section, HierarchyError> {
        find_by_id(&self.sections, id)
    }
}

/// One entry of the parent picker used when moving a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentChoice {
    pub id: Uuid,
    pub title: String,
    pub depth: usize,
}

impl ParentChoice {
    pub fn label(&self) -> String {
        format!("{}{}", "  ".repeat(self.depth), self.title)
    }
}

pub fn build_tree(sections: Vec<Section>, query: SectionsQuery) -> SectionTree {
    let nested = nest(sections);
    let root_id = nested.iter().find(|s| s.is_root()).map(|s| s.id);

    let top_level: Vec<Section> = nested
        .into_iter()
        .flat_map(|section| if section.is_root() { section.subsections } else { vec![section] })
        .collect();

    let sections = if query.leaves_only {
        let mut leaves = Vec::new();
        flatten(top_level, true, &mut leaves);
        leaves
    } else if query.as_tree {
        top_level
    } else {
        let mut all = Vec::new();
        flatten(top_level, false, &mut all);
        all
    };

    SectionTree { root_id, sections }
}

/// Depth-first search through `subsections`.
pub fn find_by_id(sections: &[Section], id: Uuid) -> Result<&Section, HierarchyError> {
    fn walk(sections: &[Section], id: Uuid) -> Option<&Section> {
        for section in sections {
            if section.id == id {
                return Some(section);
            }
            if let Some(found) = walk(&section.subsections, id) {
                return Some(found);
            }
        }
        None
    }
    walk(sections, id).ok_or(HierarchyError::SectionNotFound(id))
}

/// Ids of `section` and of everything below it.
pub fn subtree_ids(section: &Section) -> HashSet<Uuid> {
    let mut ids = HashSet::from([section.id]);
    for child in &section.subsections {
        ids.extend(subtree_ids(child));
    }
    ids
}

/// Sections whose title equals `title`, ignoring case, in depth-first order.
/// Case folding is Unicode-aware, so "ДОМ" finds "Дом".
pub fn find_by_title<'a>(sections: &'a [Section], title: &str) -> Vec<&'a Section> {
    fn walk<'a>(sections: &'a [Section], title: &str, out: &mut Vec<&'a Section>) {
        for section in sections {
            if section.title.trim().to_lowercase() == title {
                out.push(section);
            }
            walk(&section.subsections, title, out);
        }
    }
    let mut found = Vec::new();
    walk(sections, &title.trim().to_lowercase(), &mut found);
    found
}

/// Every section of the tree except `excluded`, depth-first with depths.
pub fn section_choices(tree: &SectionTree, excluded: &HashSet<Uuid>) -> Vec<ParentChoice> {
    fn walk(sections: &[Section], depth: usize, excluded: &HashSet<Uuid>, out: &mut Vec<ParentChoice>) {
        for section in sections.iter().filter(|s| !excluded.contains(&s.id)) {
            out.push(ParentChoice {
                id: section.id,
                title: section.title.clone(),
                depth,
            });
            walk(&section.subsections, depth + 1, excluded, out);
        }
    }
    let mut choices = Vec::new();
    walk(&tree.sections, 0, excluded, &mut choices);
    choices
}

/// Parent candidates for moving `moving`: the root first, then every section
/// that is neither the moving one nor below it.
pub fn parent_choices(tree: &SectionTree, moving: Uuid) -> Result<Vec<ParentChoice>, HierarchyError> {
    let excluded = subtree_ids(tree.find(moving)?);
    let mut choices = vec![ParentChoice {
        id: tree.root_id()?,
        title: NO_PARENT_LABEL.to_string(),
        depth: 0,
    }];
    choices.extend(section_choices(tree, &excluded));
    Ok(choices)
}

/// Rebuilds nesting from `parent_id` links; accepts nested or flat input and
/// keeps sibling order as received.
fn nest(sections: Vec<Section>) -> Vec<Section> {
    let mut flat = Vec::new();
    flatten(sections, false, &mut flat);

    let known: HashSet<Uuid> = flat.iter().map(|s| s.id).collect();
    let mut children: HashMap<Uuid, Vec<Section>> = HashMap::new();
    let mut top_level = Vec::new();
    for section in flat {
        match section.parent_id {
            Some(parent_id) if known.contains(&parent_id) => children.entry(parent_id).or_default().push(section),
            _ => top_level.push(section),
        }
    }

    fn attach(mut section: Section, children: &mut HashMap<Uuid, Vec<Section>>) -> Section {
        let own = children.remove(&section.id).unwrap_or_default();
        section.subsections = own.into_iter().map(|child| attach(child, children)).collect();
        section
    }

    let nested: Vec<Section> = top_level.into_iter().map(|s| attach(s, &mut children)).collect();
    if !children.is_empty() {
        tracing::warn!(orphans = children.len(), "sections unreachable from any top-level section were dropped");
    }
    nested
}

/// Flattens depth-first with subsections detached; with `leaves_only` only
/// the nodes that had no subsections are kept.
fn flatten(sections: Vec<Section>, leaves_only: bool, out: &mut Vec<Section>) {
    for mut section in sections {
        let keep = !leaves_only || section.is_leaf();
        let subsections = std::mem::take(&mut section.subsections);
        if keep {
            out.push(section);
        }
        flatten(subsections, leaves_only, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: u128, title: &str, parent: Option<u128>, subsections: Vec<Section>) -> Section {
        Section {
            id: Uuid::from_u128(id),
            title: title.to_string(),
            parent_id: parent.map(Uuid::from_u128),
            added_at: "2025-01-01T00:00:00".to_string(),
            subsections,
            tasks: vec![],
        }
    }

    /// root
    /// ├── Home (2)
    /// │   ├── Garden (4)
    /// │   └── Kitchen (5)
    /// │       └── Fridge (7)
    /// └── Work (3)
    fn nested_fixture() -> Vec<Section> {
        vec![section(
            1,
            "root",
            None,
            vec![
                section(
                    2,
                    "Home",
                    Some(1),
                    vec![
                        section(4, "Garden", Some(2), vec![]),
                        section(5, "Kitchen", Some(2), vec![section(7, "Fridge", Some(5), vec![])]),
                    ],
                ),
                section(3, "Work", Some(1), vec![]),
            ],
        )]
    }

    fn flat_fixture() -> Vec<Section> {
        vec![
            section(1, "root", None, vec![]),
            section(2, "Home", Some(1), vec![]),
            section(3, "Work", Some(1), vec![]),
            section(4, "Garden", Some(2), vec![]),
            section(5, "Kitchen", Some(2), vec![]),
            section(7, "Fridge", Some(5), vec![]),
        ]
    }

    fn titles(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn tree_exposes_root_children_and_root_id() {
        let tree = build_tree(nested_fixture(), SectionsQuery::tree());
        assert_eq!(tree.root_id, Some(Uuid::from_u128(1)));
        assert_eq!(titles(&tree.sections), vec!["Home", "Work"]);
        assert_eq!(titles(&tree.sections[0].subsections), vec!["Garden", "Kitchen"]);
    }

    #[test]
    fn flat_input_is_nested_by_parent_links() {
        let from_flat = build_tree(flat_fixture(), SectionsQuery::tree());
        let from_nested = build_tree(nested_fixture(), SectionsQuery::tree());
        assert_eq!(from_flat, from_nested);
    }

    #[test]
    fn leaves_only_never_returns_a_node_with_subsections() {
        for input in [nested_fixture(), flat_fixture()] {
            let tree = build_tree(input, SectionsQuery::leaves());
            assert_eq!(titles(&tree.sections), vec!["Garden", "Fridge", "Work"]);
            assert!(tree.sections.iter().all(|s| s.subsections.is_empty()));
        }
    }

    #[test]
    fn flat_projection_lists_every_non_root_section() {
        let tree = build_tree(nested_fixture(), SectionsQuery::flat());
        assert_eq!(titles(&tree.sections), vec!["Home", "Garden", "Kitchen", "Fridge", "Work"]);
        assert_eq!(tree.root_id, Some(Uuid::from_u128(1)));
    }

    #[test]
    fn find_by_id_returns_matching_node_for_every_id() {
        let tree = build_tree(nested_fixture(), SectionsQuery::tree());
        for id in [2u128, 3, 4, 5, 7] {
            let found = tree.find(Uuid::from_u128(id)).unwrap();
            assert_eq!(found.id, Uuid::from_u128(id));
        }
    }

    #[test]
    fn find_by_id_fails_for_absent_ids() {
        let tree = build_tree(nested_fixture(), SectionsQuery::tree());
        let missing = Uuid::from_u128(99);
        assert_eq!(tree.find(missing), Err(HierarchyError::SectionNotFound(missing)));
    }

    #[test]
    fn parent_choices_skip_moving_subtree() {
        let tree = build_tree(nested_fixture(), SectionsQuery::tree());
        let choices = parent_choices(&tree, Uuid::from_u128(5)).unwrap();
        let labels: Vec<String> = choices.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["No parent section", "Home", "  Garden", "Work"]);
        assert_eq!(choices[0].id, Uuid::from_u128(1));
    }

    #[test]
    fn titles_match_case_insensitively_at_any_depth() {
        let tree = build_tree(nested_fixture(), SectionsQuery::tree());
        let found = find_by_title(&tree.sections, " fridge ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, Uuid::from_u128(7));
        assert!(find_by_title(&tree.sections, "Garage").is_empty());
    }

    #[test]
    fn titles_match_case_insensitively_beyond_ascii() {
        let sections = vec![section(
            1,
            "root",
            None,
            vec![
                section(2, "Дом", Some(1), vec![section(4, "Кухня", Some(2), vec![])]),
                section(3, "Straße", Some(1), vec![]),
            ],
        )];
        let tree = build_tree(sections, SectionsQuery::tree());

        let found = find_by_title(&tree.sections, "ДОМ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, Uuid::from_u128(2));

        let found = find_by_title(&tree.sections, " кухня ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, Uuid::from_u128(4));

        let found = find_by_title(&tree.sections, "STRASSE");
        assert!(found.is_empty());
        assert_eq!(find_by_title(&tree.sections, "STRAßE")[0].id, Uuid::from_u128(3));
    }

    #[test]
    fn section_choices_cover_the_whole_tree() {
        let tree = build_tree(flat_fixture(), SectionsQuery::tree());
        let labels: Vec<String> = section_choices(&tree, &HashSet::new()).iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["Home", "  Garden", "  Kitchen", "    Fridge", "Work"]);
    }

    #[test]
    fn parent_choices_require_a_root() {
        let tree = build_tree(vec![section(2, "Home", Some(1), vec![])], SectionsQuery::tree());
        assert_eq!(parent_choices(&tree, Uuid::from_u128(2)), Err(HierarchyError::RootMissing));
    }
}
