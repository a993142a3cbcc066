//! Structural diff between a baseline tree and an edited copy.
//!
//! Editors keep a `clone()` of the decoded tree and call [`diff_bags`] to
//! find out what changed, instead of tracking a dirty flag on every node.

use std::fmt;

use serde::Serialize;

use crate::document::Document;
use crate::property::{Property, PropertyBag, PropertyValue};

/// One step from a bag down to a nested value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PathSegment {
    /// Property at `index` in its bag, named `name`.
    Property { index: usize, name: String },
    /// Array or roster element.
    Element(usize),
    /// The header bag of a character roster.
    Header,
}

/// Location of a change, from the root bag down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyPath(pub Vec<PathSegment>);

impl PropertyPath {
    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match segment {
                PathSegment::Property { name, .. } => f.write_str(name)?,
                PathSegment::Element(index) => write!(f, "[{index}]")?,
                PathSegment::Header => f.write_str("header")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeKind {
    /// Present only in the current tree.
    Added,
    /// Present only in the baseline.
    Removed,
    /// Same name and kind, different leaf value (or struct type name).
    Modified,
    /// Name or kind differs at this position.
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub path: PropertyPath,
    pub kind: ChangeKind,
}

/// Whether `current` differs from `baseline` at all.
pub fn is_modified(baseline: &PropertyBag, current: &PropertyBag) -> bool {
    baseline != current
}

/// Positional diff of two bags.
pub fn diff_bags(baseline: &PropertyBag, current: &PropertyBag) -> Vec<Change> {
    let mut changes = Vec::new();
    diff_bag(&PropertyPath::default(), baseline, current, &mut changes);
    changes
}

pub fn diff_documents(baseline: &Document, current: &Document) -> Vec<Change> {
    diff_bags(&baseline.root, &current.root)
}

fn diff_bag(path: &PropertyPath, old: &PropertyBag, new: &PropertyBag, out: &mut Vec<Change>) {
    let len = old.len().max(new.len());
    for index in 0..len {
        match (old.properties.get(index), new.properties.get(index)) {
            (Some(a), Some(b)) => {
                let at = path.child(PathSegment::Property {
                    index,
                    name: b.name.clone(),
                });
                diff_property(&at, a, b, out);
            }
            (Some(a), None) => out.push(Change {
                path: path.child(PathSegment::Property {
                    index,
                    name: a.name.clone(),
                }),
                kind: ChangeKind::Removed,
            }),
            (None, Some(b)) => out.push(Change {
                path: path.child(PathSegment::Property {
                    index,
                    name: b.name.clone(),
                }),
                kind: ChangeKind::Added,
            }),
            (None, None) => {}
        }
    }
}

fn diff_property(path: &PropertyPath, old: &Property, new: &Property, out: &mut Vec<Change>) {
    if old.name != new.name || old.kind() != new.kind() {
        out.push(Change {
            path: path.clone(),
            kind: ChangeKind::Replaced,
        });
        return;
    }
    match (&old.value, &new.value) {
        (PropertyValue::Struct(a), PropertyValue::Struct(b)) => {
            if a.type_name != b.type_name {
                out.push(Change {
                    path: path.clone(),
                    kind: ChangeKind::Modified,
                });
            }
            diff_bag(path, &a.body, &b.body, out);
        }
        (PropertyValue::Array(a), PropertyValue::Array(b)) => diff_elements(path, a, b, out),
        (PropertyValue::CharacterRoster(a), PropertyValue::CharacterRoster(b)) => {
            diff_bag(&path.child(PathSegment::Header), &a.header, &b.header, out);
            diff_elements(path, &a.elements, &b.elements, out);
        }
        (a, b) => {
            if a != b {
                out.push(Change {
                    path: path.clone(),
                    kind: ChangeKind::Modified,
                });
            }
        }
    }
}

fn diff_elements(
    path: &PropertyPath,
    old: &[PropertyBag],
    new: &[PropertyBag],
    out: &mut Vec<Change>,
) {
    let len = old.len().max(new.len());
    for index in 0..len {
        let at = path.child(PathSegment::Element(index));
        match (old.get(index), new.get(index)) {
            (Some(a), Some(b)) => diff_bag(&at, a, b, out),
            (Some(_), None) => out.push(Change {
                path: at,
                kind: ChangeKind::Removed,
            }),
            (None, Some(_)) => out.push(Change {
                path: at,
                kind: ChangeKind::Added,
            }),
            (None, None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(first: &str, gender: i32) -> PropertyBag {
        PropertyBag::from(vec![
            Property::text("strFirstName", first),
            Property::structure(
                "kAppearance",
                "TAppearance",
                vec![Property::int32("iGender", gender)],
            ),
        ])
    }

    fn pool(characters: Vec<PropertyBag>) -> PropertyBag {
        PropertyBag::from(vec![Property::roster(
            PropertyBag::from(vec![Property::text("PoolFileName", "Pool")]),
            characters,
        )])
    }

    fn paths(changes: &[Change]) -> Vec<(String, ChangeKind)> {
        changes
            .iter()
            .map(|c| (c.path.to_string(), c.kind))
            .collect()
    }

    #[test]
    fn identical_trees_have_no_changes() {
        let baseline = pool(vec![character("Jane", 1)]);
        let current = baseline.clone();
        assert!(!is_modified(&baseline, &current));
        assert!(diff_bags(&baseline, &current).is_empty());
    }

    #[test]
    fn nested_leaf_edit() {
        let baseline = pool(vec![character("Jane", 1), character("John", 2)]);
        let mut current = baseline.clone();
        current.properties[0]
            .as_character_roster_mut()
            .unwrap()
            .elements[1]
            .find_mut("kAppearance")
            .unwrap()
            .as_struct_mut()
            .unwrap()
            .body
            .find_mut("iGender")
            .unwrap()
            .value = PropertyValue::Int32(1);

        assert!(is_modified(&baseline, &current));
        assert_eq!(
            paths(&diff_bags(&baseline, &current)),
            [(
                "CharacterPool/[1]/kAppearance/iGender".to_string(),
                ChangeKind::Modified
            )]
        );
    }

    #[test]
    fn added_and_removed_elements() {
        let baseline = pool(vec![character("Jane", 1)]);
        let current = pool(vec![character("Jane", 1), character("John", 2)]);
        assert_eq!(
            paths(&diff_bags(&baseline, &current)),
            [("CharacterPool/[1]".to_string(), ChangeKind::Added)]
        );
        assert_eq!(
            paths(&diff_bags(&current, &baseline)),
            [("CharacterPool/[1]".to_string(), ChangeKind::Removed)]
        );
    }

    #[test]
    fn header_changes_are_reported() {
        let baseline = pool(vec![]);
        let mut current = baseline.clone();
        *current.properties[0]
            .as_character_roster_mut()
            .unwrap()
            .header
            .find_mut("PoolFileName")
            .unwrap()
            .as_text_mut()
            .unwrap() = "Renamed".into();
        assert_eq!(
            paths(&diff_bags(&baseline, &current)),
            [(
                "CharacterPool/header/PoolFileName".to_string(),
                ChangeKind::Modified
            )]
        );
    }

    #[test]
    fn kind_change_is_replacement() {
        let baseline = PropertyBag::from(vec![Property::text("Country", "Country_UK")]);
        let current = PropertyBag::from(vec![Property::name_value("Country", "Country_UK")]);
        assert_eq!(
            paths(&diff_bags(&baseline, &current)),
            [("Country".to_string(), ChangeKind::Replaced)]
        );
    }

    #[test]
    fn appended_property() {
        let baseline = character("Jane", 1);
        let mut current = baseline.clone();
        current.push(Property::bool("bGhostPawn", true));
        let changes = diff_bags(&baseline, &current);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Added);
        assert_eq!(
            changes[0].path.0,
            [PathSegment::Property {
                index: 2,
                name: "bGhostPawn".into()
            }]
        );
    }
}
