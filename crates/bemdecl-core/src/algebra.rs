//! Set algebra over declarations: merge, intersect, subtract.
//!
//! All three work on flattened entries, so a block, each of its elements and
//! each modifier value combine independently of one another. Results are new
//! declarations; inputs are never modified.

use std::collections::BTreeSet;

use crate::declaration::{DeclEntry, Declaration};

/// Union by entity identity, keeping first-occurrence order across the
/// arguments. Techs of repeated entities are unioned.
pub fn merge(decls: &[Declaration]) -> Declaration {
    let mut merged = Declaration::new();
    for decl in decls {
        for entry in decl.entries() {
            merged.fold(entry.clone());
        }
    }
    merged
}

/// Entities present in every argument, in the order of the first one.
///
/// Tech sets intersect; an unrestricted (empty) set on one side yields the
/// other side's set.
pub fn intersect(decls: &[Declaration]) -> Declaration {
    let Some((first, rest)) = decls.split_first() else {
        return Declaration::new();
    };

    let mut result = Declaration::new();
    'entries: for entry in first.entries() {
        let mut techs = entry.techs.clone();
        for other in rest {
            match other.get(&entry.entity) {
                Some(found) => techs = intersect_techs(&techs, &found.techs),
                None => continue 'entries,
            }
        }
        result.fold(DeclEntry {
            entity: entry.entity.clone(),
            techs,
        });
    }
    result
}

fn intersect_techs(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.clone(),
        (_, true) => a.clone(),
        _ => a.intersection(b).cloned().collect(),
    }
}

/// Remove from `from` every entity present in `what` at the same level.
///
/// A `what` entry restricted to some techs only removes those techs; the
/// entry disappears once no tech is left. An unrestricted `from` entry cannot
/// lose a single tech and is kept in that case.
pub fn subtract(from: &Declaration, what: &Declaration) -> Declaration {
    let mut result = Declaration::new();
    for entry in from.entries() {
        match what.get(&entry.entity) {
            None => result.fold(entry.clone()),
            Some(removed) if removed.techs.is_empty() => {}
            Some(removed) => {
                if entry.techs.is_empty() {
                    result.fold(entry.clone());
                    continue;
                }
                let techs: BTreeSet<String> =
                    entry.techs.difference(&removed.techs).cloned().collect();
                if !techs.is_empty() {
                    result.fold(DeclEntry {
                        entity: entry.entity.clone(),
                        techs,
                    });
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BemEntity;

    fn decl(items: &[&str]) -> Declaration {
        Declaration::from_entries(items.iter().map(|s| BemEntity::parse(s).unwrap()))
    }

    #[test]
    fn merge_keeps_first_occurrence_order() {
        let merged = merge(&[decl(&["a", "b"]), decl(&["c", "a"])]);
        assert_eq!(merged, decl(&["a", "b", "c"]));
    }

    #[test]
    fn intersect_of_nothing_is_empty() {
        assert!(intersect(&[]).is_empty());
    }

    #[test]
    fn subtract_tech_restricted_entry() {
        let e = BemEntity::parse("a").unwrap();
        let from = Declaration::from_entries([DeclEntry::new(e.clone())
            .with_tech("css")
            .with_tech("js")]);
        let what = Declaration::from_entries([DeclEntry::new(e.clone()).with_tech("js")]);
        let result = subtract(&from, &what);
        assert_eq!(result.get(&e).unwrap().techs.len(), 1);
        assert!(result.get(&e).unwrap().techs.contains("css"));
    }
}
