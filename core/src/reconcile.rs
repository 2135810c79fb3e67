//! Tag reconciliation between local and remote term sets.
//!
//! A term is relevant to a sync context iff it carries that context's tags.
//! Terms still present in the local strings file get the configured tags
//! (re)applied; remote terms no longer present locally lose them. A remote
//! term left with no tags at all has no synchronization purpose and is routed
//! to deletion.

use std::collections::BTreeMap;

use crate::api::types::Term;

/// Disjoint partitions of the updated remote term set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagPlan {
    /// Terms whose updated tag set is non-empty; written back via upsert.
    pub upserts: Vec<Term>,
    /// Terms whose updated tag set ended up empty; removed remotely.
    pub deletions: Vec<Term>,
}

/// Computes the tag-update plan for the remote term set.
///
/// Every remote term is evaluated exactly once: terms missing from `local`
/// lose all of `tags` (other tags are preserved), the rest gain all of `tags`
/// (duplicates collapse). Terms that exist only locally are not created here;
/// the subsequent file upload introduces them.
pub fn plan_tag_updates(
    local: &BTreeMap<String, Term>,
    remote: &[Term],
    tags: &[String],
) -> TagPlan {
    let mut plan = TagPlan::default();

    for term in remote {
        let updated_tags = if local.contains_key(&term.term) {
            add_tags(&term.tags, tags)
        } else {
            remove_tags(&term.tags, tags)
        };

        let updated = Term::new(term.term.clone(), updated_tags);
        if updated.tags.is_empty() {
            plan.deletions.push(updated);
        } else {
            plan.upserts.push(updated);
        }
    }

    plan
}

fn add_tags(current: &[String], tags: &[String]) -> Vec<String> {
    let mut merged = current.to_vec();
    for tag in tags {
        if !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }
    merged
}

fn remove_tags(current: &[String], tags: &[String]) -> Vec<String> {
    current
        .iter()
        .filter(|tag| !tags.contains(tag))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn local_set(names: &[&str], tag_set: &[&str]) -> BTreeMap<String, Term> {
        names
            .iter()
            .map(|name| (name.to_string(), Term::new(*name, tags(tag_set))))
            .collect()
    }

    #[test]
    fn orphaned_terms_lose_the_configured_tags_and_keep_the_rest() {
        let local = local_set(&["a", "b"], &["t1"]);
        let remote = vec![
            Term::new("b", tags(&["x"])),
            Term::new("c", tags(&["t1"])),
        ];

        let plan = plan_tag_updates(&local, &remote, &tags(&["t1"]));

        assert_eq!(plan.upserts, vec![Term::new("b", tags(&["x", "t1"]))]);
        assert_eq!(plan.deletions, vec![Term::new("c", Vec::new())]);
    }

    #[test]
    fn no_update_is_produced_for_terms_outside_the_remote_set() {
        // "a" exists only locally; creation happens via the file upload, not
        // the tag plan.
        let local = local_set(&["a"], &["t1"]);
        let plan = plan_tag_updates(&local, &[], &tags(&["t1"]));
        assert!(plan.upserts.is_empty());
        assert!(plan.deletions.is_empty());
    }

    #[test]
    fn adding_tags_is_idempotent() {
        let local = local_set(&["a"], &["t1"]);
        let remote = vec![Term::new("a", tags(&["t1", "other"]))];
        let plan = plan_tag_updates(&local, &remote, &tags(&["t1"]));
        assert_eq!(plan.upserts, vec![Term::new("a", tags(&["t1", "other"]))]);
    }

    #[test]
    fn removing_absent_tags_is_a_no_op() {
        let local = BTreeMap::new();
        let remote = vec![Term::new("a", tags(&["other"]))];
        let plan = plan_tag_updates(&local, &remote, &tags(&["t1"]));
        assert_eq!(plan.upserts, vec![Term::new("a", tags(&["other"]))]);
        assert!(plan.deletions.is_empty());
    }

    #[test]
    fn untagged_orphans_are_routed_to_deletion() {
        let local = BTreeMap::new();
        let remote = vec![Term::new("gone", tags(&["t1", "t2"]))];
        let plan = plan_tag_updates(&local, &remote, &tags(&["t1", "t2"]));
        assert!(plan.upserts.is_empty());
        assert_eq!(plan.deletions, vec![Term::new("gone", Vec::new())]);
    }

    #[test]
    fn plan_partitions_the_whole_remote_set() {
        let local = local_set(&["kept"], &["t1"]);
        let remote = vec![
            Term::new("kept", Vec::new()),
            Term::new("tagged_elsewhere", tags(&["other", "t1"])),
            Term::new("only_ours", tags(&["t1"])),
        ];

        let plan = plan_tag_updates(&local, &remote, &tags(&["t1"]));

        let mut covered: Vec<&str> = plan
            .upserts
            .iter()
            .chain(plan.deletions.iter())
            .map(|term| term.term.as_str())
            .collect();
        covered.sort_unstable();
        assert_eq!(covered, vec!["kept", "only_ours", "tagged_elsewhere"]);
        assert!(plan
            .upserts
            .iter()
            .all(|upsert| !plan.deletions.iter().any(|d| d.term == upsert.term)));
    }

    #[test]
    fn empty_tag_set_leaves_remote_tags_unchanged() {
        let local = local_set(&["a"], &[]);
        let remote = vec![Term::new("a", tags(&["x"])), Term::new("b", tags(&["y"]))];
        let plan = plan_tag_updates(&local, &remote, &[]);
        assert_eq!(
            plan.upserts,
            vec![Term::new("a", tags(&["x"])), Term::new("b", tags(&["y"]))]
        );
    }
}
