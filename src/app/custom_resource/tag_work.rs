//! Tag reconciliation between a template and the live distribution.
//!
//! Only keys the template manages (now or in its previous version) are touched. Tags added to
//! the distribution by anything else survive every update.

use crate::app::cfront::{Tag, Tags};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagUpdateWork {
    /// Tags to (re)apply with `TagResource`
    pub tags: Vec<Tag>,
    /// Keys to remove with `UntagResource`
    pub untag_keys: Vec<String>,
}

impl TagUpdateWork {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.untag_keys.is_empty()
    }
}

pub fn plan_tag_update(live: &Tags, target: Option<&Tags>, previous: Option<&Tags>) -> TagUpdateWork {
    let mut work = TagUpdateWork::default();

    if let Some(target) = target {
        work.tags = target
            .items()
            .iter()
            .filter(|tag| live.get(tag.key()) != Some(tag.value()))
            .cloned()
            .collect();
    }

    if let Some(previous) = previous {
        for tag in previous.items() {
            let still_wanted = target.is_some_and(|target| target.get(tag.key()).is_some());
            let on_live = live.get(tag.key()).is_some();
            let key = tag.key().to_string();
            if !still_wanted && on_live && !work.untag_keys.contains(&key) {
                work.untag_keys.push(key);
            }
        }
    }

    work
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        Tags::new(pairs.iter().map(|(k, v)| Tag::new(*k, *v)).collect())
    }

    fn keys(work: &TagUpdateWork) -> Vec<&str> {
        work.tags.iter().map(|t| t.key()).collect()
    }

    #[test]
    fn test_new_and_changed_tags_are_applied() {
        let live = tags(&[("team", "edge"), ("env", "dev")]);
        let target = tags(&[("team", "edge"), ("env", "prod"), ("cost", "42")]);
        let work = plan_tag_update(&live, Some(&target), None);
        assert_eq!(keys(&work), vec!["env", "cost"]);
        assert!(work.untag_keys.is_empty());
    }

    #[test]
    fn test_removed_template_tags_are_untagged() {
        let live = tags(&[("team", "edge"), ("env", "prod"), ("owner", "ops")]);
        let previous = tags(&[("team", "edge"), ("env", "prod")]);
        let target = tags(&[("team", "edge")]);
        let work = plan_tag_update(&live, Some(&target), Some(&previous));
        assert!(work.tags.is_empty());
        assert_eq!(work.untag_keys, vec!["env".to_string()]);
    }

    #[test]
    fn test_dropping_the_tag_block_removes_only_managed_keys() {
        let live = tags(&[("team", "edge"), ("owner", "ops")]);
        let previous = tags(&[("team", "edge"), ("gone", "already")]);
        let work = plan_tag_update(&live, None, Some(&previous));
        assert_eq!(work.untag_keys, vec!["team".to_string()]);
        assert!(work.tags.is_empty());
    }

    #[test]
    fn test_nothing_to_do() {
        let live = tags(&[("team", "edge")]);
        let work = plan_tag_update(&live, Some(&tags(&[("team", "edge")])), None);
        assert!(work.is_empty());
        assert!(plan_tag_update(&Tags::default(), None, None).is_empty());
    }
}
