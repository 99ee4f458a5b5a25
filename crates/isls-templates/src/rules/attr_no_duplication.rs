use rustc_hash::FxHashMap;

use crate::Attribute;
use crate::Event;
use crate::Finding;
use crate::Rule;

/// Tag that legitimately repeats `attribute=` to declare module parameters.
const EXEMPT_TAG: &str = "ismodule";

/// Reports attribute names that appear more than once on a tag.
#[derive(Debug, Default)]
pub struct AttrNoDuplication;

impl AttrNoDuplication {
    pub const ID: &'static str = "attr-no-duplication";
}

impl Rule for AttrNoDuplication {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn check(&self, event: &Event) -> Vec<Finding> {
        let Event::TagStart(tag) = event else {
            return Vec::new();
        };
        if tag.tag_name.eq_ignore_ascii_case(EXEMPT_TAG) {
            return Vec::new();
        }

        // first repeat of each name, in first-seen order
        let mut first_seen: Vec<&str> = Vec::new();
        let mut repeats: FxHashMap<&str, Option<&Attribute>> = FxHashMap::default();

        for attr in &tag.attrs {
            match repeats.get_mut(attr.name.as_str()) {
                None => {
                    repeats.insert(&attr.name, None);
                    first_seen.push(&attr.name);
                }
                Some(repeat) => {
                    repeat.get_or_insert(attr);
                }
            }
        }

        first_seen
            .into_iter()
            .filter_map(|name| repeats.get(name).copied().flatten())
            .map(|attr| {
                let name = &attr.name;
                Finding::error(
                    Self::ID,
                    format!("Duplicate of attribute name [ {name} ] was found."),
                    tag.line,
                    tag.attr_col(attr),
                    tag.raw.as_str(),
                )
            })
            .collect()
    }
}
