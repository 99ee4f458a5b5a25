mod builtins;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::RuleConfigError;

/// Whether a tag must, must not, or may be written as `<tag/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosingPolicy {
    MustSelfClose,
    MustNotSelfClose,
    #[default]
    Unconstrained,
}

impl From<Option<bool>> for ClosingPolicy {
    fn from(selfclosing: Option<bool>) -> Self {
        match selfclosing {
            Some(true) => ClosingPolicy::MustSelfClose,
            Some(false) => ClosingPolicy::MustNotSelfClose,
            None => ClosingPolicy::Unconstrained,
        }
    }
}

/// A condition an occurrence's attributes must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeRequirement {
    /// Any one of these names must be present.
    NameAlternatives(Vec<String>),
    /// `name` must be present, and every occurrence of it must carry one of
    /// `allowed` as its value.
    NameWithAllowedValues { name: String, allowed: Vec<String> },
}

impl AttributeRequirement {
    /// `"hour|minute"` style alternatives.
    #[must_use]
    pub fn alternatives(names: &str) -> Self {
        AttributeRequirement::NameAlternatives(
            names
                .split('|')
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    #[must_use]
    pub fn with_values(name: &str, allowed: &[&str]) -> Self {
        AttributeRequirement::NameWithAllowedValues {
            name: name.to_string(),
            allowed: allowed.iter().map(|value| (*value).to_string()).collect(),
        }
    }

    /// Whether occurrences are checked against a list of allowed values.
    #[must_use]
    pub fn has_allowed_values(&self) -> bool {
        matches!(self, AttributeRequirement::NameWithAllowedValues { .. })
    }

    /// The name as shown in messages: alternatives are pipe-joined.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            AttributeRequirement::NameAlternatives(names) => names.join("|"),
            AttributeRequirement::NameWithAllowedValues { name, .. } => name.clone(),
        }
    }
}

/// Structural grammar for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagSpec {
    pub name: String,
    pub closing_policy: ClosingPolicy,
    pub required_attributes: Vec<AttributeRequirement>,
    pub optional_attributes: Vec<AttributeRequirement>,
    pub redundant_attributes: Vec<String>,
}

/// Registry of tag grammars keyed by lowercase tag name.
///
/// Tags missing from the registry are not checked at all.
#[derive(Clone, Debug, Default)]
pub struct TagSpecs(FxHashMap<String, TagSpec>);

impl TagSpecs {
    #[must_use]
    pub fn new(specs: FxHashMap<String, TagSpec>) -> Self {
        TagSpecs(specs)
    }

    /// The builtin HTML and ISML grammar.
    #[must_use]
    pub fn builtin() -> Self {
        builtins::isml_builtin_specs().clone()
    }

    /// Parse `tags-check` overrides: an object keyed by tag name whose values
    /// are partial specs in the `.htmlhintrc` format.
    pub fn from_overrides(overrides: &Map<String, Value>) -> Result<Self, RuleConfigError> {
        let mut specs = FxHashMap::default();

        for (tag, value) in overrides {
            let def = TagSpecDef::deserialize(value).map_err(|source| RuleConfigError::TagSpec {
                tag: tag.clone(),
                source,
            })?;
            let spec = def.into_spec(tag)?;
            specs.insert(spec.name.clone(), spec);
        }

        Ok(TagSpecs(specs))
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn get(&self, tag_name: &str) -> Option<&TagSpec> {
        if tag_name.bytes().any(|b| b.is_ascii_uppercase()) {
            self.0.get(&tag_name.to_ascii_lowercase())
        } else {
            self.0.get(tag_name)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TagSpec)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge another `TagSpecs` into this one, with the other taking precedence.
    ///
    /// Entries are replaced whole; requirement lists are never combined.
    pub fn merge(&mut self, other: TagSpecs) -> &mut Self {
        self.0.extend(other.0);
        self
    }
}

/// Partial tag spec as written in configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TagSpecDef {
    selfclosing: Option<bool>,
    #[serde(alias = "attrsrequired", alias = "attrs_required")]
    attrs_required: Vec<RequirementDef>,
    #[serde(alias = "attrsoptional", alias = "attrs_optional")]
    attrs_optional: Vec<RequirementDef>,
    #[serde(alias = "redundantattrs", alias = "redundant_attrs")]
    redundant_attrs: Vec<String>,
}

/// `"a|b"` or `["name", "value", ...]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RequirementDef {
    Names(String),
    Values(Vec<String>),
}

impl RequirementDef {
    fn into_requirement(self, tag: &str) -> Result<AttributeRequirement, RuleConfigError> {
        match self {
            RequirementDef::Names(names) => {
                let requirement = AttributeRequirement::alternatives(&names);
                match &requirement {
                    AttributeRequirement::NameAlternatives(list) if list.is_empty() => {
                        Err(RuleConfigError::Requirement {
                            tag: tag.to_string(),
                            message: "attribute name is empty".to_string(),
                        })
                    }
                    _ => Ok(requirement),
                }
            }
            RequirementDef::Values(mut values) => {
                if values.is_empty() {
                    return Err(RuleConfigError::Requirement {
                        tag: tag.to_string(),
                        message: "value list needs an attribute name first".to_string(),
                    });
                }
                let name = values.remove(0);
                Ok(AttributeRequirement::NameWithAllowedValues {
                    name,
                    allowed: values,
                })
            }
        }
    }
}

impl TagSpecDef {
    fn into_spec(self, tag: &str) -> Result<TagSpec, RuleConfigError> {
        let convert = |defs: Vec<RequirementDef>| {
            defs.into_iter()
                .map(|def| def.into_requirement(tag))
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(TagSpec {
            name: tag.to_ascii_lowercase(),
            closing_policy: ClosingPolicy::from(self.selfclosing),
            required_attributes: convert(self.attrs_required)?,
            optional_attributes: convert(self.attrs_optional)?,
            redundant_attributes: self.redundant_attrs,
        })
    }
}
