use isls_conf::RuleOption;

use crate::matcher::match_requirement;
use crate::matcher::InvalidValue;
use crate::matcher::RequirementOutcome;
use crate::ClosingPolicy;
use crate::Event;
use crate::Finding;
use crate::Rule;
use crate::RuleConfigError;
use crate::TagOccurrence;
use crate::TagSpec;
use crate::TagSpecs;

/// Per-tag grammar check: closing form, required, optional-with-values and
/// redundant attributes.
pub struct TagsCheck {
    specs: TagSpecs,
}

impl TagsCheck {
    pub const ID: &'static str = "tags-check";

    #[must_use]
    pub fn new(specs: TagSpecs) -> Self {
        Self { specs }
    }

    /// Builtin grammar, merged with the tag overrides when the option is an
    /// object.
    pub fn from_option(option: &RuleOption) -> Result<Self, RuleConfigError> {
        let mut specs = TagSpecs::builtin();
        if let Some(overrides) = option.as_object() {
            let user = TagSpecs::from_overrides(overrides)?;
            tracing::debug!("Merging {} tag spec overrides", user.len());
            specs.merge(user);
        }
        Ok(Self::new(specs))
    }

    #[must_use]
    pub fn specs(&self) -> &TagSpecs {
        &self.specs
    }

    fn check_tag(tag: &TagOccurrence, spec: &TagSpec) -> Vec<Finding> {
        let mut findings = Vec::new();
        let name = &tag.tag_name;
        let at_tag = |message: String| {
            Finding::error(Self::ID, message, tag.line, tag.col, tag.raw.as_str())
        };

        match spec.closing_policy {
            ClosingPolicy::MustSelfClose if !tag.self_closed => {
                findings.push(at_tag(format!("The <{name}> tag must be selfclosing.")));
            }
            ClosingPolicy::MustNotSelfClose if tag.self_closed => {
                findings.push(at_tag(format!("The <{name}> tag must not be selfclosing.")));
            }
            _ => {}
        }

        for requirement in &spec.required_attributes {
            match match_requirement(requirement, &tag.attrs) {
                RequirementOutcome::Satisfied => {}
                RequirementOutcome::Missing(attr) => {
                    findings.push(at_tag(format!("The <{name}> tag must have attr '{attr}'.")));
                }
                RequirementOutcome::InvalidValues(invalid) => {
                    for value in &invalid {
                        findings.push(Self::at_attr(tag, value, "must have"));
                    }
                }
            }
        }

        for requirement in &spec.optional_attributes {
            if !requirement.has_allowed_values() {
                continue;
            }
            let outcome = match_requirement(requirement, &tag.attrs);
            if let RequirementOutcome::InvalidValues(invalid) = outcome {
                for value in &invalid {
                    findings.push(Self::at_attr(tag, value, "can have"));
                }
            }
        }

        for redundant in &spec.redundant_attributes {
            if let Some(attr) = tag.attrs_named(redundant).next() {
                findings.push(Finding::error(
                    Self::ID,
                    redundant_message(redundant, name),
                    tag.line,
                    tag.attr_col(attr),
                    tag.raw.as_str(),
                ));
            }
        }

        findings
    }

    fn at_attr(tag: &TagOccurrence, invalid: &InvalidValue<'_>, verb: &str) -> Finding {
        let allowed = invalid.allowed.join("' or '");
        Finding::error(
            Self::ID,
            format!(
                "The <{}> tag {verb} attr '{}' with one value of '{allowed}'.",
                tag.tag_name, invalid.attribute.name
            ),
            tag.line,
            tag.attr_col(invalid.attribute),
            tag.raw.as_str(),
        )
    }
}

fn redundant_message(attr: &str, tag: &str) -> String {
    format!("The attr '{attr}' is redundant for <{tag}> and should be omitted.")
}

impl Rule for TagsCheck {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn check(&self, event: &Event) -> Vec<Finding> {
        let Event::TagStart(tag) = event else {
            return Vec::new();
        };

        match self.specs.get(&tag.tag_name) {
            Some(spec) => Self::check_tag(tag, spec),
            None => Vec::new(),
        }
    }
}
