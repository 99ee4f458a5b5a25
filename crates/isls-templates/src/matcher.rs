//! Evaluation of one [`AttributeRequirement`] against an attribute list.

use crate::Attribute;
use crate::AttributeRequirement;

/// An attribute whose value is outside the allowed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidValue<'a> {
    pub attribute: &'a Attribute,
    pub allowed: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementOutcome<'a> {
    Satisfied,
    /// No attribute satisfies the presence part; carries the display name.
    Missing(String),
    /// Present, but these occurrences carry values that are not allowed.
    InvalidValues(Vec<InvalidValue<'a>>),
}

/// Check `requirement` against `attrs`.
///
/// Name comparison is exact. Presence is checked first; only then is every
/// attribute carrying the required name checked against the allowed values,
/// so duplicated attributes are reported one by one.
#[must_use]
pub fn match_requirement<'a>(
    requirement: &'a AttributeRequirement,
    attrs: &'a [Attribute],
) -> RequirementOutcome<'a> {
    match requirement {
        AttributeRequirement::NameAlternatives(names) => {
            if attrs.iter().any(|attr| names.contains(&attr.name)) {
                RequirementOutcome::Satisfied
            } else {
                RequirementOutcome::Missing(requirement.display_name())
            }
        }
        AttributeRequirement::NameWithAllowedValues { name, allowed } => {
            let mut present = false;
            let mut invalid = Vec::new();

            for attribute in attrs.iter().filter(|attr| attr.name == *name) {
                present = true;
                if !allowed.contains(&attribute.value) {
                    invalid.push(InvalidValue {
                        attribute,
                        allowed: allowed.as_slice(),
                    });
                }
            }

            if !present {
                RequirementOutcome::Missing(name.clone())
            } else if invalid.is_empty() {
                RequirementOutcome::Satisfied
            } else {
                RequirementOutcome::InvalidValues(invalid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<Attribute> {
        pairs
            .iter()
            .map(|(name, value)| Attribute {
                name: (*name).to_string(),
                value: (*value).to_string(),
                offset: 0,
            })
            .collect()
    }

    mod alternatives {
        use super::*;

        #[test]
        fn test_neither_present_is_missing() {
            let requirement = AttributeRequirement::alternatives("hour|minute");
            let attrs = attrs(&[("type", "relative")]);

            assert_eq!(
                match_requirement(&requirement, &attrs),
                RequirementOutcome::Missing("hour|minute".to_string())
            );
        }

        #[test]
        fn test_either_alone_satisfies() {
            let requirement = AttributeRequirement::alternatives("hour|minute");

            for name in ["hour", "minute"] {
                let attrs = attrs(&[(name, "30")]);
                assert_eq!(
                    match_requirement(&requirement, &attrs),
                    RequirementOutcome::Satisfied
                );
            }
        }

        #[test]
        fn test_name_match_is_case_sensitive() {
            let requirement = AttributeRequirement::alternatives("alt");
            let attrs = attrs(&[("ALT", "logo")]);

            assert!(matches!(
                match_requirement(&requirement, &attrs),
                RequirementOutcome::Missing(_)
            ));
        }
    }

    mod allowed_values {
        use super::*;

        #[test]
        fn test_absent_is_missing() {
            let requirement = AttributeRequirement::with_values("type", &["relative", "daily"]);
            let attrs = attrs(&[("hour", "1")]);

            assert_eq!(
                match_requirement(&requirement, &attrs),
                RequirementOutcome::Missing("type".to_string())
            );
        }

        #[test]
        fn test_allowed_value_satisfies() {
            let requirement = AttributeRequirement::with_values("type", &["relative", "daily"]);
            let attrs = attrs(&[("type", "daily")]);

            assert_eq!(
                match_requirement(&requirement, &attrs),
                RequirementOutcome::Satisfied
            );
        }

        #[test]
        fn test_each_duplicate_checked_independently() {
            let requirement = AttributeRequirement::with_values("type", &["relative", "daily"]);
            let attrs = attrs(&[("type", "relative"), ("type", "weekly")]);

            let RequirementOutcome::InvalidValues(invalid) =
                match_requirement(&requirement, &attrs)
            else {
                panic!("expected invalid values");
            };

            assert_eq!(invalid.len(), 1);
            assert_eq!(invalid[0].attribute.value, "weekly");
            assert_eq!(invalid[0].allowed, ["relative", "daily"]);
        }

        #[test]
        fn test_every_bad_duplicate_reported() {
            let requirement = AttributeRequirement::with_values("type", &["daily"]);
            let attrs = attrs(&[("type", "hourly"), ("type", "weekly")]);

            assert!(matches!(
                match_requirement(&requirement, &attrs),
                RequirementOutcome::InvalidValues(ref invalid) if invalid.len() == 2
            ));
        }
    }
}
