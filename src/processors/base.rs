// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ProcessorError;
use crate::observability::messages::processor::ParametersIgnored;
use crate::observability::messages::StructuredLog;
use crate::traits::{NameStyle, ParamSchema};

use super::{ParamValue, Params};

/// State every processor carries: an optional display name, the variant's
/// type name and the parameters accepted at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorBase {
    name: Option<String>,
    type_name: &'static str,
    params: Params,
}

impl ProcessorBase {
    /// Build the base for variant `S` from the supplied keyword parameters.
    ///
    /// Fails with `MissingParameters` naming every required parameter that
    /// was not supplied. Supplied names outside the variant's required and
    /// optional sets are dropped.
    pub fn new<S: ParamSchema>(name: Option<String>, kwargs: Params) -> Result<Self, ProcessorError> {
        Self::with_schema(
            S::TYPE_NAME,
            S::REQUIRED_PARAMS,
            S::OPTIONAL_PARAMS,
            name,
            kwargs,
        )
    }

    pub fn with_schema(
        type_name: &'static str,
        required: &[&str],
        optional: &[&str],
        name: Option<String>,
        kwargs: Params,
    ) -> Result<Self, ProcessorError> {
        let mut missing: Vec<String> = required
            .iter()
            .filter(|key| !kwargs.contains_key(**key))
            .map(|key| key.to_string())
            .collect();
        missing.sort();
        missing.dedup();

        if !missing.is_empty() {
            return Err(ProcessorError::MissingParameters {
                processor: type_name.to_string(),
                missing,
            });
        }

        let (params, ignored): (Params, Params) = kwargs.into_iter().partition(|(key, _)| {
            required.contains(&key.as_str()) || optional.contains(&key.as_str())
        });

        if !ignored.is_empty() {
            let ignored: Vec<&str> = ignored.keys().map(String::as_str).collect();
            ParametersIgnored {
                processor: type_name,
                names: &ignored,
            }
            .log();
        }

        Ok(Self {
            name,
            type_name,
            params,
        })
    }

    /// Base for a variant that accepts no parameters.
    pub fn bare(type_name: &'static str, name: Option<String>) -> Self {
        Self {
            name,
            type_name,
            params: Params::new(),
        }
    }

    /// The explicit name if one was given, else the type name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.type_name)
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn get_param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn param(&self, name: &str) -> Result<&ParamValue, ProcessorError> {
        self.params
            .get(name)
            .ok_or_else(|| ProcessorError::UnknownAttribute {
                processor: self.type_name.to_string(),
                name: name.to_string(),
            })
    }

    /// One diagnostic line: `<indent><n>. <name>(<k=v, ...>)`.
    pub fn render_line(&self, level: usize, indent_width: usize, item_number: Option<usize>) -> String {
        self.render_line_styled(level, indent_width, item_number, NameStyle::Plain)
    }

    pub fn render_line_styled(
        &self,
        level: usize,
        indent_width: usize,
        item_number: Option<usize>,
        style: NameStyle,
    ) -> String {
        let indent = " ".repeat(level * indent_width);
        let item = item_number.map(|n| format!("{}. ", n)).unwrap_or_default();
        let params = if self.params.is_empty() {
            String::new()
        } else {
            let pairs: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("({})", pairs.join(", "))
        };

        format!("{}{}{}{}", indent, item, style.apply(self.name()), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    struct Baseline;

    impl ParamSchema for Baseline {
        const TYPE_NAME: &'static str = "Baseline";
        const REQUIRED_PARAMS: &'static [&'static str] = &["order", "points"];
        const OPTIONAL_PARAMS: &'static [&'static str] = &["weight"];
    }

    struct RequiresX;

    impl ParamSchema for RequiresX {
        const TYPE_NAME: &'static str = "RequiresX";
        const REQUIRED_PARAMS: &'static [&'static str] = &["x"];
    }

    #[test]
    fn test_required_parameter_supplied() {
        let base = ProcessorBase::new::<RequiresX>(None, params! { "x" => 5 }).unwrap();
        assert_eq!(base.params(), &params! { "x" => 5 });
    }

    #[test]
    fn test_required_parameter_missing() {
        let error = ProcessorBase::new::<RequiresX>(None, params! {}).unwrap_err();
        assert_eq!(
            error,
            ProcessorError::MissingParameters {
                processor: "RequiresX".to_string(),
                missing: vec!["x".to_string()],
            }
        );
    }

    #[test]
    fn test_missing_parameters_table_driven() {
        struct TestCase {
            name: &'static str,
            kwargs: Params,
            expected_missing: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "nothing supplied",
                kwargs: params! {},
                expected_missing: vec!["order", "points"],
            },
            TestCase {
                name: "only optional supplied",
                kwargs: params! { "weight" => 0.5 },
                expected_missing: vec!["order", "points"],
            },
            TestCase {
                name: "one required and optional supplied",
                kwargs: params! { "order" => 2, "weight" => 0.5 },
                expected_missing: vec!["points"],
            },
            TestCase {
                name: "unknown keys do not count",
                kwargs: params! { "points" => 64, "colour" => "red" },
                expected_missing: vec!["order"],
            },
        ];

        for test_case in test_cases {
            let result = ProcessorBase::new::<Baseline>(None, test_case.kwargs);
            match result {
                Err(ProcessorError::MissingParameters { processor, missing }) => {
                    assert_eq!(processor, "Baseline", "Test case '{}'", test_case.name);
                    assert_eq!(missing, test_case.expected_missing, "Test case '{}'", test_case.name);
                }
                other => panic!("Test case '{}': expected MissingParameters, got {:?}", test_case.name, other),
            }
        }
    }

    #[test]
    fn test_params_are_intersection_of_schema_and_kwargs() {
        struct TestCase {
            name: &'static str,
            kwargs: Params,
            expected: Params,
        }

        let test_cases = vec![
            TestCase {
                name: "required only",
                kwargs: params! { "order" => 2, "points" => 64 },
                expected: params! { "order" => 2, "points" => 64 },
            },
            TestCase {
                name: "required and optional",
                kwargs: params! { "order" => 2, "points" => 64, "weight" => 0.5 },
                expected: params! { "order" => 2, "points" => 64, "weight" => 0.5 },
            },
            TestCase {
                name: "unknown keys dropped",
                kwargs: params! { "order" => 2, "points" => 64, "colour" => "red", "extra" => 1 },
                expected: params! { "order" => 2, "points" => 64 },
            },
        ];

        for test_case in test_cases {
            let base = ProcessorBase::new::<Baseline>(None, test_case.kwargs)
                .unwrap_or_else(|e| panic!("Test case '{}' failed: {}", test_case.name, e));
            assert_eq!(base.params(), &test_case.expected, "Test case '{}'", test_case.name);
        }
    }

    #[test]
    fn test_name_falls_back_to_type_name() {
        let unnamed = ProcessorBase::new::<RequiresX>(None, params! { "x" => 1 }).unwrap();
        assert_eq!(unnamed.name(), "RequiresX");

        let named = ProcessorBase::new::<RequiresX>(Some("Scale".to_string()), params! { "x" => 1 }).unwrap();
        assert_eq!(named.name(), "Scale");
        assert_eq!(named.type_name(), "RequiresX");
    }

    #[test]
    fn test_param_lookup() {
        let base = ProcessorBase::new::<Baseline>(None, params! { "order" => 2, "points" => 64 }).unwrap();

        assert_eq!(base.get_param("order"), Some(&ParamValue::Int(2)));
        assert_eq!(base.get_param("weight"), None);
        assert_eq!(base.param("points"), Ok(&ParamValue::Int(64)));
        assert_eq!(
            base.param("weight"),
            Err(ProcessorError::UnknownAttribute {
                processor: "Baseline".to_string(),
                name: "weight".to_string(),
            })
        );
    }

    #[test]
    fn test_render_line() {
        let base = ProcessorBase::new::<Baseline>(None, params! { "points" => 64, "order" => 2 }).unwrap();

        assert_eq!(base.render_line(0, 2, None), "Baseline(order=2, points=64)");
        assert_eq!(base.render_line(2, 2, Some(3)), "    3. Baseline(order=2, points=64)");

        let bare = ProcessorBase::with_schema("Noop", &[], &[], None, params! {}).unwrap();
        assert_eq!(bare.render_line(1, 4, Some(1)), "    1. Noop");

        let styled = base.render_line_styled(1, 2, Some(2), NameStyle::Highlighted);
        assert!(styled.starts_with("  2. "));
        assert!(styled.ends_with("(order=2, points=64)"));
        assert!(styled.contains(&NameStyle::Highlighted.apply("Baseline")));
    }
}
