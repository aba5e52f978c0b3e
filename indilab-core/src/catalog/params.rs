//! Parameter schemas and resolution of caller values against them.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::{ParamMap, ParamValue};
use crate::error::EngineError;

/// Presentation type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Number,
    Select,
}

/// Default value as shown in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamDefault {
    Number(f64),
    Text(&'static str),
}

impl ParamDefault {
    fn to_value(self) -> ParamValue {
        match self {
            ParamDefault::Number(v) => ParamValue::Number(v),
            ParamDefault::Text(s) => ParamValue::Text(s.to_string()),
        }
    }
}

/// One choice of a `select` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Schema entry for one parameter.
///
/// Bounds are advisory. They are published for presentation layers and
/// never enforced at dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamDefault>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [ParamOption],
    /// Alternative names accepted from callers. The canonical name wins
    /// when both are given.
    #[serde(skip)]
    pub aliases: &'static [&'static str],
}

fn no_options(options: &&'static [ParamOption]) -> bool {
    options.is_empty()
}

impl ParameterSpec {
    /// A numeric parameter with a default and advisory bounds.
    pub const fn number(
        name: &'static str,
        label: &'static str,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            name,
            label,
            param_type: ParamType::Number,
            default: Some(ParamDefault::Number(default)),
            min: Some(min),
            max: Some(max),
            step: Some(step),
            options: &[],
            aliases: &[],
        }
    }

    /// A numeric parameter that is absent unless the caller supplies it.
    pub const fn optional_number(
        name: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            default: None,
            ..Self::number(name, label, 0.0, min, max, step)
        }
    }

    /// A select parameter. `default` should be one of `options`.
    pub const fn select(
        name: &'static str,
        label: &'static str,
        default: &'static str,
        options: &'static [ParamOption],
    ) -> Self {
        Self {
            name,
            label,
            param_type: ParamType::Select,
            default: Some(ParamDefault::Text(default)),
            min: None,
            max: None,
            step: None,
            options,
            aliases: &[],
        }
    }

    pub const fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    /// Caller value under the canonical name, else under the first alias given.
    fn lookup<'a>(&self, given: &'a ParamMap) -> Option<&'a ParamValue> {
        given
            .get(self.name)
            .or_else(|| self.aliases.iter().find_map(|alias| given.get(*alias)))
    }
}

/// Parameters for one dispatch: caller values merged over catalog defaults.
///
/// Unknown caller keys are dropped. Typed accessors do the domain checks
/// and report failures as `InvalidParameter` naming the parameter.
#[derive(Debug, Clone, Default)]
pub struct ResolvedParams {
    values: BTreeMap<&'static str, ParamValue>,
}

impl ResolvedParams {
    pub fn resolve(specs: &[ParameterSpec], given: &ParamMap) -> Self {
        let values = specs
            .iter()
            .filter_map(|spec| {
                let value = spec
                    .lookup(given)
                    .cloned()
                    .or_else(|| spec.default.map(ParamDefault::to_value))?;
                Some((spec.name, value))
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// A numeric parameter. Numeric strings are accepted.
    pub fn number(&self, name: &str) -> Result<f64, EngineError> {
        self.optional_number(name)?
            .ok_or_else(|| EngineError::invalid_parameter(name, "is required"))
    }

    pub fn optional_number(&self, name: &str) -> Result<Option<f64>, EngineError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ParamValue::Number(v)) => Ok(Some(*v)),
            Some(ParamValue::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| EngineError::invalid_parameter(name, format!("expected a number, got '{s}'"))),
        }
    }

    /// A window length: finite, whole and at least 1.
    pub fn period(&self, name: &str) -> Result<usize, EngineError> {
        let v = self.number(name)?;
        if !v.is_finite() || v < 1.0 {
            return Err(EngineError::invalid_parameter(name, format!("must be >= 1, got {v}")));
        }
        if v.fract() != 0.0 {
            return Err(EngineError::invalid_parameter(
                name,
                format!("must be a whole number, got {v}"),
            ));
        }
        Ok(v as usize)
    }

    /// A parameter as text. Numbers are rendered in their display form.
    pub fn text(&self, name: &str) -> Result<String, EngineError> {
        match self.values.get(name) {
            Some(ParamValue::Text(s)) => Ok(s.trim().to_string()),
            Some(ParamValue::Number(v)) => Ok(v.to_string()),
            None => Err(EngineError::invalid_parameter(name, "is required")),
        }
    }

    /// A select parameter parsed into its typed form.
    pub fn choice<T>(&self, name: &str) -> Result<T, EngineError>
    where
        T: FromStr<Err = String>,
    {
        self.text(name)?
            .parse::<T>()
            .map_err(|reason| EngineError::invalid_parameter(name, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceField;

    const SPECS: &[ParameterSpec] = &[
        ParameterSpec::number("fastPeriod", "Fast Period", 12.0, 1.0, 50.0, 1.0)
            .with_aliases(&["fastperiod"]),
        ParameterSpec::optional_number("nbdevup", "Upper Deviation", 0.1, 5.0, 0.1),
        ParameterSpec::select(
            "source",
            "Source",
            "close",
            &[
                ParamOption { value: "open", label: "Open" },
                ParamOption { value: "close", label: "Close" },
            ],
        ),
    ];

    fn given(pairs: &[(&str, ParamValue)]) -> ParamMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn defaults_fill_missing_values() {
        let p = ResolvedParams::resolve(SPECS, &ParamMap::new());
        assert_eq!(p.period("fastPeriod").unwrap(), 12);
        assert_eq!(p.optional_number("nbdevup").unwrap(), None);
        assert_eq!(p.choice::<PriceField>("source").unwrap(), PriceField::Close);
    }

    #[test]
    fn caller_wins_and_unknown_keys_are_ignored() {
        let p = ResolvedParams::resolve(
            SPECS,
            &given(&[("fastPeriod", ParamValue::Number(5.0)), ("bogus", ParamValue::Number(1.0))]),
        );
        assert_eq!(p.period("fastPeriod").unwrap(), 5);
        assert!(p.get("bogus").is_none());
    }

    #[test]
    fn alias_used_only_without_canonical_name() {
        let p = ResolvedParams::resolve(SPECS, &given(&[("fastperiod", ParamValue::Number(7.0))]));
        assert_eq!(p.period("fastPeriod").unwrap(), 7);

        let p = ResolvedParams::resolve(
            SPECS,
            &given(&[("fastperiod", ParamValue::Number(7.0)), ("fastPeriod", ParamValue::Number(3.0))]),
        );
        assert_eq!(p.period("fastPeriod").unwrap(), 3);
    }

    #[test]
    fn numeric_strings_are_numbers() {
        let p = ResolvedParams::resolve(SPECS, &given(&[("fastPeriod", "8".into())]));
        assert_eq!(p.period("fastPeriod").unwrap(), 8);
    }

    #[test]
    fn period_domain_errors() {
        for bad in [ParamValue::Number(0.0), ParamValue::Number(-3.0), ParamValue::Number(2.5), "abc".into()] {
            let p = ResolvedParams::resolve(SPECS, &given(&[("fastPeriod", bad)]));
            let err = p.period("fastPeriod").unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidParameter { ref name, .. } if name == "fastPeriod"),
                "unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn unknown_select_option_is_invalid() {
        let p = ResolvedParams::resolve(SPECS, &given(&[("source", "median".into())]));
        assert!(matches!(
            p.choice::<PriceField>("source"),
            Err(EngineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn spec_serializes_like_the_catalog_surface() {
        let json = serde_json::to_value(SPECS[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "fastPeriod",
                "label": "Fast Period",
                "type": "number",
                "default": 12.0,
                "min": 1.0,
                "max": 50.0,
                "step": 1.0
            })
        );
        let select = serde_json::to_value(SPECS[2]).unwrap();
        assert_eq!(select["type"], "select");
        assert_eq!(select["default"], "close");
        assert_eq!(select["options"][0]["value"], "open");
    }
}
