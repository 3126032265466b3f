use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TimeSeriesError;

/// A single resolved request: the column name to report and the code to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
    pub code: String,
}

impl Variable {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self { name: name.into(), code: code.into() }
    }

    /// A variable reported under its own code.
    pub fn bare(code: impl Into<String>) -> Self {
        let code = code.into();
        Self { name: code.clone(), code }
    }
}

/// Year → code mapping for one alias. Year keys are written as strings in JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct YearCodes(BTreeMap<i32, String>);

impl YearCodes {
    pub fn get(&self, year: i32) -> Option<&str> { self.0.get(&year).map(String::as_str) }
}

impl<const N: usize> From<[(i32, &str); N]> for YearCodes {
    fn from(pairs: [(i32, &str); N]) -> Self {
        Self(pairs.into_iter().map(|(year, code)| (year, code.to_string())).collect())
    }
}

impl TryFrom<BTreeMap<String, String>> for YearCodes {
    type Error = String;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(year, code)| year.trim().parse::<i32>()
                .map(|year| (year, code))
                .map_err(|_| format!("invalid year key {year:?}")))
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

impl From<YearCodes> for BTreeMap<String, String> {
    fn from(codes: YearCodes) -> Self {
        codes.0.into_iter().map(|(year, code)| (year.to_string(), code)).collect()
    }
}

/// Which variables to fetch, in the shapes users write them.
///
/// In JSON this accepts a string, a list of strings, an `{alias: code}` object,
/// or an `{alias: {year: code}}` object for datasets whose codes change between
/// vintages (e.g. `{"total_pop": {"2010": "P001001", "2020": "P1_001N"}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableSpec {
    Single(String),
    Multiple(Vec<String>),
    Named(BTreeMap<String, String>),
    PerYear(BTreeMap<String, YearCodes>),
}

impl VariableSpec {
    /// Resolve the concrete variable list to fetch for `year`.
    pub fn resolve(&self, year: i32) -> Result<Vec<Variable>, TimeSeriesError> {
        match self {
            VariableSpec::Single(code) => Ok(vec![Variable::bare(code)]),
            VariableSpec::Multiple(codes) => Ok(codes.iter().map(Variable::bare).collect()),
            VariableSpec::Named(aliases) => Ok(aliases.iter()
                .map(|(alias, code)| Variable::new(alias, code))
                .collect()),
            VariableSpec::PerYear(aliases) => aliases.iter()
                .map(|(alias, codes)| codes.get(year)
                    .map(|code| Variable::new(alias, code))
                    .ok_or_else(|| TimeSeriesError::MissingYearCode { alias: alias.clone(), year }))
                .collect(),
        }
    }
}

impl From<&str> for VariableSpec {
    fn from(code: &str) -> Self { VariableSpec::Single(code.to_string()) }
}

impl From<Vec<String>> for VariableSpec {
    fn from(codes: Vec<String>) -> Self { VariableSpec::Multiple(codes) }
}

impl<const N: usize> From<[(&str, &str); N]> for VariableSpec {
    fn from(pairs: [(&str, &str); N]) -> Self {
        VariableSpec::Named(pairs.into_iter()
            .map(|(alias, code)| (alias.to_string(), code.to_string()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_multiple_use_code_as_name() {
        let spec = VariableSpec::from("B01003_001");
        assert_eq!(spec.resolve(2020).unwrap(), vec![Variable::bare("B01003_001")]);

        let spec = VariableSpec::from(vec!["A".to_string(), "B".to_string()]);
        let names: Vec<_> = spec.resolve(2020).unwrap().into_iter().map(|v| v.name).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn per_year_resolves_each_vintage() {
        let spec: VariableSpec = serde_json::from_str(
            r#"{"total_pop": {"2010": "P001001", "2020": "P1_001N"}}"#
        ).unwrap();

        assert_eq!(spec.resolve(2010).unwrap(), vec![Variable::new("total_pop", "P001001")]);
        assert_eq!(spec.resolve(2020).unwrap(), vec![Variable::new("total_pop", "P1_001N")]);
    }

    #[test]
    fn per_year_missing_code_names_alias_and_year() {
        let spec: VariableSpec = serde_json::from_str(r#"{"total_pop": {"2010": "P001001"}}"#).unwrap();
        let err = spec.resolve(2015).unwrap_err();
        assert!(matches!(err, TimeSeriesError::MissingYearCode { ref alias, year: 2015 } if alias == "total_pop"));
    }

    #[test]
    fn json_shapes_pick_the_right_variant() {
        let single: VariableSpec = serde_json::from_str(r#""B01003_001""#).unwrap();
        assert!(matches!(single, VariableSpec::Single(_)));

        let named: VariableSpec = serde_json::from_str(r#"{"total_pop": "B01003_001"}"#).unwrap();
        assert!(matches!(named, VariableSpec::Named(_)));
    }

    #[test]
    fn per_year_rejects_non_numeric_year_keys() {
        let parsed = serde_json::from_str::<VariableSpec>(r#"{"total_pop": {"latest": "P1_001N"}}"#);
        assert!(parsed.is_err());
    }
}
