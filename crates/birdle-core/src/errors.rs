//! Form error types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key used for errors that belong to the whole form rather than one field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Fields of the region filter form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Region,
    Family,
    AllowList,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Region => "region",
            Field::Family => "family",
            Field::AllowList => "allow_list",
        }
    }
}

/// Errors raised while cleaning a single field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("This field is required.")]
    Required,

    #[error("Select a valid choice. {0} is not one of the available choices.")]
    InvalidChoice(String),
}

/// Errors raised when the cleaned filter matches nothing in the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("{family} have not been found in the {region} region.")]
    NoBirdRegions { region: String, family: String },

    #[error("None of the specified birds in {family} have been found in the {region} region.")]
    NoAllowedBirds { region: String, family: String },
}

/// Everything that went wrong with one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub fields: BTreeMap<Field, FieldError>,
    pub filter: Option<FilterError>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.filter.is_none()
    }

    pub fn add_field(&mut self, field: Field, error: FieldError) {
        self.fields.insert(field, error);
    }

    pub fn field(&self, field: Field) -> Option<&FieldError> {
        self.fields.get(&field)
    }

    /// Messages keyed by field name, with form-wide errors under [`NON_FIELD_ERRORS`]
    pub fn messages(&self) -> BTreeMap<String, Vec<String>> {
        let mut messages: BTreeMap<String, Vec<String>> = self
            .fields
            .iter()
            .map(|(field, error)| (field.as_str().to_string(), vec![error.to_string()]))
            .collect();

        if let Some(filter) = &self.filter {
            messages
                .entry(NON_FIELD_ERRORS.to_string())
                .or_default()
                .push(filter.to_string());
        }
        messages
    }
}

impl From<FilterError> for FormErrors {
    fn from(error: FilterError) -> Self {
        Self {
            fields: BTreeMap::new(),
            filter: Some(error),
        }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self
            .messages()
            .into_iter()
            .map(|(key, errors)| format!("{}: {}", key, errors.join(" ")))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}
