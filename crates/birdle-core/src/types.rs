//! Shared types for the region filter form

use serde::{Deserialize, Serialize};

use crate::{split_allow_list, FilterError};

/// Sentinel value meaning "no restriction" for every field of the form
pub const ANY: &str = "Any";
pub const ANY_REGION_LABEL: &str = "Any Region";
pub const ANY_FAMILY_LABEL: &str = "Any Family";

/// One option of a drop-down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    /// A choice whose label is its value
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    pub fn any(label: &str) -> Self {
        Self {
            value: ANY.to_string(),
            label: label.to_string(),
        }
    }

    pub fn is_any(&self) -> bool {
        self.value == ANY
    }
}

/// Selectable options for the region and family drop-downs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChoices {
    pub regions: Vec<Choice>,
    pub families: Vec<Choice>,
}

impl FilterChoices {
    /// Builds both lists from raw store values.
    /// Values are deduplicated and sorted ascending, then prefixed with the `Any` sentinel.
    pub fn from_values(region_names: Vec<String>, families: Vec<String>) -> Self {
        Self {
            regions: choice_list(ANY_REGION_LABEL, region_names),
            families: choice_list(ANY_FAMILY_LABEL, families),
        }
    }

    pub fn has_region(&self, value: &str) -> bool {
        self.regions.iter().any(|choice| choice.value == value)
    }

    pub fn has_family(&self, value: &str) -> bool {
        self.families.iter().any(|choice| choice.value == value)
    }
}

fn choice_list(any_label: &str, mut values: Vec<String>) -> Vec<Choice> {
    values.sort();
    values.dedup();

    std::iter::once(Choice::any(any_label))
        .chain(values.into_iter().map(Choice::new))
        .collect()
}

/// Raw values as submitted by the browser or an API client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFilterSubmission {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub allow_list: Option<String>,
}

impl RegionFilterSubmission {
    pub fn new(region: &str, family: &str, allow_list: &str) -> Self {
        Self {
            region: Some(region.to_string()),
            family: Some(family.to_string()),
            allow_list: Some(allow_list.to_string()),
        }
    }
}

/// Cleaned filter values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFilter {
    pub region: String,
    pub family: String,
    pub allow_list: String,
}

impl RegionFilter {
    /// Region to narrow by, `None` for the `Any` sentinel
    pub fn region_name(&self) -> Option<&str> {
        (self.region != ANY).then_some(self.region.as_str())
    }

    /// Family to narrow by, `None` for the `Any` sentinel
    pub fn family_name(&self) -> Option<&str> {
        (self.family != ANY).then_some(self.family.as_str())
    }

    /// Bird names of the allow-list, `None` when the list places no restriction
    pub fn allowed_birds(&self) -> Option<Vec<String>> {
        if self.allow_list.is_empty() || self.allow_list == ANY {
            return None;
        }
        Some(split_allow_list(&self.allow_list))
    }

    pub fn no_bird_regions(&self) -> FilterError {
        FilterError::NoBirdRegions {
            region: self.region.clone(),
            family: self.family.clone(),
        }
    }

    pub fn no_allowed_birds(&self) -> FilterError {
        FilterError::NoAllowedBirds {
            region: self.region.clone(),
            family: self.family.clone(),
        }
    }
}
