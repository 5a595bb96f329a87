//! Field cleaning for the region filter form

use crate::{Choice, Field, FieldError, FilterChoices, FormErrors, RegionFilter, RegionFilterSubmission};

/// Splits a comma separated allow-list into bird names.
///
/// The first entry is kept exactly as typed; every later entry loses its
/// leading whitespace only.
pub fn split_allow_list(allow_list: &str) -> Vec<String> {
    let mut entries = allow_list.split(',');
    let first = entries.next().unwrap_or_default().to_string();

    std::iter::once(first)
        .chain(entries.map(|entry| entry.trim_start().to_string()))
        .collect()
}

/// Cleans a required drop-down value against its choices
pub fn clean_choice(value: Option<&str>, choices: &[Choice]) -> Result<String, FieldError> {
    let value = match value {
        Some(value) if !value.is_empty() => value,
        _ => return Err(FieldError::Required),
    };

    if choices.iter().any(|choice| choice.value == value) {
        Ok(value.to_string())
    } else {
        Err(FieldError::InvalidChoice(value.to_string()))
    }
}

/// Runs field level cleaning for every field of the form.
/// The store is not consulted beyond the choices passed in.
pub fn clean_fields(
    submission: &RegionFilterSubmission,
    choices: &FilterChoices,
) -> Result<RegionFilter, FormErrors> {
    let mut errors = FormErrors::default();

    let region = clean_choice(submission.region.as_deref(), &choices.regions)
        .map_err(|e| errors.add_field(Field::Region, e))
        .ok();
    let family = clean_choice(submission.family.as_deref(), &choices.families)
        .map_err(|e| errors.add_field(Field::Family, e))
        .ok();
    // Whole value is stripped before the per-entry split
    let allow_list = submission
        .allow_list
        .as_deref()
        .map(|value| value.trim().to_string())
        .unwrap_or_default();

    match (region, family) {
        (Some(region), Some(family)) if errors.is_empty() => Ok(RegionFilter {
            region,
            family,
            allow_list,
        }),
        _ => Err(errors),
    }
}
