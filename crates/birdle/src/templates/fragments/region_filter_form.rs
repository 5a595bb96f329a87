use birdle_core::{Choice, Field, FilterChoices, FormErrors, RegionFilter, RegionFilterSubmission};
use maud::{html, Markup};

/// Region filter form.
///
/// Posts through HTMX and swaps itself; plain form submission still works
/// without JS since the route renders a full page for non-HTMX requests.
pub fn region_filter_form(
    choices: &FilterChoices,
    submission: &RegionFilterSubmission,
    errors: Option<&FormErrors>,
) -> Markup {
    let field_error = |field: Field| errors.and_then(|errors| errors.field(field));

    html! {
        div id="filterContainer" class="box" {
            @if let Some(filter_error) = errors.and_then(|errors| errors.filter.as_ref()) {
                div class="notification is-danger non-field-errors" {
                    (filter_error.to_string())
                }
            }

            form id="regionFilterForm" method="post" action="/filter"
                 hx-post="/filter"
                 hx-target="#filterContainer"
                 hx-swap="outerHTML" {
                (select_field(
                    Field::Region,
                    "Region",
                    &choices.regions,
                    submission.region.as_deref(),
                    field_error(Field::Region).map(|e| e.to_string()),
                ))
                (select_field(
                    Field::Family,
                    "Family",
                    &choices.families,
                    submission.family.as_deref(),
                    field_error(Field::Family).map(|e| e.to_string()),
                ))

                div class="field" {
                    label class="label" for="id_allow_list" { "Allow list" }
                    div class="control" {
                        textarea id="id_allow_list" name="allow_list" class="form-control textarea"
                                 placeholder="Comma separated bird names" {
                            (submission.allow_list.as_deref().unwrap_or_default())
                        }
                    }
                }

                div class="field" {
                    div class="control" {
                        button type="submit" class="button is-info" { "Filter" }
                    }
                }
            }
        }
    }
}

fn select_field(
    field: Field,
    label: &str,
    choices: &[Choice],
    selected: Option<&str>,
    error: Option<String>,
) -> Markup {
    let id = format!("id_{}", field.as_str());

    html! {
        div class="field" {
            label class="label" for=(id) { (label) }
            div class="control" {
                div class="select" {
                    select id=(id) name=(field.as_str()) class="form-control" {
                        @for choice in choices {
                            option value=(choice.value) selected[selected == Some(choice.value.as_str())] {
                                (choice.label)
                            }
                        }
                    }
                }
            }
            @if let Some(error) = error {
                p class="help is-danger" { (error) }
            }
        }
    }
}

/// Accepted filter shown above a fresh copy of the form
pub fn filter_accepted(
    filter: &RegionFilter,
    choices: &FilterChoices,
    submission: &RegionFilterSubmission,
) -> Markup {
    html! {
        div id="filterContainer" {
            div class="notification is-success" {
                button class="delete" onclick="this.parentElement.remove()" {}
                p { strong { "Region: " } (filter.region) }
                p { strong { "Family: " } (filter.family) }
                @if let Some(birds) = filter.allowed_birds() {
                    p { strong { "Birds: " } (birds.join(", ")) }
                }
            }
            (region_filter_form(choices, submission, None))
        }
    }
}
