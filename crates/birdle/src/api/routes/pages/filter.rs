use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{ErrorResponse, Html},
    Form,
};
use birdle_core::RegionFilterSubmission;
use log::{debug, error};
use maud::Markup;

use crate::{
    domain::Error,
    startup::AppState,
    templates::{
        fragments::{filter_accepted, region_filter_form},
        layouts::base::{base, PageConfig},
    },
};

/// Wraps a fragment in the base layout unless the request came from HTMX
fn render_fragment(headers: &HeaderMap, state: &AppState, content: Markup) -> Html<String> {
    let is_htmx = headers.get("HX-Request").is_some();

    if is_htmx {
        Html(content.into_string())
    } else {
        let config = PageConfig {
            title: &state.title,
        };
        Html(base(&config, content).into_string())
    }
}

/// Home page with an empty filter form
pub async fn filter_page_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ErrorResponse> {
    let choices = state.validator().choices().await.map_err(|e| {
        error!("Failed to populate filter choices: {}", e);
        e
    })?;

    let config = PageConfig {
        title: &state.title,
    };
    let content = region_filter_form(&choices, &RegionFilterSubmission::default(), None);
    Ok(Html(base(&config, content).into_string()))
}

/// Filter form fragment (full page on direct navigation)
pub async fn filter_form_fragment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Html<String>, ErrorResponse> {
    let choices = state.validator().choices().await.map_err(|e| {
        error!("Failed to populate filter choices: {}", e);
        e
    })?;

    let content = region_filter_form(&choices, &RegionFilterSubmission::default(), None);
    Ok(render_fragment(&headers, &state, content))
}

/// Form submission. Validation failures re-render the form with its errors.
pub async fn submit_filter_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(submission): Form<RegionFilterSubmission>,
) -> Result<Html<String>, ErrorResponse> {
    debug!("filter form submitted: {:?}", submission);
    let validator = state.validator();
    let choices = validator.choices().await?;

    let content = match validator.validate(&choices, &submission).await {
        Ok(filter) => filter_accepted(&filter, &choices, &submission),
        Err(Error::Validation(errors)) => region_filter_form(&choices, &submission, Some(&errors)),
        Err(e) => {
            error!("Failed to validate filter: {}", e);
            return Err(e.into());
        }
    };

    Ok(render_fragment(&headers, &state, content))
}
