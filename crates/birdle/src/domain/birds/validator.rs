use std::sync::Arc;

use birdle_core::{clean_fields, FilterChoices, RegionFilter, RegionFilterSubmission};
use log::{debug, info};

use super::{BirdRegionQuery, BirdRegionRepository};
use crate::domain::Error;

/// Validates region filter submissions against the sightings store.
///
/// Built per request; holds no state beyond the repository handle.
pub struct RegionFilterValidator {
    repository: Arc<dyn BirdRegionRepository>,
}

impl RegionFilterValidator {
    pub fn new(repository: Arc<dyn BirdRegionRepository>) -> Self {
        Self { repository }
    }

    /// Region and family drop-down options, drawn live from the store
    pub async fn choices(&self) -> Result<FilterChoices, Error> {
        let region_names = self.repository.region_names().await?;
        let families = self.repository.bird_families().await?;
        debug!(
            "populated {} regions and {} families",
            region_names.len(),
            families.len()
        );

        Ok(FilterChoices::from_values(region_names, families))
    }

    /// Field cleaning followed by the store checks.
    /// Field errors short-circuit before any existence query runs.
    pub async fn validate(
        &self,
        choices: &FilterChoices,
        submission: &RegionFilterSubmission,
    ) -> Result<RegionFilter, Error> {
        let filter = clean_fields(submission, choices).map_err(|errors| {
            info!("region filter rejected at field level: {}", errors);
            Error::Validation(errors)
        })?;

        self.clean(filter).await
    }

    /// Populates choices and validates in one go, for callers that do not render the form
    pub async fn validate_submission(
        &self,
        submission: &RegionFilterSubmission,
    ) -> Result<RegionFilter, Error> {
        let choices = self.choices().await?;
        self.validate(&choices, submission).await
    }

    /// Confirms the cleaned filter matches at least one bird_region record,
    /// first by region and family, then by the allow-list.
    pub async fn clean(&self, filter: RegionFilter) -> Result<RegionFilter, Error> {
        let query = BirdRegionQuery::for_filter(&filter);

        if !self.repository.bird_region_exists(&query).await? {
            let err = filter.no_bird_regions();
            info!("region filter rejected: {}", err);
            return Err(err.into());
        }

        if let Some(bird_names) = filter.allowed_birds() {
            debug!("narrowing to allow-list {:?}", bird_names);
            let query = query.with_bird_names(bird_names);

            if !self.repository.bird_region_exists(&query).await? {
                let err = filter.no_allowed_birds();
                info!("region filter rejected: {}", err);
                return Err(err.into());
            }
        }

        Ok(filter)
    }
}
