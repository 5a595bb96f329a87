pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod startup;
pub mod templates;

pub use api::routes::*;
pub use config::*;
pub use domain::{
    BirdRegionQuery, BirdRegionRepository, BirdStore, Error as BirdleError,
    RegionFilterValidator,
};
pub use infra::db::*;
pub use startup::*;
