pub mod region_filter_form;

pub use region_filter_form::{filter_accepted, region_filter_form};
