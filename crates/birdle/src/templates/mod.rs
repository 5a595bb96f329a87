pub mod fragments;
pub mod layouts;
