pub mod batch;
pub mod catalog;
pub mod dashboard;
pub mod history;
pub mod location;
