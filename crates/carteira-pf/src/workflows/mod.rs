pub mod import;
pub mod portfolio;
