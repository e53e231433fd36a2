pub mod duration;
pub mod editor;
pub mod holding;
pub mod performance;
pub mod price;
pub mod settings;
