pub mod diagnose_model;
pub mod style_model;
