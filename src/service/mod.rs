pub mod diagnose_service;
pub mod style_service;
