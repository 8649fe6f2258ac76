pub mod diagnose_state;
pub mod style_state;
