pub mod diagnose;
pub mod generate_style;
