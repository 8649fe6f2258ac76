pub mod diagnose_handler;
pub mod generate_style_handler;
pub mod multipart_fields;
