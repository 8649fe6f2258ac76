pub mod coordinate;
pub mod geometry;
pub mod image;
pub mod temp_file;
