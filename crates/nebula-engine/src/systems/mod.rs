pub mod audio;
pub mod particles;
pub mod screen;
pub mod ships;
