pub mod animation;
pub mod backend;
pub mod graph;
pub mod particles;
pub mod skeleton;
pub mod types;
