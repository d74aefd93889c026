//! Scene assembly, configuration and export

pub mod area;
pub mod assembler;
pub mod config;
pub mod obj;

pub use area::{Area, FIRST_AREA_NO};
pub use assembler::Scene;
pub use config::{SceneConfig, SceneParams};
pub use obj::export_obj;
