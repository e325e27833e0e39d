// Output generation module

pub mod plantuml;
pub mod renderer;

pub use plantuml::{PlantUmlEmitter, STYLE_DIRECTIVES};
pub use renderer::Renderer;
