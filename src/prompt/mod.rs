//! Prompt templates and the renderer that fills them

mod renderer;
pub mod templates;

pub use renderer::{PlaceholderRenderer, TemplateError, TemplateId, TemplateRenderer};
