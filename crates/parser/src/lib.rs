//! OpenAPI 3 parsing for the transcoder
//!
//! Loads OpenAPI descriptions (YAML or JSON), projects them onto the surface
//! model consumed by the descriptor generator, and checks documents for
//! features the generator does not translate.

mod checker;
mod document;
mod parser;
mod surface;

pub use checker::FeatureChecker;
pub use document::*;
pub use parser::OpenApiParser;
pub use surface::build_surface_model;
