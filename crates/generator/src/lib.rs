//! Protobuf descriptor generation for OpenAPI gRPC transcoding
//!
//! This crate compiles a surface model of an OpenAPI description into a
//! protobuf `FileDescriptorSet` whose RPC methods carry `google.api.http`
//! transcoding options, and renders the resulting target file as `.proto`
//! source text.
//!
//! The pipeline: [`DescriptorBuilder`] maps the surface model's types and
//! methods to descriptors, validating path/query parameters and resolving
//! external documents through a [`DocumentLoader`]; [`ProtoRenderer`]
//! assembles the set in a descriptor pool and pretty-prints the target file.

mod descriptor;
pub mod proto;
mod renderer;
mod type_mapper;
mod validator;
pub mod well_known;

pub use descriptor::{DescriptorBuilder, DocumentLoader, GeneratorContext, NoExternalDocuments};
pub use renderer::ProtoRenderer;
pub use type_mapper::TypeMapper;
pub use validator::ParameterValidator;
