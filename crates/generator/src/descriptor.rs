//! The model-to-descriptor compiler
//!
//! Builds a `FileDescriptorSet` from a surface model: synthetic well-known
//! dependencies first, then recursively compiled external documents, then
//! the messages and the RPC service of the current document. The rendered
//! file is always last in the set; the descriptor pool relies on that order.

use crate::proto::{
    http_rule, FileDescriptorProto, FileDescriptorSet, HttpRule, MethodDescriptorProto,
    MethodOptions, ServiceDescriptorProto,
};
use crate::type_mapper::TypeMapper;
use crate::validator::ParameterValidator;
use crate::well_known::well_known_dependencies;
use openapi_grpc_transcoder_common::{
    capitalize, FieldDefinition, FieldPosition, GeneratorError, MethodDefinition, Result,
    SurfaceModel,
};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto, MessageOptions};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Loads an external OpenAPI description into its surface model.
///
/// Invoked synchronously once per unresolved dependency URL; implementations
/// decide how documents are fetched and parsed.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentLoader {
    fn load(&self, url: &str) -> Result<SurfaceModel>;
}

/// A loader for models without external references.
pub struct NoExternalDocuments;

impl DocumentLoader for NoExternalDocuments {
    fn load(&self, url: &str) -> Result<SurfaceModel> {
        Err(GeneratorError::ExternalFetch {
            url: url.to_string(),
            reason: "no document loader configured".to_string(),
        })
    }
}

/// State owned by one top-level generation run and threaded through
/// recursive external-document compilation. Created fresh per invocation so
/// repeated and concurrent runs never share it.
#[derive(Debug, Default)]
pub struct GeneratorContext {
    /// Short message name to fully-qualified name, for resolving references
    /// that originate from another (externally included) package.
    generated_messages: HashMap<String, String>,

    /// External document URLs (fragment-stripped) already compiled in this
    /// run; guards against cycles and duplicate type definitions.
    processed_dependencies: HashSet<String>,
}

/// Compiles one surface model into a `FileDescriptorSet`
pub struct DescriptorBuilder<'a, L: DocumentLoader> {
    model: &'a SurfaceModel,
    package: String,
    loader: &'a L,
}

impl<'a, L: DocumentLoader> DescriptorBuilder<'a, L> {
    pub fn new(model: &'a SurfaceModel, package: &str, loader: &'a L) -> Self {
        DescriptorBuilder {
            model,
            package: package.to_string(),
            loader,
        }
    }

    /// Run the compiler. Any type-mapper or validator failure aborts the
    /// whole run; no partial descriptor set is returned.
    pub fn build(&self) -> Result<FileDescriptorSet> {
        let mut ctx = GeneratorContext::default();
        self.build_with_context(&mut ctx)
    }

    /// Run the compiler with caller-owned context, allowing several related
    /// documents to share one name registry and dependency dedup set.
    pub fn build_with_context(&self, ctx: &mut GeneratorContext) -> Result<FileDescriptorSet> {
        let mut set = FileDescriptorSet {
            file: well_known_dependencies(),
        };
        self.resolve_external_dependencies(&mut set, ctx)?;

        let mut main = FileDescriptorProto {
            name: Some(format!("{}.proto", self.package)),
            package: Some(self.package.clone()),
            syntax: Some("proto3".to_string()),
            ..Default::default()
        };
        self.build_messages(&mut main, ctx)?;
        self.build_service(&mut main)?;

        // The import list of the rendered file names every other file in
        // the set.
        main.dependency = set.file.iter().filter_map(|f| f.name.clone()).collect();
        set.file.push(main);
        Ok(set)
    }

    /// Recursively compile every distinct external document exactly once and
    /// splice its files in before the current one.
    fn resolve_external_dependencies(
        &self,
        set: &mut FileDescriptorSet,
        ctx: &mut GeneratorContext,
    ) -> Result<()> {
        for url in trim_and_dedup(&self.model.dependencies) {
            if !ctx.processed_dependencies.insert(url.clone()) {
                continue;
            }

            let external_model = self.loader.load(&url)?;
            let package = package_from_url(&url);
            let nested = DescriptorBuilder::new(&external_model, &package, self.loader)
                .build_with_context(ctx)?;

            for file in nested.file {
                if !set.file.iter().any(|f| f.name == file.name) {
                    set.file.push(file);
                }
            }
        }
        Ok(())
    }

    /// Emit one message per surface type. Fields of request-parameter types
    /// are validated (and possibly flattened) first, because flattening
    /// rewrites the shape the type mapper sees.
    fn build_messages(
        &self,
        file: &mut FileDescriptorProto,
        ctx: &mut GeneratorContext,
    ) -> Result<()> {
        for t in &self.model.types {
            let message_name = capitalize(&t.name);
            let mut message = DescriptorProto {
                name: Some(message_name.clone()),
                ..Default::default()
            };

            for (i, field) in t.fields.iter().enumerate() {
                let field = if t.request_parameters {
                    match field.position {
                        FieldPosition::Path => {
                            ParameterValidator::validate_path_parameter(field, self.model)?
                        }
                        FieldPosition::Query => {
                            ParameterValidator::validate_query_parameter(field)?
                        }
                        _ => field.clone(),
                    }
                } else {
                    field.clone()
                };

                let mut descriptor = FieldDescriptorProto {
                    name: Some(TypeMapper::field_name(&field)),
                    number: Some(i as i32 + 1),
                    label: Some(TypeMapper::label(&field) as i32),
                    r#type: Some(TypeMapper::proto_type(&field)? as i32),
                    type_name: TypeMapper::type_name(&field, &self.package, &ctx.generated_messages),
                    ..Default::default()
                };

                if field.is_map() {
                    let entry = map_entry_descriptor(&field)?;
                    descriptor.type_name = entry.name.clone();
                    message.nested_type.push(entry);
                }
                message.field.push(descriptor);
            }

            ctx.generated_messages.insert(
                message_name.clone(),
                format!("{}.{}", self.package, message_name),
            );
            file.message_type.push(message);
        }
        Ok(())
    }

    /// Emit one RPC service named after the package, with the gRPC-HTTP
    /// transcoding options set for every method.
    fn build_service(&self, file: &mut FileDescriptorProto) -> Result<()> {
        let mut service = ServiceDescriptorProto {
            name: Some(capitalize(&self.package)),
            method: Vec::new(),
        };

        for method in &self.model.methods {
            let body = self.request_body_field(&method.parameters_type_name)?;
            let rule = http_rule_for_method(method, body);

            service.method.push(MethodDescriptorProto {
                name: Some(method.name.clone()),
                input_type: Some(message_type_or_empty(&method.parameters_type_name)),
                output_type: Some(message_type_or_empty(&method.responses_type_name)),
                options: Some(MethodOptions { http: Some(rule) }),
                ..Default::default()
            });
        }

        file.service.push(service);
        Ok(())
    }

    /// The name of the body-position field of the request-parameter type, if
    /// any; it becomes the HTTP rule's body selector.
    fn request_body_field(&self, parameters_type_name: &str) -> Result<Option<String>> {
        if parameters_type_name.is_empty() {
            return Ok(None);
        }
        let Some(t) = self.model.type_by_name(parameters_type_name)? else {
            return Ok(None);
        };
        Ok(t.fields
            .iter()
            .find(|f| f.position == FieldPosition::Body)
            .map(|f| f.name.clone()))
    }
}

/// Default to `google.protobuf.Empty` when a method has no parameter or
/// response type.
fn message_type_or_empty(type_name: &str) -> String {
    if type_name.is_empty() {
        "google.protobuf.Empty".to_string()
    } else {
        capitalize(type_name)
    }
}

/// Select the HTTP rule pattern variant by the method's verb.
fn http_rule_for_method(method: &MethodDefinition, body: Option<String>) -> HttpRule {
    let path = method.path.clone();
    let pattern = match method.http_method.as_str() {
        "GET" => Some(http_rule::Pattern::Get(path)),
        "PUT" => Some(http_rule::Pattern::Put(path)),
        "POST" => Some(http_rule::Pattern::Post(path)),
        "DELETE" => Some(http_rule::Pattern::Delete(path)),
        "PATCH" => Some(http_rule::Pattern::Patch(path)),
        _ => None,
    };
    HttpRule {
        pattern,
        body: body.unwrap_or_default(),
        ..Default::default()
    }
}

/// A protobuf map is a repeated nested message with `key` and `value`
/// fields and the map-entry option set.
fn map_entry_descriptor(field: &FieldDefinition) -> Result<DescriptorProto> {
    let value_type = map_value_type(&field.field_type)?;

    let key_field = FieldDescriptorProto {
        name: Some("key".to_string()),
        number: Some(1),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::String as i32),
        ..Default::default()
    };

    let (value_proto_type, value_type_name) = match TypeMapper::scalar_type(value_type) {
        Some(scalar) => (scalar, None),
        None => (Type::Message, Some(capitalize(value_type))),
    };
    let value_field = FieldDescriptorProto {
        name: Some("value".to_string()),
        number: Some(2),
        label: Some(Label::Optional as i32),
        r#type: Some(value_proto_type as i32),
        type_name: value_type_name,
        ..Default::default()
    };

    Ok(DescriptorProto {
        name: Some(format!("{}Entry", capitalize(&field.name))),
        field: vec![key_field, value_field],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Decode the value type of a `map[string]<V>` surface type string. Nested
/// map and array value types cannot be represented as a protobuf map entry.
fn map_value_type(field_type: &str) -> Result<&str> {
    let unsupported = || GeneratorError::UnsupportedMapValueType(field_type.to_string());
    let value = field_type.strip_prefix("map[string]").ok_or_else(unsupported)?.trim();
    if value.is_empty() || value.contains("[]") || value.starts_with("map[") {
        return Err(unsupported());
    }
    Ok(value)
}

/// Strip fragments from external document URLs and deduplicate while
/// preserving declaration order.
fn trim_and_dedup(dependencies: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for dependency in dependencies {
        let base = dependency.split('#').next().unwrap_or(dependency).to_string();
        if !result.contains(&base) {
            result.push(base);
        }
    }
    result
}

/// Derive the package name of an external document from its base filename
/// without extension.
fn package_from_url(url: &str) -> String {
    Path::new(url)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(url)
        .to_string()
}
