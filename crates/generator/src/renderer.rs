//! Pretty-printing of a descriptor set as `.proto` source text
//!
//! The whole set is first loaded into a `prost_reflect::DescriptorPool`,
//! which performs full cross-file reference validation; a dangling message
//! or enum type name is reported as `UnresolvableReference`. After that the
//! last file of the set (the rendered target, by construction) is projected
//! to text. Printing never alters descriptor semantics.

use crate::proto::{http_rule, FileDescriptorProto, FileDescriptorSet, HttpRule};
use openapi_grpc_transcoder_common::{GeneratorError, Result};
use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, EnumDescriptorProto, FieldDescriptorProto};
use std::fmt::Write;

/// Serializes the target file of a descriptor set to canonical proto3 text
pub struct ProtoRenderer;

impl ProtoRenderer {
    /// Render the last file of the set, the other files being its
    /// dependencies.
    pub fn render(set: &FileDescriptorSet) -> Result<Vec<u8>> {
        // Pool assembly resolves every type name across the set.
        DescriptorPool::decode(set.encode_to_vec().as_slice())
            .map_err(|e| GeneratorError::UnresolvableReference(e.to_string()))?;

        let target = set.file.last().ok_or_else(|| {
            GeneratorError::UnresolvableReference("descriptor set contains no files".to_string())
        })?;

        let mut out = String::new();
        Self::print_file(&mut out, target);
        Ok(out.into_bytes())
    }

    fn print_file(out: &mut String, file: &FileDescriptorProto) {
        let package = file.package.as_deref().unwrap_or_default();

        if let Some(syntax) = &file.syntax {
            let _ = writeln!(out, "syntax = \"{syntax}\";");
            out.push('\n');
        }
        if !package.is_empty() {
            let _ = writeln!(out, "package {package};");
            out.push('\n');
        }
        for dependency in &file.dependency {
            let _ = writeln!(out, "import \"{dependency}\";");
        }
        if !file.dependency.is_empty() {
            out.push('\n');
        }

        for service in &file.service {
            let _ = writeln!(out, "service {} {{", service.name.as_deref().unwrap_or_default());
            for method in &service.method {
                Self::print_method(out, method, package);
            }
            out.push_str("}\n\n");
        }

        for message in &file.message_type {
            Self::print_message(out, message, package, 0);
        }
        for enum_type in &file.enum_type {
            Self::print_enum(out, enum_type, 0);
        }

        // Drop the trailing blank line after the last block.
        while out.ends_with("\n\n") {
            out.pop();
        }
    }

    fn print_method(out: &mut String, method: &crate::proto::MethodDescriptorProto, package: &str) {
        let name = method.name.as_deref().unwrap_or_default();
        let input = display_type_name(method.input_type.as_deref().unwrap_or_default(), package);
        let output = display_type_name(method.output_type.as_deref().unwrap_or_default(), package);

        let rule = method.options.as_ref().and_then(|o| o.http.as_ref());
        match rule {
            Some(rule) => {
                let _ = writeln!(out, "  rpc {name} ( {input} ) returns ( {output} ) {{");
                let _ = writeln!(out, "    option (google.api.http) = {};", http_rule_literal(rule));
                out.push_str("  }\n");
            }
            None => {
                let _ = writeln!(out, "  rpc {name} ( {input} ) returns ( {output} );");
            }
        }
    }

    fn print_message(out: &mut String, message: &DescriptorProto, package: &str, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = writeln!(
            out,
            "{indent}message {} {{",
            message.name.as_deref().unwrap_or_default()
        );
        // Map-entry messages are declared before the fields referring to
        // them, matching protoc's canonical print order for nested types.
        for nested in &message.nested_type {
            Self::print_message(out, nested, package, depth + 1);
        }
        for field in &message.field {
            Self::print_field(out, field, package, depth + 1);
        }
        let _ = writeln!(out, "{indent}}}");
        if depth == 0 {
            out.push('\n');
        }
    }

    fn print_field(out: &mut String, field: &FieldDescriptorProto, package: &str, depth: usize) {
        let indent = "  ".repeat(depth);
        let repeated = if field.label == Some(Label::Repeated as i32) {
            "repeated "
        } else {
            ""
        };
        let type_token = match field.type_name.as_deref() {
            Some(type_name) => display_type_name(type_name, package),
            None => scalar_keyword(field.r#type.unwrap_or_default()).to_string(),
        };
        let _ = writeln!(
            out,
            "{indent}{repeated}{type_token} {} = {};",
            field.name.as_deref().unwrap_or_default(),
            field.number.unwrap_or_default()
        );
    }

    fn print_enum(out: &mut String, enum_type: &EnumDescriptorProto, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = writeln!(
            out,
            "{indent}enum {} {{",
            enum_type.name.as_deref().unwrap_or_default()
        );
        for value in &enum_type.value {
            let _ = writeln!(
                out,
                "{indent}  {} = {};",
                value.name.as_deref().unwrap_or_default(),
                value.number.unwrap_or_default()
            );
        }
        let _ = writeln!(out, "{indent}}}");
        if depth == 0 {
            out.push('\n');
        }
    }
}

/// Strip the leading dot and the current package prefix so type names print
/// the way they were written in source.
fn display_type_name(type_name: &str, package: &str) -> String {
    let name = type_name.strip_prefix('.').unwrap_or(type_name);
    let local_prefix = format!("{package}.");
    match name.strip_prefix(&local_prefix) {
        Some(local) if !package.is_empty() => local.to_string(),
        _ => name.to_string(),
    }
}

/// The single-line option literal for an HTTP rule, e.g.
/// `{ post: "/shelves" body: "shelf" }`.
fn http_rule_literal(rule: &HttpRule) -> String {
    let mut parts = Vec::new();
    if let Some(pattern) = &rule.pattern {
        let (verb, path) = match pattern {
            http_rule::Pattern::Get(path) => ("get", path),
            http_rule::Pattern::Put(path) => ("put", path),
            http_rule::Pattern::Post(path) => ("post", path),
            http_rule::Pattern::Delete(path) => ("delete", path),
            http_rule::Pattern::Patch(path) => ("patch", path),
            http_rule::Pattern::Custom(custom) => ("custom", &custom.path),
        };
        parts.push(format!("{verb}: \"{path}\""));
    }
    if !rule.body.is_empty() {
        parts.push(format!("body: \"{}\"", rule.body));
    }
    if !rule.response_body.is_empty() {
        parts.push(format!("response_body: \"{}\"", rule.response_body));
    }
    if parts.is_empty() {
        "{ }".to_string()
    } else {
        format!("{{ {} }}", parts.join(" "))
    }
}

fn scalar_keyword(r#type: i32) -> &'static str {
    match Type::try_from(r#type) {
        Ok(Type::Double) => "double",
        Ok(Type::Float) => "float",
        Ok(Type::Int64) => "int64",
        Ok(Type::Uint64) => "uint64",
        Ok(Type::Int32) => "int32",
        Ok(Type::Fixed64) => "fixed64",
        Ok(Type::Fixed32) => "fixed32",
        Ok(Type::Bool) => "bool",
        Ok(Type::String) => "string",
        Ok(Type::Bytes) => "bytes",
        Ok(Type::Uint32) => "uint32",
        Ok(Type::Sfixed32) => "sfixed32",
        Ok(Type::Sfixed64) => "sfixed64",
        Ok(Type::Sint32) => "sint32",
        Ok(Type::Sint64) => "sint64",
        _ => "string",
    }
}
