//! Hand-written protobuf wire types
//!
//! `prost` has no extension support and `prost-types` drops unknown fields on
//! decode, so the `google.api.http` extension on `MethodOptions` cannot be
//! carried through the stock descriptor structs. The file/service/method
//! chain of `descriptor.proto` is mirrored here with wire-compatible `prost`
//! derives instead; message, field and enum descriptors are the stock
//! `prost-types` ones. Everything encodes byte-identically to the standard
//! descriptor messages, so `prost_reflect::DescriptorPool::decode` accepts
//! the output directly.

/// Field number of the `google.api.http` extension on
/// `google.protobuf.MethodOptions`.
pub const HTTP_EXTENSION_NUMBER: i32 = 72_295_728;

/// A set of descriptor files. Mirrors `google.protobuf.FileDescriptorSet`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileDescriptorSet {
    #[prost(message, repeated, tag = "1")]
    pub file: Vec<FileDescriptorProto>,
}

/// Mirrors `google.protobuf.FileDescriptorProto` for the fields this
/// compiler emits.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub package: Option<String>,
    #[prost(string, repeated, tag = "3")]
    pub dependency: Vec<String>,
    #[prost(message, repeated, tag = "4")]
    pub message_type: Vec<prost_types::DescriptorProto>,
    #[prost(message, repeated, tag = "5")]
    pub enum_type: Vec<prost_types::EnumDescriptorProto>,
    #[prost(message, repeated, tag = "6")]
    pub service: Vec<ServiceDescriptorProto>,
    #[prost(message, repeated, tag = "7")]
    pub extension: Vec<prost_types::FieldDescriptorProto>,
    #[prost(string, optional, tag = "12")]
    pub syntax: Option<String>,
}

/// Mirrors `google.protobuf.ServiceDescriptorProto`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServiceDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    pub method: Vec<MethodDescriptorProto>,
}

/// Mirrors `google.protobuf.MethodDescriptorProto`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MethodDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub input_type: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub output_type: Option<String>,
    #[prost(message, optional, tag = "4")]
    pub options: Option<MethodOptions>,
    #[prost(bool, optional, tag = "5")]
    pub client_streaming: Option<bool>,
    #[prost(bool, optional, tag = "6")]
    pub server_streaming: Option<bool>,
}

/// Wire-compatible stand-in for `google.protobuf.MethodOptions` carrying the
/// `google.api.http` extension as a regular field.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MethodOptions {
    #[prost(message, optional, tag = "72295728")]
    pub http: Option<HttpRule>,
}

/// `google.api.HttpRule`: maps an RPC method onto an HTTP verb, path template
/// and body field, enabling gRPC-HTTP transcoding.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HttpRule {
    #[prost(string, tag = "1")]
    pub selector: String,
    #[prost(string, tag = "7")]
    pub body: String,
    #[prost(string, tag = "12")]
    pub response_body: String,
    #[prost(message, repeated, tag = "11")]
    pub additional_bindings: Vec<HttpRule>,
    #[prost(oneof = "http_rule::Pattern", tags = "2, 3, 4, 5, 6, 8")]
    pub pattern: Option<http_rule::Pattern>,
}

pub mod http_rule {
    /// The path pattern variants of `google.api.HttpRule`.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Pattern {
        #[prost(string, tag = "2")]
        Get(String),
        #[prost(string, tag = "3")]
        Put(String),
        #[prost(string, tag = "4")]
        Post(String),
        #[prost(string, tag = "5")]
        Delete(String),
        #[prost(string, tag = "6")]
        Patch(String),
        #[prost(message, tag = "8")]
        Custom(super::CustomHttpPattern),
    }
}

/// `google.api.CustomHttpPattern`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomHttpPattern {
    #[prost(string, tag = "1")]
    pub kind: String,
    #[prost(string, tag = "2")]
    pub path: String,
}
