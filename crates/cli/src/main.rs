//! OpenAPI gRPC transcoder CLI
//!
//! Compiles OpenAPI descriptions into `.proto` sources (and optionally the
//! serialized descriptor set) with gRPC-HTTP transcoding annotations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use openapi_grpc_transcoder_common::{Diagnostic, GeneratorError, SurfaceModel};
use openapi_grpc_transcoder_generator::{DescriptorBuilder, DocumentLoader, ProtoRenderer};
use openapi_grpc_transcoder_parser::{FeatureChecker, OpenApiParser};
use prost::Message;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "openapi-grpc-transcoder")]
#[command(version, about = "Compile OpenAPI descriptions into gRPC-transcoding protos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a .proto definition from an OpenAPI description
    #[command(after_help = "EXAMPLES:\n  \
        # Generate bookstore.proto next to the input\n  \
        openapi-grpc-transcoder generate --input bookstore.yaml\n\n  \
        # Pick the protobuf package name and output directory\n  \
        openapi-grpc-transcoder generate --input api.json --package shop --output ./proto\n\n  \
        # Also write the serialized FileDescriptorSet\n  \
        openapi-grpc-transcoder generate --input api.yaml --descriptor-set")]
    Generate {
        /// Path to the OpenAPI description (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Protobuf package name (defaults to the input file stem)
        #[arg(short, long)]
        package: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Also write the serialized FileDescriptorSet as <package>.pb
        #[arg(long)]
        descriptor_set: bool,
    },

    /// Report OpenAPI features the generator does not translate
    Check {
        /// Path to the OpenAPI description (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            package,
            output,
            descriptor_set,
        } => generate_command(&input, package.as_deref(), &output, descriptor_set),
        Commands::Check { input } => check_command(&input),
    }
}

fn generate_command(
    input: &Path,
    package: Option<&str>,
    output: &Path,
    descriptor_set: bool,
) -> Result<()> {
    println!("{} Parsing {}", "→".cyan(), input.display());
    let parser = OpenApiParser::from_file(input)
        .with_context(|| format!("failed to parse {}", input.display()))?;

    let warnings = FeatureChecker::new(parser.document()).run();
    print_warnings(&warnings);

    let model = parser
        .surface_model()
        .context("failed to build the surface model")?;
    let package = package
        .map(str::to_string)
        .unwrap_or_else(|| default_package(input));

    println!(
        "{} Generating descriptors for package {}",
        "→".cyan(),
        package.yellow()
    );
    let loader = FileDocumentLoader::for_input(input);
    let set = DescriptorBuilder::new(&model, &package, &loader)
        .build()
        .context("descriptor generation failed")?;
    let proto = ProtoRenderer::render(&set).context("failed to render the .proto definition")?;

    fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let proto_path = output.join(format!("{package}.proto"));
    fs::write(&proto_path, proto)
        .with_context(|| format!("failed to write {}", proto_path.display()))?;
    println!("{} Wrote {}", "✓".green(), proto_path.display());

    if descriptor_set {
        let set_path = output.join(format!("{package}.pb"));
        fs::write(&set_path, set.encode_to_vec())
            .with_context(|| format!("failed to write {}", set_path.display()))?;
        println!("{} Wrote {}", "✓".green(), set_path.display());
    }

    Ok(())
}

fn check_command(input: &Path) -> Result<()> {
    let parser = OpenApiParser::from_file(input)
        .with_context(|| format!("failed to parse {}", input.display()))?;

    let warnings = FeatureChecker::new(parser.document()).run();
    if warnings.is_empty() {
        println!(
            "{} Everything in {} translates to .proto",
            "✓".green(),
            input.display()
        );
    } else {
        print_warnings(&warnings);
        println!("\n{} {} warning(s)", "⚠".yellow(), warnings.len());
    }
    Ok(())
}

fn print_warnings(warnings: &[Diagnostic]) {
    for warning in warnings {
        eprintln!("{} {}", "⚠".yellow(), warning.to_string().yellow());
    }
}

/// The protobuf package when none is given: the input file stem, lowercased.
fn default_package(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("api")
        .to_lowercase()
}

/// Resolves external document references against the input file's directory.
///
/// URLs with a scheme are rejected; fetching remote descriptions is left to
/// the caller, who can download them next to the input first.
struct FileDocumentLoader {
    base_dir: PathBuf,
}

impl FileDocumentLoader {
    fn for_input(input: &Path) -> Self {
        FileDocumentLoader {
            base_dir: input.parent().unwrap_or(Path::new(".")).to_path_buf(),
        }
    }
}

impl DocumentLoader for FileDocumentLoader {
    fn load(&self, url: &str) -> openapi_grpc_transcoder_common::Result<SurfaceModel> {
        if url.contains("://") {
            return Err(GeneratorError::ExternalFetch {
                url: url.to_string(),
                reason: "remote references are not fetched; download the document next to the input first".to_string(),
            });
        }
        OpenApiParser::from_file(self.base_dir.join(url))?.surface_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_package() {
        assert_eq!(default_package(Path::new("specs/Bookstore.yaml")), "bookstore");
        assert_eq!(default_package(Path::new("api.json")), "api");
    }

    #[test]
    fn test_file_loader_reads_relative_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let pets = dir.path().join("pets.yaml");
        let mut f = fs::File::create(&pets).unwrap();
        write!(
            f,
            "openapi: 3.0.0\ninfo:\n  title: Pets\n  version: '1.0'\npaths: {{}}\n"
        )
        .unwrap();

        let loader = FileDocumentLoader::for_input(&dir.path().join("orders.yaml"));
        let model = loader.load("pets.yaml").unwrap();
        assert!(model.types.is_empty());

        assert!(matches!(
            loader.load("https://example.com/pets.yaml"),
            Err(GeneratorError::ExternalFetch { .. })
        ));
    }
}
