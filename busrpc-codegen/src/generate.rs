//! Stub & handler generator: renders one Rust module per service.
//!
//! Rendering is deterministic — regenerating from an unchanged declaration
//! produces byte-identical output. Every topic string is emitted exactly once
//! as a constant referenced by both the caller stub and the handler accessor;
//! the two sides cannot disagree on a topic.
//!
//! Generated code names runtime items through fully-qualified `::busrpc`
//! paths and carries no `use` statements, so it can be `include!`d into any
//! module without import collisions.

use crate::declaration::{Diagnostics, ServiceDeclaration};
use crate::extract::{extract, ExtractError};
use crate::model::{Operation, Service, Visibility};
use crate::plan::{plan, shouty_snake_case, snake_case, RequestShape, ResponseShape};

/// The rendered output for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    /// Suggested file name, e.g. `division.rs`.
    pub file_name: String,
    pub contents: String,
}

impl GeneratedArtifacts {
    /// Writes the artifact into `dir` and returns the full path. Intended
    /// for build scripts.
    pub fn write_to(&self, dir: impl AsRef<std::path::Path>) -> std::io::Result<std::path::PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

/// Runs the whole pipeline: extraction, planning, rendering.
pub fn generate_service(
    declaration: &ServiceDeclaration,
    diagnostics: &mut dyn Diagnostics,
) -> Result<GeneratedArtifacts, ExtractError> {
    let service = extract(declaration, diagnostics)?;
    Ok(generate(&service))
}

/// Renders the artifacts for an already-validated service.
pub fn generate(service: &Service) -> GeneratedArtifacts {
    let mut w = SourceWriter::new();

    w.line(format!(
        "// @generated by busrpc-codegen from the `{}` service",
        service.qualified_name()
    ));
    w.line("// declaration. Do not edit.");

    for operation in &service.operations {
        let plan = plan(service, operation);
        w.blank();
        w.line(format!("/// Topic carrying `{}` messages.", operation.name));
        w.line(format!(
            "pub const {}: &str = \"{}\";",
            topic_const(operation),
            plan.topic
        ));
    }

    for operation in &service.operations {
        if let RequestShape::Boxed { type_name } = plan(service, operation).request_shape {
            render_container(&mut w, operation, &type_name);
        }
    }

    render_client(&mut w, service);
    render_accessors(&mut w, service);

    GeneratedArtifacts {
        file_name: format!("{}.rs", snake_case(&service.name)),
        contents: w.finish(),
    }
}

fn topic_const(operation: &Operation) -> String {
    format!("{}_TOPIC", shouty_snake_case(&operation.name))
}

fn render_container(w: &mut SourceWriter, operation: &Operation, type_name: &str) {
    w.blank();
    w.line(format!(
        "/// Boxed parameters of the `{}` operation.",
        operation.name
    ));
    w.line("#[derive(Debug, Clone, PartialEq, ::busrpc::Serialize, ::busrpc::Deserialize)]");
    w.line("#[serde(crate = \"::busrpc::serde\")]");
    w.open(format!("pub struct {type_name} {{"));
    for parameter in &operation.parameters {
        w.line(format!("pub {}: {},", parameter.name, parameter.ty));
    }
    w.close("}");
}

fn render_client(w: &mut SourceWriter, service: &Service) {
    let client = format!("{}Client", service.name);

    w.blank();
    w.line(format!("/// Caller-side stub for the `{}` service.", service.name));
    w.line("#[derive(Clone)]");
    w.open(format!("pub struct {client} {{"));
    w.line("bus: ::std::sync::Arc<dyn ::busrpc::MessageBus>,");
    w.close("}");

    w.blank();
    w.open(format!("impl {client} {{"));
    w.line("/// Creates a stub that dispatches over `bus`.");
    w.open("pub fn new(bus: ::std::sync::Arc<dyn ::busrpc::MessageBus>) -> Self {");
    w.line("Self { bus }");
    w.close("}");

    for operation in &service.operations {
        let plan = plan(service, operation);
        let method = snake_case(&operation.name);
        let topic = topic_const(operation);
        let parameters: Vec<String> = operation
            .parameters
            .iter()
            .map(|parameter| format!("{}: {}", parameter.name, parameter.ty))
            .collect();
        let signature = if parameters.is_empty() {
            format!("pub async fn {method}(&self)")
        } else {
            format!("pub async fn {method}(&self, {})", parameters.join(", "))
        };

        w.blank();
        let (return_type, helper) = match &plan.response_shape {
            ResponseShape::RoundTrip(result) => (format!("::busrpc::Result<{result}>"), "call"),
            ResponseShape::OneWay => ("::busrpc::Result<()>".to_string(), "notify"),
        };
        w.open(format!("{signature} -> {return_type} {{"));
        let payload = payload_expression(w, operation, &plan.request_shape);
        w.line(format!(
            "::busrpc::{helper}(&self.bus, {topic}, {payload}).await"
        ));
        w.close("}");
    }
    w.close("}");
}

/// Returns the payload expression for a stub body, emitting the container
/// construction first when the request is boxed.
fn payload_expression(
    w: &mut SourceWriter,
    operation: &Operation,
    shape: &RequestShape,
) -> String {
    match shape {
        RequestShape::Unit => "()".to_string(),
        RequestShape::Bare(_) => operation.parameters[0].name.clone(),
        RequestShape::Boxed { type_name } => {
            let fields: Vec<&str> = operation
                .parameters
                .iter()
                .map(|parameter| parameter.name.as_str())
                .collect();
            w.line(format!(
                "let request = {type_name} {{ {} }};",
                fields.join(", ")
            ));
            "request".to_string()
        }
    }
}

fn render_accessors(w: &mut SourceWriter, service: &Service) {
    let accessor_trait = format!("{}Requests", service.name);
    let visibility = match service.property_visibility {
        Visibility::Public => "pub",
        Visibility::Internal => "pub(crate)",
    };

    w.blank();
    w.line(format!(
        "/// Handler-side request streams for the `{}` service.",
        service.name
    ));
    w.open(format!("{visibility} trait {accessor_trait} {{"));
    for operation in &service.operations {
        w.line(format!(
            "/// Inbound `{}` messages in arrival order.",
            operation.name
        ));
        w.line(format!("{};", accessor_signature(service, operation)));
    }
    w.close("}");

    w.blank();
    w.open(format!(
        "impl {accessor_trait} for ::std::sync::Arc<dyn ::busrpc::MessageBus> {{"
    ));
    for operation in &service.operations {
        let plan = plan(service, operation);
        let helper = match plan.response_shape {
            ResponseShape::RoundTrip(_) => "requests",
            ResponseShape::OneWay => "messages",
        };
        w.open(format!("{} {{", accessor_signature(service, operation)));
        w.line(format!(
            "::busrpc::{helper}(self, {})",
            topic_const(operation)
        ));
        w.close("}");
    }
    w.close("}");
}

fn accessor_signature(service: &Service, operation: &Operation) -> String {
    let plan = plan(service, operation);
    let request_type = match &plan.request_shape {
        RequestShape::Unit => "()".to_string(),
        RequestShape::Bare(ty) => ty.to_string(),
        RequestShape::Boxed { type_name } => type_name.clone(),
    };
    let method = snake_case(&operation.name);

    match &plan.response_shape {
        ResponseShape::RoundTrip(result) => format!(
            "fn {method}_requests(&self) -> ::busrpc::RequestStream<{request_type}, {result}>"
        ),
        ResponseShape::OneWay => {
            format!("fn {method}_requests(&self) -> ::busrpc::MessageStream<{request_type}>")
        }
    }
}

/// Minimal indentation-tracking writer for the rendered source.
struct SourceWriter {
    out: String,
    indent: usize,
}

impl SourceWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, line: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(line.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, line: impl AsRef<str>) {
        self.line(line);
        self.indent += 1;
    }

    fn close(&mut self, line: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(line);
    }

    fn finish(self) -> String {
        self.out
    }
}
