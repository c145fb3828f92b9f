//! # busrpc-codegen - service stub generation for busrpc
//!
//! Turns an interface-shaped service declaration into the Rust module that
//! wires it onto the bus: topic constants, parameter containers, a typed
//! caller stub and handler-side request streams.
//!
//! The pipeline has three pure stages:
//!
//! ```text
//! ServiceDeclaration --extract--> Service --plan--> DispatchPlan --generate--> .rs module
//!    (value object)            (validated model)   (topic + shapes)         (rendered source)
//! ```
//!
//! ## Usage: in your build.rs
//!
//! ```rust,ignore
//! use busrpc_codegen::{
//!     generate_service, DiagnosticLog, MemberDeclaration, ServiceDeclaration, TypeExpr,
//! };
//!
//! fn main() {
//!     let declaration = ServiceDeclaration::interface("co.selim.sample", "Division")
//!         .member(
//!             MemberDeclaration::new("divide")
//!                 .parameter("dividend", TypeExpr::path("f64"))
//!                 .parameter("divisor", TypeExpr::path("f64"))
//!                 .returns(TypeExpr::path("Division"))
//!                 .async_capable(),
//!         );
//!
//!     let mut diagnostics = DiagnosticLog::new();
//!     let artifacts = generate_service(&declaration, &mut diagnostics)
//!         .expect("invalid service declaration");
//!     let out_dir = std::env::var("OUT_DIR").unwrap();
//!     artifacts.write_to(out_dir).unwrap();
//! }
//! ```
//!
//! The generated module is then pulled in with
//! `include!(concat!(env!("OUT_DIR"), "/division.rs"));` and used against any
//! `busrpc::MessageBus` handle.
//!
//! Generation is idempotent: an unchanged declaration always renders
//! byte-identical output. Caller and handler topics are emitted as a single
//! shared constant per operation, so the two sides cannot diverge.

pub mod declaration;
pub mod extract;
pub mod generate;
pub mod model;
pub mod plan;

// Re-exports
pub use declaration::{
    DeclarationKind, Diagnostic, DiagnosticLog, Diagnostics, MemberDeclaration,
    ParameterDeclaration, ServiceDeclaration, Severity, TypeExpr,
};
pub use extract::{extract, ExtractError};
pub use generate::{generate, generate_service, GeneratedArtifacts};
pub use model::{Operation, Parameter, Service, TypeRef, Visibility};
pub use plan::{plan, DispatchPlan, RequestShape, ResponseShape};
