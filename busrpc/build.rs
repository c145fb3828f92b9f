//! Generates the sample service modules used by the integration tests, the
//! example and the benchmark.

use busrpc_codegen::{DiagnosticLog, MemberDeclaration, ServiceDeclaration, TypeExpr, Visibility};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = std::path::PathBuf::from(std::env::var_os("OUT_DIR").expect("OUT_DIR not set"));

    for declaration in [division(), weather(), telemetry()] {
        let mut diagnostics = DiagnosticLog::new();
        let artifacts = busrpc_codegen::generate_service(&declaration, &mut diagnostics)
            .unwrap_or_else(|error| panic!("invalid declaration `{}`: {error}", declaration.name));
        artifacts
            .write_to(&out_dir)
            .unwrap_or_else(|error| panic!("failed to write generated module: {error}"));
    }
}

fn division() -> ServiceDeclaration {
    ServiceDeclaration::interface("co.selim.sample", "Division")
        .visibility(Visibility::Public)
        .member(
            MemberDeclaration::new("divide")
                .parameter("dividend", TypeExpr::path("f64"))
                .parameter("divisor", TypeExpr::path("f64"))
                .returns(TypeExpr::path("Division"))
                .async_capable(),
        )
}

fn weather() -> ServiceDeclaration {
    ServiceDeclaration::interface("co.selim.sample", "Weather").member(
        MemberDeclaration::new("get_weather")
            .parameter("city", TypeExpr::path("String"))
            .returns(TypeExpr::path("WeatherReport"))
            .async_capable(),
    )
}

fn telemetry() -> ServiceDeclaration {
    ServiceDeclaration::interface("co.selim.sample", "Telemetry")
        .visibility(Visibility::Public)
        .member(MemberDeclaration::new("record").parameter("samples", TypeExpr::path("Vec<i32>")))
        .member(MemberDeclaration::new("flush").async_capable())
        .member(
            MemberDeclaration::new("snapshot")
                .returns(TypeExpr::path("String"))
                .async_capable(),
        )
}
