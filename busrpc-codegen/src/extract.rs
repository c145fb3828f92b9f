//! Declaration extractor: validates a service declaration and produces the
//! normalized model.
//!
//! All structural rules live here. A declaration that survives extraction is
//! safe to plan and generate from without further checks.

use thiserror::Error;

use crate::declaration::{
    DeclarationKind, Diagnostics, MemberDeclaration, ServiceDeclaration, TypeExpr,
};
use crate::model::{Operation, Parameter, Service, TypeRef};

/// Structural violations that abort generation for the offending service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("only interfaces can be services, `{name}` is not one")]
    InvalidServiceKind { name: String },

    #[error("operation `{operation}` returns a result and must be async-capable")]
    MissingAsyncCapability { operation: String },

    #[error("variadic parameter `{parameter}` in operation `{operation}` is not supported")]
    UnsupportedVariadicParameter {
        operation: String,
        parameter: String,
    },

    #[error(
        "type parameter `{type_param}` in operation `{operation}` cannot be resolved to a \
         concrete type"
    )]
    UnsupportedGenericParameter {
        operation: String,
        type_param: String,
    },

    #[error("operation name `{operation}` is declared twice with different shapes")]
    DuplicateOperationName { operation: String },

    #[error("parameter name `{parameter}` is declared twice in operation `{operation}`")]
    DuplicateParameterName {
        operation: String,
        parameter: String,
    },
}

/// Validates `declaration` and produces a [`Service`].
///
/// Every violation is reported through `diagnostics`; the first one is also
/// returned, and no model is produced. Structurally identical duplicate
/// members are deduplicated silently.
pub fn extract(
    declaration: &ServiceDeclaration,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Service, ExtractError> {
    let mut errors: Vec<ExtractError> = Vec::new();

    if declaration.kind != DeclarationKind::Interface {
        errors.push(ExtractError::InvalidServiceKind {
            name: declaration.name.clone(),
        });
    }

    let mut operations: Vec<Operation> = Vec::new();
    for member in &declaration.members {
        let Some(operation) = extract_member(member, diagnostics, &mut errors) else {
            continue;
        };

        match operations.iter().position(|seen| seen.name == operation.name) {
            Some(index) if operations[index] == operation => {} // structural duplicate, drop
            Some(_) => errors.push(ExtractError::DuplicateOperationName {
                operation: operation.name,
            }),
            None => operations.push(operation),
        }
    }

    for error in &errors {
        diagnostics.error(&error.to_string());
    }
    match errors.into_iter().next() {
        Some(error) => Err(error),
        None => Ok(Service {
            namespace: declaration.namespace.clone(),
            name: declaration.name.clone(),
            operations,
            property_visibility: declaration.visibility,
        }),
    }
}

fn extract_member(
    member: &MemberDeclaration,
    diagnostics: &mut dyn Diagnostics,
    errors: &mut Vec<ExtractError>,
) -> Option<Operation> {
    let mut valid = true;

    let result = match &member.result {
        TypeExpr::Unit => {
            if member.async_capable {
                diagnostics.info(&format!(
                    "operation `{}` has no result and does not need to be async-capable",
                    member.name
                ));
            }
            None
        }
        TypeExpr::Path(path) => {
            if !member.async_capable {
                errors.push(ExtractError::MissingAsyncCapability {
                    operation: member.name.clone(),
                });
                valid = false;
            }
            Some(TypeRef::new(path.clone()))
        }
        TypeExpr::TypeParam(name) => {
            errors.push(ExtractError::UnsupportedGenericParameter {
                operation: member.name.clone(),
                type_param: name.clone(),
            });
            valid = false;
            None
        }
    };

    let mut parameters: Vec<Parameter> = Vec::new();
    for declared in &member.parameters {
        if declared.variadic {
            errors.push(ExtractError::UnsupportedVariadicParameter {
                operation: member.name.clone(),
                parameter: declared.name.clone(),
            });
            valid = false;
            continue;
        }

        let ty = match &declared.ty {
            TypeExpr::Path(path) => TypeRef::new(path.clone()),
            TypeExpr::Unit => TypeRef::new("()"),
            TypeExpr::TypeParam(name) => {
                errors.push(ExtractError::UnsupportedGenericParameter {
                    operation: member.name.clone(),
                    type_param: name.clone(),
                });
                valid = false;
                continue;
            }
        };

        let parameter = Parameter {
            name: declared.name.clone(),
            ty,
        };
        match parameters.iter().position(|seen| seen.name == parameter.name) {
            Some(index) if parameters[index] == parameter => {} // structural duplicate, drop
            Some(_) => {
                errors.push(ExtractError::DuplicateParameterName {
                    operation: member.name.clone(),
                    parameter: parameter.name,
                });
                valid = false;
            }
            None => parameters.push(parameter),
        }
    }

    valid.then_some(Operation {
        name: member.name.clone(),
        parameters,
        result,
        async_capable: member.async_capable,
    })
}
