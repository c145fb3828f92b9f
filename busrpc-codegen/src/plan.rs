//! Topic & shape planner: a pure function from an operation to its dispatch
//! plan.
//!
//! Both the caller stub and the handler accessor are rendered from the same
//! plan, so the topic strings on the two sides cannot diverge.

use crate::model::{Operation, Service, TypeRef};

/// How an operation's request payload travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestShape {
    /// No parameters; the payload is `()`.
    Unit,
    /// One parameter, sent as-is.
    Bare(TypeRef),
    /// Two or more parameters, boxed into a synthesized container type.
    Boxed { type_name: String },
}

/// Whether the caller waits for a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// Fire-and-forget; the handler stream yields bare payloads.
    OneWay,
    /// The caller suspends until a reply of this type arrives.
    RoundTrip(TypeRef),
}

/// The derived dispatch decisions for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    pub topic: String,
    pub request_shape: RequestShape,
    pub response_shape: ResponseShape,
}

/// Computes the dispatch plan for `operation`. Pure and deterministic.
pub fn plan(service: &Service, operation: &Operation) -> DispatchPlan {
    let request_shape = match operation.parameters.len() {
        0 => RequestShape::Unit,
        1 => RequestShape::Bare(operation.parameters[0].ty.clone()),
        _ => RequestShape::Boxed {
            type_name: container_name(operation),
        },
    };

    let response_shape = match &operation.result {
        None => ResponseShape::OneWay,
        Some(result) => ResponseShape::RoundTrip(result.clone()),
    };

    DispatchPlan {
        topic: topic(service, operation),
        request_shape,
        response_shape,
    }
}

/// The topic an operation's messages travel on:
/// `{namespace}.{lowercased service name}.{operation name}`.
///
/// The operation name is used verbatim; only the service name is lowercased.
pub fn topic(service: &Service, operation: &Operation) -> String {
    format!(
        "{}.{}.{}",
        service.namespace,
        service.name.to_lowercase(),
        operation.name
    )
}

/// Name of the synthesized parameter container for a boxed operation.
pub fn container_name(operation: &Operation) -> String {
    format!("{}Parameters", upper_camel_case(&operation.name))
}

/// Splits an identifier into words at `_` boundaries and lower-to-upper case
/// transitions.
fn words(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;

    for ch in identifier.chars() {
        if ch == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }
        if ch.is_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

pub(crate) fn upper_camel_case(identifier: &str) -> String {
    words(identifier)
        .into_iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

pub(crate) fn snake_case(identifier: &str) -> String {
    words(identifier).join("_")
}

pub(crate) fn shouty_snake_case(identifier: &str) -> String {
    snake_case(identifier).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Parameter, Visibility};

    fn division_service() -> Service {
        Service {
            namespace: "co.selim.sample".to_string(),
            name: "Division".to_string(),
            operations: vec![divide()],
            property_visibility: Visibility::Public,
        }
    }

    fn divide() -> Operation {
        Operation {
            name: "divide".to_string(),
            parameters: vec![
                Parameter {
                    name: "dividend".to_string(),
                    ty: TypeRef::new("f64"),
                },
                Parameter {
                    name: "divisor".to_string(),
                    ty: TypeRef::new("f64"),
                },
            ],
            result: Some(TypeRef::new("Division")),
            async_capable: true,
        }
    }

    #[test]
    fn topic_joins_namespace_lowercased_service_and_operation() {
        let service = division_service();
        assert_eq!(
            topic(&service, &service.operations[0]),
            "co.selim.sample.division.divide"
        );
    }

    #[test]
    fn two_parameters_are_boxed() {
        let service = division_service();
        let plan = plan(&service, &service.operations[0]);
        assert_eq!(
            plan.request_shape,
            RequestShape::Boxed {
                type_name: "DivideParameters".to_string()
            }
        );
        assert_eq!(
            plan.response_shape,
            ResponseShape::RoundTrip(TypeRef::new("Division"))
        );
    }

    #[test]
    fn zero_and_one_parameter_shapes() {
        let service = division_service();

        let no_params = Operation {
            name: "snapshot".to_string(),
            parameters: Vec::new(),
            result: Some(TypeRef::new("String")),
            async_capable: true,
        };
        assert_eq!(
            plan(&service, &no_params).request_shape,
            RequestShape::Unit
        );

        let one_param = Operation {
            name: "record".to_string(),
            parameters: vec![Parameter {
                name: "samples".to_string(),
                ty: TypeRef::new("Vec<i32>"),
            }],
            result: None,
            async_capable: false,
        };
        let plan = plan(&service, &one_param);
        assert_eq!(
            plan.request_shape,
            RequestShape::Bare(TypeRef::new("Vec<i32>"))
        );
        assert_eq!(plan.response_shape, ResponseShape::OneWay);
    }

    #[test]
    fn planning_is_deterministic() {
        let service = division_service();
        assert_eq!(
            plan(&service, &service.operations[0]),
            plan(&service, &service.operations[0])
        );
    }

    #[test]
    fn case_conversions() {
        assert_eq!(upper_camel_case("call_suspending"), "CallSuspending");
        assert_eq!(upper_camel_case("divide"), "Divide");
        assert_eq!(snake_case("getWeather"), "get_weather");
        assert_eq!(snake_case("divide"), "divide");
        assert_eq!(shouty_snake_case("callSuspending"), "CALL_SUSPENDING");
    }
}
