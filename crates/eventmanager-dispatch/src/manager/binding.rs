//! Parameter binding
//!
//! Each parameter is bound on its own. For every accepted type, in declared
//! order, the primary object is tried first and then the positional call
//! arguments from left to right; the first instance found is bound. A method
//! with any unbound parameter is never invoked.

use eventmanager_registry::{MethodDeclaration, Parameter};

use super::context::DispatchContext;
use crate::error::EventManagerError;
use crate::object::{is_instance_of, ObjectRef};
use crate::subscriber::BoundArguments;

/// Binds every parameter of `method` or reports the first unbound one
pub fn bind(
    subscriber: &str,
    method: &MethodDeclaration,
    context: &DispatchContext<'_>,
) -> Result<BoundArguments, EventManagerError> {
    let mut arguments = BoundArguments::new();

    for parameter in &method.parameters {
        let object = resolve(parameter, context).ok_or_else(|| {
            EventManagerError::ArgumentBindingFailure {
                subscriber: subscriber.to_string(),
                method: method.name.clone(),
                argument: parameter.name.clone(),
            }
        })?;
        arguments.insert(parameter.name.clone(), object);
    }

    Ok(arguments)
}

fn resolve(parameter: &Parameter, context: &DispatchContext<'_>) -> Option<ObjectRef> {
    parameter.types.iter().find_map(|ty| {
        let key = ty.key();
        context
            .object
            .iter()
            .chain(context.args.iter())
            .find(|candidate| is_instance_of(&***candidate, key))
            .cloned()
    })
}
