//! Candidate subscriber selection
//!
//! Narrows the subscribers registered for an event method down to those that
//! should run for one call:
//!
//! 1. subscribers of the event method (unknown method is an error)
//! 2. for a concrete primary object, only classes in its type map entry
//! 3. for every set flag, only gated classes and their gated methods; for
//!    every unset flag, the methods it gates are dropped
//! 4. classes left without methods are dropped

use eventmanager_registry::{ArgumentFlag, DeclarationTable, MethodDeclaration};

use super::context::DispatchContext;
use crate::error::EventManagerError;

/// A subscriber class and the methods to invoke on it
#[derive(Debug, Clone)]
pub struct Candidate<'t> {
    pub class: &'t str,
    pub methods: Vec<&'t MethodDeclaration>,
}

impl Candidate<'_> {
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Candidates for `context`, in registration order
pub fn select<'t>(
    table: &'t DeclarationTable,
    context: &DispatchContext<'_>,
) -> Result<Vec<Candidate<'t>>, EventManagerError> {
    let declared = table
        .subscribers_for(context.event_method)
        .ok_or_else(|| EventManagerError::UnknownEventMethod(context.event_method.to_string()))?;

    let mut candidates: Vec<Candidate<'t>> = declared
        .iter()
        .map(|subscriber| Candidate {
            class: subscriber.class.as_str(),
            methods: subscriber.methods.iter().collect(),
        })
        .collect();

    if let Some(class) = context.concrete_class() {
        let eligible = table.classes_for_concrete(class);
        candidates.retain(|c| eligible.is_some_and(|classes| classes.contains(c.class)));
    }

    for flag in ArgumentFlag::ALL {
        if context.flag_is_set(flag) {
            candidates.retain_mut(|c| match table.gated_methods(flag, c.class) {
                Some(gated) => {
                    c.methods.retain(|m| gated.contains(&m.name));
                    true
                }
                None => false,
            });
        } else {
            for c in &mut candidates {
                if let Some(gated) = table.gated_methods(flag, c.class) {
                    c.methods.retain(|m| !gated.contains(&m.name));
                }
            }
        }
    }

    candidates.retain(|c| !c.methods.is_empty());
    Ok(candidates)
}
