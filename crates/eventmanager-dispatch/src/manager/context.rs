//! Per-call dispatch context

use eventmanager_registry::ArgumentFlag;

use crate::object::ObjectRef;
use crate::payload::{flag_is_set, primary_object, EventArguments};

/// What a single event call carries
///
/// Built from the positional call arguments: the first argument, when it is
/// an event payload, provides the event arguments and the primary object.
pub struct DispatchContext<'a> {
    pub event_method: &'a str,
    pub object: Option<ObjectRef>,
    pub args: &'a [ObjectRef],
    pub event_args: EventArguments,
}

impl<'a> DispatchContext<'a> {
    pub fn from_call(event_method: &'a str, args: &'a [ObjectRef]) -> Self {
        let payload = args.first().and_then(|first| first.as_payload());

        Self {
            event_method,
            object: payload.and_then(primary_object),
            args,
            event_args: payload
                .and_then(|payload| payload.arguments())
                .unwrap_or_default(),
        }
    }

    pub fn flag_is_set(&self, flag: ArgumentFlag) -> bool {
        flag_is_set(&self.event_args, flag)
    }

    /// Concrete class of the primary object, if it is a concrete data object
    pub fn concrete_class(&self) -> Option<&str> {
        self.object.as_ref().and_then(|object| object.concrete_class())
    }
}
