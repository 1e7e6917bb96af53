//! Event payload accessors
//!
//! The first positional argument of an event call is usually the event
//! object. Event kinds expose different accessors (a data-object event has an
//! object, an asset event has an asset, ...), so [`EventPayload`] offers all of
//! them as optional methods and each event kind overrides the ones it has.
//!
//! # Primary object
//!
//! The dispatcher reads the accessors in the fixed order of [`OBJECT_ACCESSORS`]
//! and every accessor that yields an object replaces the previous result: when
//! an event exposes both an object and a version, the version wins. This
//! "most specific wins" precedence is intentional; see [`primary_object`].

use eventmanager_registry::ArgumentFlag;
use serde_json::{Map, Value};

use crate::object::ObjectRef;

/// Named event arguments, e.g. `{"isAutoSave": true}`
pub type EventArguments = Map<String, Value>;

/// Accessors an event object may expose
pub trait EventPayload {
    /// Event arguments used to gate subscriber methods
    fn arguments(&self) -> Option<EventArguments> {
        None
    }

    fn object(&self) -> Option<ObjectRef> {
        None
    }

    fn asset(&self) -> Option<ObjectRef> {
        None
    }

    fn subject(&self) -> Option<ObjectRef> {
        None
    }

    fn document(&self) -> Option<ObjectRef> {
        None
    }

    fn user_role(&self) -> Option<ObjectRef> {
        None
    }

    fn version(&self) -> Option<ObjectRef> {
        None
    }
}

/// Object accessor of an [`EventPayload`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAccessor {
    Object,
    Asset,
    Subject,
    Document,
    UserRole,
    Version,
}

/// Accessor order for the primary object
pub const OBJECT_ACCESSORS: [ObjectAccessor; 6] = [
    ObjectAccessor::Object,
    ObjectAccessor::Asset,
    ObjectAccessor::Subject,
    ObjectAccessor::Document,
    ObjectAccessor::UserRole,
    ObjectAccessor::Version,
];

impl ObjectAccessor {
    pub fn read(self, payload: &dyn EventPayload) -> Option<ObjectRef> {
        match self {
            ObjectAccessor::Object => payload.object(),
            ObjectAccessor::Asset => payload.asset(),
            ObjectAccessor::Subject => payload.subject(),
            ObjectAccessor::Document => payload.document(),
            ObjectAccessor::UserRole => payload.user_role(),
            ObjectAccessor::Version => payload.version(),
        }
    }
}

/// The object an event is about
///
/// Runs every accessor of [`OBJECT_ACCESSORS`]; the last one returning an object
/// wins.
pub fn primary_object(payload: &dyn EventPayload) -> Option<ObjectRef> {
    OBJECT_ACCESSORS
        .iter()
        .filter_map(|accessor| accessor.read(payload))
        .last()
}

/// Truthiness of an event argument value
///
/// `null`, `false`, `0`, `""`, `"0"`, empty arrays and empty objects are
/// false; everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

/// Whether `flag` is present and truthy in `arguments`
pub fn flag_is_set(arguments: &EventArguments, flag: ArgumentFlag) -> bool {
    arguments.get(flag.context_key()).is_some_and(is_truthy)
}
