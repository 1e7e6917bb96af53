//! Shared domain fixtures for the cross-crate scenario tests
//!
//! Models a small content repository: concrete data objects, assets and
//! documents, the events fired when they change, and a subscriber that
//! records every call it receives.

use std::sync::{Arc, Mutex};

use eventmanager_dispatch::{
    BoundArguments, DomainObject, EventArguments, EventPayload, ObjectRef, Subscriber,
    SubscriberError, Switch, ValidationError,
};
use eventmanager_registry::{ConcreteClass, TypeKey};

/// Interface shared by every stored element
pub trait Element {}

/// Concrete data object with a class discriminator
#[derive(Debug, Clone)]
pub struct Product {
    pub sku: String,
}

impl ConcreteClass for Product {
    const CLASS_NAME: &'static str = "Product";
}

impl DomainObject for Product {
    fn implements(&self) -> Vec<TypeKey> {
        vec![TypeKey::of::<dyn Element>()]
    }

    fn concrete_class(&self) -> Option<&str> {
        Some(Product::CLASS_NAME)
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
}

impl ConcreteClass for Category {
    const CLASS_NAME: &'static str = "Category";
}

impl DomainObject for Category {
    fn implements(&self) -> Vec<TypeKey> {
        vec![TypeKey::of::<dyn Element>()]
    }

    fn concrete_class(&self) -> Option<&str> {
        Some(Category::CLASS_NAME)
    }
}

#[derive(Debug, Clone)]
pub struct Asset {
    pub filename: String,
}

impl DomainObject for Asset {
    fn implements(&self) -> Vec<TypeKey> {
        vec![TypeKey::of::<dyn Element>()]
    }
}

#[derive(Debug, Clone)]
pub struct Version {
    pub number: u32,
}

impl DomainObject for Version {}

#[derive(Debug, Clone)]
pub struct User {
    pub login: String,
}

impl DomainObject for User {}

/// Fired for data-object saves
pub struct DataObjectEvent {
    pub object: ObjectRef,
    pub arguments: EventArguments,
}

impl DataObjectEvent {
    /// Event for `object` with arguments taken from a JSON object literal
    pub fn new(object: ObjectRef, arguments: serde_json::Value) -> Self {
        Self {
            object,
            arguments: arguments.as_object().cloned().unwrap_or_default(),
        }
    }

    pub fn into_ref(self) -> ObjectRef {
        Arc::new(self)
    }
}

impl DomainObject for DataObjectEvent {
    fn as_payload(&self) -> Option<&dyn EventPayload> {
        Some(self)
    }
}

impl EventPayload for DataObjectEvent {
    fn arguments(&self) -> Option<EventArguments> {
        Some(self.arguments.clone())
    }

    fn object(&self) -> Option<ObjectRef> {
        Some(self.object.clone())
    }
}

/// Fired for asset changes; carries the version that was written
pub struct AssetEvent {
    pub asset: ObjectRef,
    pub version: Option<ObjectRef>,
}

impl DomainObject for AssetEvent {
    fn as_payload(&self) -> Option<&dyn EventPayload> {
        Some(self)
    }
}

impl EventPayload for AssetEvent {
    fn asset(&self) -> Option<ObjectRef> {
        Some(self.asset.clone())
    }

    fn version(&self) -> Option<ObjectRef> {
        self.version.clone()
    }
}

/// Calls seen by [`RecordingSubscriber`]s, shared between instances
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// What a [`RecordingSubscriber`] does after recording a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeed,
    Reject,
    Fail,
}

/// Subscriber that logs `Class::method(arg, ...)` for every invocation
pub struct RecordingSubscriber {
    pub class: &'static str,
    pub log: CallLog,
    pub outcome: Outcome,
    pub switch: Switch,
}

impl RecordingSubscriber {
    pub fn new(class: &'static str, log: &CallLog) -> Self {
        Self::with_outcome(class, log, Outcome::Succeed)
    }

    pub fn with_outcome(class: &'static str, log: &CallLog, outcome: Outcome) -> Self {
        Self {
            class,
            log: log.clone(),
            outcome,
            switch: Switch::default(),
        }
    }
}

impl Subscriber for RecordingSubscriber {
    fn is_enabled(&self) -> bool {
        self.switch.is_enabled()
    }

    fn call(&self, method: &str, arguments: &BoundArguments) -> Result<(), SubscriberError> {
        let mut names: Vec<&str> = arguments.names().collect();
        names.sort_unstable();
        let rendered: Vec<String> = names.iter().map(|name| describe(arguments, name)).collect();

        if let Ok(mut log) = self.log.lock() {
            log.push(format!("{}::{}({})", self.class, method, rendered.join(", ")));
        }

        match self.outcome {
            Outcome::Succeed => Ok(()),
            Outcome::Reject => Err(ValidationError::new(format!("{} rejected the save", self.class)).into()),
            Outcome::Fail => Err(anyhow::anyhow!("{} lost its connection", self.class).into()),
        }
    }
}

eventmanager_dispatch::subscriber_service!(RecordingSubscriber);

fn describe(arguments: &BoundArguments, name: &str) -> String {
    if let Some(product) = arguments.get::<Product>(name) {
        format!("{name}={}", product.sku)
    } else if let Some(category) = arguments.get::<Category>(name) {
        format!("{name}={}", category.name)
    } else if let Some(asset) = arguments.get::<Asset>(name) {
        format!("{name}={}", asset.filename)
    } else if let Some(version) = arguments.get::<Version>(name) {
        format!("{name}=v{}", version.number)
    } else if let Some(user) = arguments.get::<User>(name) {
        format!("{name}={}", user.login)
    } else {
        name.to_string()
    }
}

/// Snapshot of the calls recorded so far
pub fn recorded(log: &CallLog) -> Vec<String> {
    log.lock().map(|calls| calls.clone()).unwrap_or_default()
}
