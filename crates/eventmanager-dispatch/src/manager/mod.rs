//! Event manager: fans a host event call out to subscriber methods

pub mod binding;
pub mod candidates;
pub mod context;

pub use candidates::Candidate;
pub use context::DispatchContext;

use std::sync::Arc;

use eventmanager_registry::{event_method_name, DeclarationTable, ListenerBinding};
use tracing::{debug, error};

use crate::{
    config::EventManagerConfig,
    error::{EventManagerError, Result},
    locator::Locator,
    object::ObjectRef,
    subscriber::Subscriber,
    switch::Switch,
};

/// Dispatches host events to declared subscriber methods
///
/// The host calls [`dispatch`](Self::dispatch) once per event with the event
/// method name and the positional call arguments. The manager selects the
/// subscribers declared for the event, filters them by the primary object's
/// concrete class and by the event's argument flags, binds each method's
/// parameters and invokes it.
///
/// # Failure policy
///
/// - unknown event method: logged, nothing runs
/// - subscriber cannot be located: logged as critical, next subscriber runs
/// - located service is not a subscriber: logged, next subscriber runs
/// - parameter cannot be bound: the method is skipped
/// - validation failure: returned unchanged, nothing else runs
/// - any other subscriber failure: logged as critical, then returned
///   unchanged, nothing else runs
pub struct EventManager {
    table: Arc<DeclarationTable>,
    locator: Arc<dyn Locator>,
    switch: Arc<Switch>,
    config: EventManagerConfig,
}

impl EventManager {
    pub fn new(table: Arc<DeclarationTable>, locator: Arc<dyn Locator>) -> Self {
        Self::with_config(table, locator, EventManagerConfig::default())
    }

    /// Manager whose switch starts in `config.enabled`
    pub fn with_config(
        table: Arc<DeclarationTable>,
        locator: Arc<dyn Locator>,
        config: EventManagerConfig,
    ) -> Self {
        Self {
            table,
            locator,
            switch: Arc::new(Switch::new(config.enabled)),
            config,
        }
    }

    /// The switch shared by every dispatch of this manager
    pub fn switch(&self) -> Arc<Switch> {
        self.switch.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.switch.is_enabled()
    }

    pub fn enable(&self) -> bool {
        self.switch.enable()
    }

    pub fn disable(&self) -> bool {
        self.switch.disable()
    }

    pub fn set_enabled(&self, enabled: bool) -> bool {
        self.switch.set_enabled(enabled)
    }

    pub fn table(&self) -> &DeclarationTable {
        &self.table
    }

    pub fn config(&self) -> &EventManagerConfig {
        &self.config
    }

    /// Listener bindings the host dispatcher should route to this manager
    pub fn listeners(&self) -> &[ListenerBinding] {
        self.table.listeners()
    }

    /// Dispatches a host event by its event name
    pub fn handle(&self, event_name: &str, args: &[ObjectRef]) -> Result<()> {
        self.dispatch(&event_method_name(event_name), args)
    }

    /// Dispatches one event call
    ///
    /// `args` are the positional arguments of the host call; the first one
    /// is normally the event object.
    ///
    /// # Errors
    ///
    /// Returns the error raised by a subscriber method, unchanged.
    pub fn dispatch(&self, event_method: &str, args: &[ObjectRef]) -> Result<()> {
        if !self.switch.is_enabled() {
            return Ok(());
        }

        let context = DispatchContext::from_call(event_method, args);
        let candidates = match candidates::select(&self.table, &context) {
            Ok(candidates) => candidates,
            Err(e) => {
                error!(severity = "error", error = %e, "Could not get subscribers");
                return Ok(());
            }
        };

        debug!(
            event_method = %event_method,
            subscribers = candidates.len(),
            "Dispatching event"
        );

        for candidate in &candidates {
            let service = match self.locator.get(candidate.class) {
                Ok(service) => service,
                Err(source) => {
                    let e = EventManagerError::SubscriberResolutionFailure {
                        class: candidate.class.to_string(),
                        source,
                    };
                    error!(severity = "critical", class = %candidate.class, error = %e, "Could not load subscriber");
                    continue;
                }
            };

            let Some(subscriber) = service.as_subscriber() else {
                let e = EventManagerError::SubscriberCapabilityMismatch {
                    class: candidate.class.to_string(),
                };
                error!(severity = "error", class = %candidate.class, error = %e, "Skipping subscriber class");
                continue;
            };

            if !subscriber.is_enabled() {
                continue;
            }

            self.invoke(candidate, subscriber, &context)?;
        }

        Ok(())
    }

    /// Subscribers that would run for a call, without invoking them
    ///
    /// # Errors
    ///
    /// Returns [`EventManagerError::UnknownEventMethod`] when nothing was
    /// declared for `event_method`.
    pub fn subscribers(
        &self,
        event_method: &str,
        args: &[ObjectRef],
    ) -> std::result::Result<Vec<Candidate<'_>>, EventManagerError> {
        let context = DispatchContext::from_call(event_method, args);
        candidates::select(&self.table, &context)
    }

    fn invoke(
        &self,
        candidate: &Candidate<'_>,
        subscriber: &dyn Subscriber,
        context: &DispatchContext<'_>,
    ) -> Result<()> {
        for method in &candidate.methods {
            let arguments = match binding::bind(candidate.class, method, context) {
                Ok(arguments) => arguments,
                Err(e) => {
                    self.report_unbound(&e);
                    continue;
                }
            };

            debug!(class = %candidate.class, method = %method.name, ?arguments, "Invoking subscriber method");

            if let Err(e) = subscriber.call(&method.name, &arguments) {
                if !e.is_validation() {
                    error!(
                        severity = "critical",
                        class = %format!("{}::{}", candidate.class, method.name),
                        error = %e,
                        "Listener threw exception"
                    );
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn report_unbound(&self, e: &EventManagerError) {
        if self.config.report_unbound_parameters {
            error!(severity = "error", error = %e, "Skipping subscriber method");
        } else {
            debug!(error = %e, "Skipping subscriber method");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use eventmanager_registry::{ArgumentFlag, ConcreteClass, Parameter, RegistryBuilder};
    use serde_json::json;

    use super::*;
    use crate::error::{LocatorError, SubscriberError, ValidationError};
    use crate::locator::ServiceLocator;
    use crate::object::DomainObject;
    use crate::payload::{EventArguments, EventPayload};
    use crate::subscriber::{BoundArguments, Service};

    struct Car {
        name: &'static str,
    }

    impl ConcreteClass for Car {
        const CLASS_NAME: &'static str = "Car";
    }

    impl DomainObject for Car {
        fn concrete_class(&self) -> Option<&str> {
            Some(Car::CLASS_NAME)
        }
    }

    struct SaveEvent {
        car: ObjectRef,
        arguments: EventArguments,
    }

    impl DomainObject for SaveEvent {
        fn as_payload(&self) -> Option<&dyn EventPayload> {
            Some(self)
        }
    }

    impl EventPayload for SaveEvent {
        fn arguments(&self) -> Option<EventArguments> {
            Some(self.arguments.clone())
        }

        fn object(&self) -> Option<ObjectRef> {
            Some(self.car.clone())
        }
    }

    type Calls = Arc<Mutex<Vec<String>>>;

    #[derive(Clone, Copy)]
    enum Behavior {
        Succeed,
        Reject,
        Fail,
    }

    struct RecordingSubscriber {
        class: &'static str,
        calls: Calls,
        behavior: Behavior,
        switch: Switch,
    }

    impl Subscriber for RecordingSubscriber {
        fn is_enabled(&self) -> bool {
            self.switch.is_enabled()
        }

        fn call(&self, method: &str, arguments: &BoundArguments) -> std::result::Result<(), SubscriberError> {
            let car = arguments.require::<Car>("object")?;
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}::{}({})", self.class, method, car.name));

            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Reject => Err(ValidationError::new("name is required").into()),
                Behavior::Fail => Err(anyhow::anyhow!("storage offline").into()),
            }
        }
    }

    crate::subscriber_service!(RecordingSubscriber);

    struct NotASubscriber;

    impl Service for NotASubscriber {}

    fn save(car: &'static str, arguments: serde_json::Value) -> Vec<ObjectRef> {
        let event: ObjectRef = Arc::new(SaveEvent {
            car: Arc::new(Car { name: car }),
            arguments: arguments.as_object().cloned().unwrap_or_default(),
        });
        vec![event]
    }

    fn register(locator: &ServiceLocator, class: &'static str, calls: &Calls, behavior: Behavior) {
        locator.register_instance(
            class,
            Arc::new(RecordingSubscriber {
                class,
                calls: calls.clone(),
                behavior,
                switch: Switch::default(),
            }),
        );
    }

    fn table(classes: &[&str]) -> Arc<DeclarationTable> {
        let mut builder = RegistryBuilder::new();
        for class in classes {
            builder
                .add_subscriber("postUpdate", class, "onSave", vec![Parameter::concrete::<Car>("object")])
                .unwrap();
        }
        Arc::new(builder.freeze())
    }

    fn recorded(calls: &Calls) -> Vec<String> {
        calls.lock().unwrap().clone()
    }

    /// In-memory sink for the fmt layer
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Runs `f` with a thread-local subscriber and returns what it logged
    fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let capture = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8_lossy(&capture.0.lock().unwrap()).into_owned();
        (result, logs)
    }

    #[test]
    fn test_dispatch_invokes_subscribers_in_registration_order() {
        let calls = Calls::default();
        let locator = ServiceLocator::new();
        register(&locator, "B", &calls, Behavior::Succeed);
        register(&locator, "A", &calls, Behavior::Succeed);
        let manager = EventManager::new(table(&["B", "A"]), Arc::new(locator));

        manager.dispatch("postUpdate", &save("golf", json!({}))).unwrap();

        assert_eq!(recorded(&calls), vec!["B::onSave(golf)", "A::onSave(golf)"]);
    }

    #[test]
    fn test_disabled_manager_is_noop() {
        let calls = Calls::default();
        let locator = ServiceLocator::new();
        register(&locator, "A", &calls, Behavior::Fail);
        let manager = EventManager::new(table(&["A"]), Arc::new(locator));

        assert!(manager.disable());
        manager.dispatch("postUpdate", &save("golf", json!({}))).unwrap();
        assert!(recorded(&calls).is_empty());

        assert!(!manager.enable());
        assert!(manager.dispatch("postUpdate", &save("golf", json!({}))).is_err());
    }

    #[test]
    fn test_config_sets_initial_state() {
        let config = EventManagerConfig {
            enabled: false,
            ..EventManagerConfig::default()
        };
        let manager = EventManager::with_config(table(&["A"]), Arc::new(ServiceLocator::new()), config);

        assert!(!manager.is_enabled());
        assert!(!manager.set_enabled(true));
        assert!(manager.switch().is_enabled());
    }

    #[test]
    fn test_unknown_event_method_is_logged_not_raised() {
        let calls = Calls::default();
        let locator = ServiceLocator::new();
        register(&locator, "A", &calls, Behavior::Succeed);
        let manager = EventManager::new(table(&["A"]), Arc::new(locator));

        let (result, logs) = capture_logs(|| manager.dispatch("preDelete", &save("golf", json!({}))));

        assert!(result.is_ok());
        assert!(recorded(&calls).is_empty());
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("Could not get subscribers"));
        assert!(logs.contains("Unknown method: preDelete"));
    }

    #[test]
    fn test_unresolvable_subscriber_is_skipped() {
        let calls = Calls::default();
        let locator = ServiceLocator::new();
        locator.register("Broken", || {
            Err(LocatorError::ConstructionFailed {
                class: "Broken".to_string(),
                message: "missing dependency".to_string(),
            })
        });
        register(&locator, "A", &calls, Behavior::Succeed);
        let manager = EventManager::new(table(&["Missing", "Broken", "A"]), Arc::new(locator));

        let (result, logs) = capture_logs(|| manager.dispatch("postUpdate", &save("golf", json!({}))));

        assert!(result.is_ok());
        assert_eq!(recorded(&calls), vec!["A::onSave(golf)"]);
        let critical: Vec<&str> = logs
            .lines()
            .filter(|line| line.contains("Could not load subscriber") && line.contains("critical"))
            .collect();
        assert_eq!(critical.len(), 2);
        assert!(critical[0].contains("Missing"));
        assert!(critical[1].contains("Broken"));
        assert!(critical[1].contains("missing dependency"));
    }

    #[test]
    fn test_service_without_capability_is_skipped() {
        let calls = Calls::default();
        let locator = ServiceLocator::new();
        locator.register_instance("Plain", Arc::new(NotASubscriber));
        register(&locator, "A", &calls, Behavior::Succeed);
        let manager = EventManager::new(table(&["Plain", "A"]), Arc::new(locator));

        let (result, logs) = capture_logs(|| manager.dispatch("postUpdate", &save("golf", json!({}))));

        assert!(result.is_ok());
        assert_eq!(recorded(&calls), vec!["A::onSave(golf)"]);
        assert!(logs.contains("Skipping subscriber class"));
        assert!(logs.contains("Service Plain is not an event subscriber"));
    }

    #[test]
    fn test_disabled_subscriber_is_skipped() {
        let calls = Calls::default();
        let locator = ServiceLocator::new();
        let disabled = RecordingSubscriber {
            class: "Off",
            calls: calls.clone(),
            behavior: Behavior::Succeed,
            switch: Switch::new(false),
        };
        locator.register_instance("Off", Arc::new(disabled));
        register(&locator, "A", &calls, Behavior::Succeed);
        let manager = EventManager::new(table(&["Off", "A"]), Arc::new(locator));

        manager.dispatch("postUpdate", &save("golf", json!({}))).unwrap();
        assert_eq!(recorded(&calls), vec!["A::onSave(golf)"]);
    }

    #[test]
    fn test_validation_failure_propagates_and_halts() {
        let calls = Calls::default();
        let locator = ServiceLocator::new();
        register(&locator, "A", &calls, Behavior::Succeed);
        register(&locator, "Guard", &calls, Behavior::Reject);
        register(&locator, "C", &calls, Behavior::Succeed);
        let manager = EventManager::new(table(&["A", "Guard", "C"]), Arc::new(locator));

        let (result, logs) = capture_logs(|| manager.dispatch("postUpdate", &save("golf", json!({}))));
        let err = result.unwrap_err();

        assert!(!logs.contains("Listener threw exception"));
        assert!(!logs.contains("critical"));
        match err {
            SubscriberError::Validation(v) => assert_eq!(v.message(), "name is required"),
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(recorded(&calls), vec!["A::onSave(golf)", "Guard::onSave(golf)"]);
    }

    #[test]
    fn test_unexpected_failure_is_returned_unchanged() {
        let calls = Calls::default();
        let locator = ServiceLocator::new();
        register(&locator, "A", &calls, Behavior::Fail);
        register(&locator, "B", &calls, Behavior::Succeed);
        let manager = EventManager::new(table(&["A", "B"]), Arc::new(locator));

        let (result, logs) = capture_logs(|| manager.dispatch("postUpdate", &save("golf", json!({}))));
        let err = result.unwrap_err();

        assert!(matches!(err, SubscriberError::Failed(_)));
        assert_eq!(err.to_string(), "storage offline");
        assert_eq!(recorded(&calls), vec!["A::onSave(golf)"]);

        let line = logs
            .lines()
            .find(|line| line.contains("Listener threw exception"))
            .expect("failure is logged before it is returned");
        assert!(line.contains("ERROR"));
        assert!(line.contains("critical"));
        assert!(line.contains("A::onSave"));
        assert!(line.contains("storage offline"));
    }

    #[test]
    fn test_failure_abandons_remaining_methods_of_subscriber() {
        let calls = Calls::default();
        let locator = ServiceLocator::new();
        register(&locator, "A", &calls, Behavior::Fail);
        let mut builder = RegistryBuilder::new();
        for method in ["first", "second"] {
            builder
                .add_subscriber("postUpdate", "A", method, vec![Parameter::concrete::<Car>("object")])
                .unwrap();
        }
        let manager = EventManager::new(Arc::new(builder.freeze()), Arc::new(locator));

        assert!(manager.dispatch("postUpdate", &save("golf", json!({}))).is_err());
        assert_eq!(recorded(&calls), vec!["A::first(golf)"]);
    }

    #[test]
    fn test_unbound_method_is_skipped_but_next_runs() {
        struct Driver;
        impl DomainObject for Driver {}

        let calls = Calls::default();
        let locator = ServiceLocator::new();
        register(&locator, "A", &calls, Behavior::Succeed);
        let mut builder = RegistryBuilder::new();
        builder
            .add_subscriber(
                "postUpdate",
                "A",
                "withDriver",
                vec![Parameter::concrete::<Car>("object"), Parameter::of::<Driver>("driver")],
            )
            .unwrap();
        builder
            .add_subscriber("postUpdate", "A", "onSave", vec![Parameter::concrete::<Car>("object")])
            .unwrap();
        let config = EventManagerConfig {
            report_unbound_parameters: true,
            ..EventManagerConfig::default()
        };
        let manager = EventManager::with_config(Arc::new(builder.freeze()), Arc::new(locator), config);

        let (result, logs) = capture_logs(|| manager.dispatch("postUpdate", &save("golf", json!({}))));

        assert!(result.is_ok());
        assert_eq!(recorded(&calls), vec!["A::onSave(golf)"]);
        let line = logs
            .lines()
            .find(|line| line.contains("Skipping subscriber method"))
            .expect("unbound parameter is reported");
        assert!(line.contains("ERROR"));
        assert!(line.contains("Could not resolve A::withDriver for argument driver"));
    }

    #[test]
    fn test_handle_normalizes_event_name() {
        let calls = Calls::default();
        let locator = ServiceLocator::new();
        register(&locator, "A", &calls, Behavior::Succeed);
        let mut builder = RegistryBuilder::new();
        builder
            .subscribe("pimcore.dataobject.post-update", 0, "A", "onSave", vec![Parameter::concrete::<Car>("object")])
            .unwrap();
        builder
            .add_event_argument(ArgumentFlag::AutoSave, "A", "onSave")
            .unwrap();
        let manager = EventManager::new(Arc::new(builder.freeze()), Arc::new(locator));

        assert_eq!(manager.listeners()[0].method, "pimcoredataobjectpostupdate");
        manager
            .handle("pimcore.dataobject.post-update", &save("golf", json!({"isAutoSave": true})))
            .unwrap();
        assert_eq!(recorded(&calls), vec!["A::onSave(golf)"]);
    }

    #[test]
    fn test_subscribers_preview() {
        let manager = EventManager::new(table(&["A", "B"]), Arc::new(ServiceLocator::new()));

        let candidates = manager.subscribers("postUpdate", &save("golf", json!({}))).unwrap();
        let classes: Vec<&str> = candidates.iter().map(|c| c.class).collect();
        assert_eq!(classes, vec!["A", "B"]);
        assert!(manager.subscribers("preAdd", &[]).is_err());
    }
}
