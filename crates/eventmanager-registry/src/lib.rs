//! Event Manager Declaration Registry
//!
//! Records which subscriber methods listen to which events, built once while
//! the application boots and handed to the dispatcher as a frozen table.
//!
//! # Overview
//!
//! The registry keeps three structures, all keyed by plain string identifiers:
//!
//! 1. **Subscribers**: event method → subscriber class → method → parameters,
//!    where each parameter lists the types it accepts (union types allowed)
//! 2. **Type map**: concrete data-object class → subscriber classes that
//!    declared a parameter of that class
//! 3. **Argument map**: event argument flag → subscriber class → methods that
//!    only fire when the flag is set on the event
//!
//! Declarations are appended through [`RegistryBuilder`] and published with
//! [`RegistryBuilder::freeze`]. The resulting [`DeclarationTable`] is
//! read-only and is shared between dispatch calls behind an `Arc`.
//!
//! # Quick Start
//!
//! ```ignore
//! use eventmanager_registry::{ArgumentFlag, Parameter, ParamType, RegistryBuilder};
//!
//! let mut builder = RegistryBuilder::new();
//! builder.subscribe(
//!     "pimcore.dataobject.postUpdate",
//!     0,
//!     "ProductSubscriber",
//!     "onSave",
//!     vec![Parameter::new("object", vec![ParamType::concrete::<Product>()])],
//! )?;
//! builder.add_event_argument(ArgumentFlag::AutoSave, "ProductSubscriber", "onSave")?;
//!
//! let table = builder.freeze();
//! assert!(table.subscribers_for("pimcoredataobjectpostUpdate").is_some());
//! # Ok::<(), eventmanager_registry::RegistryError>(())
//! ```
//!
//! # Static Declarations
//!
//! Subscriber crates can declare their methods next to the code with
//! `inventory::submit!` (see [`declarations`]); the builder folds them in with
//! [`RegistryBuilder::from_static_declarations`].

pub mod builder;
pub mod declarations;
pub mod error;
pub mod flags;
pub mod naming;
pub mod table;
pub mod types;

pub use builder::RegistryBuilder;
pub use declarations::{ArgumentDeclaration, EventDeclaration};
pub use error::{RegistryError, Result};
pub use flags::ArgumentFlag;
pub use naming::event_method_name;
pub use table::{
    DeclarationTable, ListenerBinding, MethodDeclaration, SubscriberDeclaration, TableSummary,
};
pub use types::{ConcreteClass, ParamType, Parameter, TypeKey};
