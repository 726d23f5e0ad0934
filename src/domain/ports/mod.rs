//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod asset_source;
pub mod converge_events;
pub mod delivery_network;
pub mod object_store;
pub mod state_repository;

pub use asset_source::{AssetSource, SourceError};
pub use converge_events::{ConvergeEvent, ConvergeEventSink, DistributionChange, NoopEventSink};
pub use delivery_network::{DeliveryError, DeliveryNetwork, DeliveryResult};
pub use object_store::{ObjectStore, ObjectUpload, StoreError, StoreResult};
pub use state_repository::{StateError, StateRepository, StateResult};
