pub mod capability;
pub mod descriptor;
pub mod registry;

pub use capability::Capability;
pub use descriptor::{Cardinality, Method, ModelDescriptor, Relation};
pub use registry::{RegisteredResource, ResourceRegistry};
