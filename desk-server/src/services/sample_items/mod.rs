pub mod sample_items_policy;
pub mod sample_items_routes;
pub mod sample_items_service;

pub use sample_items_policy::SampleItemPolicy;
pub use sample_items_routes::router;
pub use sample_items_service::{SampleItem, SampleItemsService};
