//! Placement domain models.
//!
//! Core data types for describing placement problems and their solutions:
//! serving sites, task types, raw optimization input, and the placement
//! plan produced by either algorithm path.
//!
//! # Domain Mapping
//!
//! | u-place | Cloud | Edge | CDN |
//! |---------|-------|------|-----|
//! | Site | Region/DC | PoP | Edge Node |
//! | TaskType | Service Class | Workload Class | Content Class |
//! | FlowAssignment | Request Routing | Offload Decision | Cache Routing |
//! | PlacementPlan | Deployment Plan | Placement Map | Distribution Plan |

mod config;
mod plan;
mod site;
mod task;

pub use config::{DelayMap, DemandMap, PlacementConfig};
pub use plan::{FlowAssignment, PlacementPlan};
pub use site::Site;
pub use task::TaskType;
