//! # costgraph_schema
//!
//! The cost model shared by every stage of the costgraph pipeline.
//!
//! A [`Resource`] is a named node holding ordered [`CostComponent`]s and
//! ordered sub-resources. Registry constructors produce unpriced trees, the
//! price resolver binds unit prices onto the components, and this crate turns
//! the priced trees into totals, diffs and serializable breakdowns.
//!
//! # Architecture
//!
//! - **Resource**: cost model nodes, components and pricing filters
//! - **Costs**: hourly/monthly cost aggregation
//! - **Diff**: deltas between a past and a current forest
//! - **Project**: one evaluated plan with its past/current forests and summary
//! - **Output**: the data contract handed to renderers
//!
//! # Example
//!
//! ```rust
//! use costgraph_schema::{CostComponent, ProductFilter, Resource};
//! use rust_decimal::Decimal;
//!
//! let mut component = CostComponent::hourly(
//!     "Instance usage",
//!     "hours",
//!     Some(Decimal::ONE),
//!     ProductFilter::new("aws").region("us-east-1").service("AmazonEC2"),
//! );
//! component.set_price(Decimal::new(10, 2));
//!
//! let resource = Resource::new("aws_instance.web", "aws_instance").with_component(component);
//! assert_eq!(resource.monthly_cost(), Decimal::new(7300, 2));
//! ```

pub mod costs;
pub mod diff;
pub mod error;
pub mod output;
pub mod project;
pub mod resource;

pub use costs::{calculate_totals, CostTotals};
pub use diff::{calculate_diff, ComponentDiff, Diff, ResourceDiff};
pub use error::{SchemaError, SchemaResult};
pub use output::{ComponentOutput, ProjectOutput, ResourceOutput, Root};
pub use project::{Project, ResourceSummary};
pub use resource::{
    hours_in_month, AttributeFilter, CostComponent, Period, PriceFilter, ProductFilter, Resource,
    HOURS_IN_MONTH,
};
