//! XG parameter database: addresses, the static parameter map, groups with
//! current-key indirection, and the registry that owns every value.

pub mod address;
pub mod error;
pub mod event;
pub mod group;
pub mod registry;
pub mod table;

pub use address::ParamAddress;
pub use error::SetError;
pub use event::{ParamEvent, ParamEventReceiver, ResetScope};
pub use group::{GroupId, Instances, ParamGroup};
pub use registry::{Param, ParamRegistry, ParamSizes, RangePolicy, SetOutcome};
pub use table::{ParamDef, Trigger};
