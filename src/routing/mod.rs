//! Routing module
//!
//! Dispatch table, the dispatcher itself and the per-server `Router`.

pub mod dispatcher;
pub mod router;
pub mod table;

pub use dispatcher::{dispatch, HandlerFailure, INTERNAL_ERROR_BODY};
pub use router::Router;
pub use table::{DispatchTable, DispatchTableBuilder, Route, TableSlot};
