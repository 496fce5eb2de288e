// The drag-and-drop scheduling engine: catalog generation, placement
// bookkeeping, overlap validation, the drag gesture state machine, and the
// grid/inbox projections. Everything here is pure except `session`, which
// wires the engine to a persistence backend.

pub mod catalog;
pub mod drag;
pub mod grid;
pub mod overlap;
pub mod placement;
pub mod session;
