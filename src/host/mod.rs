// Host module - the boundary with the execution environment
// Per-call context in, outbound value transfers out

mod context;
mod sink;

pub use context::CallContext;
pub use sink::{MockValueSink, Payout, TransferError, ValueSink};
