//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. CORS: answers preflight, restricts origins
//! 2. Audit logger: request id, status, latency

pub mod audit;
