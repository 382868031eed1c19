pub mod cors;
pub mod credential_gate;
pub mod request_trace;
pub mod role_authority;
pub mod structured_logger;
pub mod trace_span;

pub use cors::cors_middleware;
pub use credential_gate::CredentialGate;
pub use request_trace::{RequestTrace, TraceId};
pub use role_authority::RequireRole;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
