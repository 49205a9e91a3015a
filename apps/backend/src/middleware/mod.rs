pub mod cors;
pub mod request_trace;
pub mod security_headers;
pub mod structured_logger;
pub mod token_auth;
pub mod trace_span;

pub use cors::cors_middleware;
pub use request_trace::RequestTrace;
pub use security_headers::SecurityHeaders;
pub use structured_logger::StructuredLogger;
pub use token_auth::{AccessPolicy, TokenAuth, TOKEN_HEADER};
pub use trace_span::TraceSpan;
