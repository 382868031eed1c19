//! Security audit events. Each carries an `event` tag and the request trace id.

use tracing::{info, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A request was turned away by the credential gate.
pub fn token_rejected(code: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        code,
        path,
        "Credential rejected"
    );
}

/// An authenticated caller lacked the role a route requires.
pub fn role_denied(email: &str, required: &str, actual: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_ROLE_DENIED",
        %trace_id,
        email = %Redacted(email),
        required,
        actual,
        "Insufficient role"
    );
}

/// A token was minted for a caller.
pub fn token_issued(email: &str) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_TOKEN_ISSUED",
        %trace_id,
        email = %Redacted(email),
        "Access token issued"
    );
}
