pub mod gate;

pub use gate::{AuthGateState, RequestSession, auth_gate_middleware, authorize, presented_tokens};
