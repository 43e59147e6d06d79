pub mod token_gate;

pub use token_gate::{
    PgTokenStore, ScopeResolution, ScopeResolutionError, TokenGate, TokenGateError, TokenStore,
};
