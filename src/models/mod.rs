mod enrollment_token;
mod network_settings;
mod scope;

pub use enrollment_token::*;
pub use network_settings::*;
pub use scope::*;
