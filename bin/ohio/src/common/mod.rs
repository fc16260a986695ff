mod connect;
mod error;
mod hardfork;
mod hex;
mod logging;

pub use connect::*;
pub use error::*;
pub use hardfork::*;
pub use hex::*;
pub use logging::*;
