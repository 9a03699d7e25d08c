//! External service integrations.

pub mod geocode_client {
    pub use crate::geocode_client::*;
}
