//! Fully connected feed forward networks stored as a single flat parameter vector.
//!
//! A [`Network`] owns its parameters and a [`Layout`] that maps every
//! (layer, unit) coordinate into that vector. Networks can be built from a
//! [`Topology`], evaluated with [`Network::forward`] and exported to or
//! imported from their JSON form ([`NetworkFile`]).

pub mod activation;
pub mod codec;
pub mod error;
pub mod initialization;
pub mod layout;
pub mod network;
pub mod topology;

pub use activation::ActFn;
pub use codec::NetworkFile;
pub use error::{ConfigErr, NetErr, Result};
pub use layout::Layout;
pub use network::{Network, NetworkConfig, Scratch};
pub use topology::Topology;
