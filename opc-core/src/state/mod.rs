pub mod connection;

pub use connection::ConnectionPhase;
