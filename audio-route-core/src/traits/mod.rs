pub mod control_sequence;
pub mod mixer;
pub mod modem;
pub mod observer;
pub mod transport;
