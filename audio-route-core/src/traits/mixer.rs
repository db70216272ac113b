use crate::models::error::ControlError;

/// Key/value access to a hardware mixer card's named controls.
pub trait MixerControl {
    /// Identifier of the mixer card (e.g. `hw:00`), used in diagnostics.
    fn card(&self) -> &str;

    /// Select an enumerated item by name (e.g. a mux source).
    fn set_enumerated(&mut self, name: &str, value: &str) -> Result<(), ControlError>;

    /// Write an integer or boolean control on all of its channels.
    fn set_integer(&mut self, name: &str, value: i64) -> Result<(), ControlError>;
}
