use std::fmt;

use crate::models::error::ControlError;
use crate::traits::mixer::MixerControl;

/// One named mixer control assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlSetting {
    /// Select an enumerated item, e.g. `"HF Left Playback" = "HF DAC"`.
    Enumerated { name: String, value: String },

    /// Write a number. If the write fails and `fallback` is set, the
    /// fallback is written instead.
    Numeric {
        name: String,
        value: i64,
        fallback: Option<i64>,
    },
}

impl ControlSetting {
    pub fn enumerated(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Enumerated {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn numeric(name: impl Into<String>, value: i64) -> Self {
        Self::Numeric {
            name: name.into(),
            value,
            fallback: None,
        }
    }

    pub fn numeric_or(name: impl Into<String>, value: i64, fallback: i64) -> Self {
        Self::Numeric {
            name: name.into(),
            value,
            fallback: Some(fallback),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Enumerated { name, .. } | Self::Numeric { name, .. } => name,
        }
    }

    /// Write this setting to `mixer`.
    ///
    /// For numeric settings the primary error is returned if the fallback
    /// write also fails.
    pub fn apply(&self, mixer: &mut dyn MixerControl) -> Result<(), ControlError> {
        match self {
            Self::Enumerated { name, value } => mixer.set_enumerated(name, value),
            Self::Numeric { name, value, fallback } => match mixer.set_integer(name, *value) {
                Ok(()) => Ok(()),
                Err(err) => match fallback {
                    Some(fallback) => {
                        log::debug!("Control '{}' rejected {}, trying fallback {}", name, value, fallback);
                        mixer.set_integer(name, *fallback).map_err(|_| err)
                    }
                    None => Err(err),
                },
            },
        }
    }
}

impl fmt::Display for ControlSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enumerated { name, value } => write!(f, "{} = \"{}\"", name, value),
            Self::Numeric {
                name,
                value,
                fallback: Some(fallback),
            } => write!(f, "{} = {} (fallback {})", name, value, fallback),
            Self::Numeric { name, value, .. } => write!(f, "{} = {}", name, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MixerWrite, MockMixer};

    #[test]
    fn enumerated_writes_item_name() {
        let mut mixer = MockMixer::new("hw:00");
        ControlSetting::enumerated("HF Left Playback", "HF DAC").apply(&mut mixer).unwrap();

        assert_eq!(
            mixer.writes(),
            vec![MixerWrite::Enumerated("HF Left Playback".into(), "HF DAC".into())]
        );
    }

    #[test]
    fn numeric_uses_fallback_when_primary_rejected() {
        let mut mixer = MockMixer::new("hw:00");
        mixer.reject_value("Headset Playback Volume", 0);

        ControlSetting::numeric_or("Headset Playback Volume", 0, -1)
            .apply(&mut mixer)
            .unwrap();

        assert_eq!(
            mixer.value_of("Headset Playback Volume"),
            Some(MixerWrite::Integer("Headset Playback Volume".into(), -1))
        );
    }

    #[test]
    fn numeric_without_fallback_reports_error() {
        let mut mixer = MockMixer::new("hw:00");
        mixer.reject_value("Capture Volume", 4);

        let err = ControlSetting::numeric("Capture Volume", 4).apply(&mut mixer).unwrap_err();
        assert!(matches!(err, ControlError::WriteFailed { .. }));
    }

    #[test]
    fn missing_control_fails_even_with_fallback() {
        let mut mixer = MockMixer::new("hw:00");
        mixer.remove_control("DL1 PDM Switch");

        let err = ControlSetting::numeric_or("DL1 PDM Switch", 0, 0)
            .apply(&mut mixer)
            .unwrap_err();
        assert_eq!(err, ControlError::NotFound("DL1 PDM Switch".into()));
        assert!(mixer.writes().is_empty());
    }

    #[test]
    fn display_shows_fallback() {
        assert_eq!(
            ControlSetting::numeric_or("Capture Volume", 0, -1).to_string(),
            "Capture Volume = 0 (fallback -1)"
        );
        assert_eq!(
            ControlSetting::enumerated("MUX_VX0", "None").to_string(),
            "MUX_VX0 = \"None\""
        );
    }
}
