//! Best-effort mixer programming.
//!
//! Mixer graphs are over-specified so one sequence works across hardware
//! revisions; a control that is missing or rejected is reported and the
//! rest of the sequence is still applied.

use crate::models::device::{AudioMode, DeviceMask};
use crate::models::profile::ControlStrategy;
use crate::models::warning::RouteWarning;
use crate::traits::control_sequence::ControlSequence;
use crate::traits::mixer::MixerControl;
use crate::traits::modem::VoiceModem;

/// Outcome of one programming pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramReport {
    /// Settings written successfully.
    pub applied: usize,
    /// One entry per setting (or modem call) that failed.
    pub warnings: Vec<RouteWarning>,
}

impl ProgramReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Applies a board's control sequences to a mixer.
pub struct ControlProgrammer {
    sequence: Box<dyn ControlSequence>,
}

impl ControlProgrammer {
    pub fn new(sequence: Box<dyn ControlSequence>) -> Self {
        Self { sequence }
    }

    /// Program the mixer for `devices` in `mode` using `strategy`.
    ///
    /// If a modem is present and the strategy wants it, the modem's call
    /// routing is applied first. Every setting is then attempted in order.
    pub fn program(
        &self,
        strategy: ControlStrategy,
        devices: DeviceMask,
        mode: AudioMode,
        mixer: &mut dyn MixerControl,
        modem: Option<&mut (dyn VoiceModem + '_)>,
    ) -> ProgramReport {
        log::debug!(
            "Programming {:?} controls on {} for devices {} in mode {}",
            strategy,
            mixer.card(),
            devices,
            mode
        );

        let mut report = ProgramReport::default();

        if let Some(modem) = modem {
            if self.sequence.wants_call_routing(strategy) {
                if let Err(reason) = modem.apply_call_routing(devices, mode, mixer) {
                    let warning = RouteWarning::ModemFailed { devices, mode, reason };
                    log::warn!("{}", warning);
                    report.warnings.push(warning);
                }
            }
        }

        for setting in self.sequence.settings(strategy, devices, mode) {
            match setting.apply(mixer) {
                Ok(()) => report.applied += 1,
                Err(error) => {
                    let warning = RouteWarning::ControlNotApplied {
                        control: setting.name().to_string(),
                        error,
                    };
                    log::warn!("{}", warning);
                    report.warnings.push(warning);
                }
            }
        }

        report
    }
}
