//! Declarative protocol data model.
//!
//! A [`Protocol`] is pure data: the deck layout plus an ordered list of
//! [`ProtocolStep`]s, each holding one or more [`Op`]s. Nothing here talks
//! to the robot — the planner expands these descriptions into concrete
//! command sequences. Sample-count-dependent quantities (master-mix
//! volumes, the first incubation) are kept symbolic via [`Volume`] and
//! [`Delay`] so one protocol definition serves any valid sample count.

use crate::error::ProtocolError;
use crate::layout::{SampleCount, Well};
use crate::robot::Pipette;

/// Labware on the deck, referenced by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabwareId {
    Reservoir,
    SampleRack,
    ReagentBlock,
    TempBlock,
    TipRack20,
    TipRack1000,
}

impl LabwareId {
    /// Label used to reference this labware in robot commands.
    pub fn label(&self) -> &'static str {
        match self {
            LabwareId::Reservoir => "reservoir",
            LabwareId::SampleRack => "sample_rack",
            LabwareId::ReagentBlock => "reagent_block",
            LabwareId::TempBlock => "temp_block",
            LabwareId::TipRack20 => "tips_20ul",
            LabwareId::TipRack1000 => "tips_1000ul",
        }
    }
}

/// A well on a specific labware.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub labware: LabwareId,
    pub well: Well,
}

impl Location {
    pub const fn new(labware: LabwareId, well: Well) -> Self {
        Self { labware, well }
    }
}

/// One piece of labware and the deck slot it occupies.
#[derive(Debug, Clone, Copy)]
pub struct DeckSlot {
    pub id: LabwareId,
    pub kind: &'static str,
    pub slot: u8,
}

/// A hardware module and its deck slot.
#[derive(Debug, Clone, Copy)]
pub struct ModuleSlot {
    pub kind: &'static str,
    pub slot: u8,
}

/// Mix cycles performed at the current location after a dispense.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mix {
    pub repetitions: u32,
    pub volume_ul: f64,
}

/// A transfer volume, fixed or scaled by the sample count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Volume {
    /// Absolute volume in µl.
    Fixed(f64),
    /// Master-mix style volume: one share per sample plus spare shares
    /// covering dead volume, `(samples + spare) × share` µl in total.
    PerSample { share_ul: f64, spare_shares: u32 },
}

impl Volume {
    pub fn resolve(&self, samples: SampleCount) -> f64 {
        match self {
            Volume::Fixed(ul) => *ul,
            Volume::PerSample {
                share_ul,
                spare_shares,
            } => (samples.get() + spare_shares) as f64 * share_ul,
        }
    }
}

/// An incubation duration, fixed or derived from a reaction window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delay {
    /// Fixed incubation, in minutes.
    Fixed(f64),
    /// A reaction window that opens when the first sample is dosed: the
    /// remaining wait is the window less one minute of handling per sample
    /// and a fixed preparation overhead spent on the next master mix.
    WindowLessHandling { window_min: f64, prep_min: f64 },
}

impl Delay {
    pub fn resolve(&self, samples: SampleCount) -> Result<f64, ProtocolError> {
        let minutes = match self {
            Delay::Fixed(min) => *min,
            Delay::WindowLessHandling {
                window_min,
                prep_min,
            } => window_min - samples.get() as f64 - prep_min,
        };
        if minutes <= 0.0 {
            return Err(ProtocolError::Configuration(format!(
                "incubation window exhausted: resolved to {minutes} minutes"
            )));
        }
        Ok(minutes)
    }
}

/// A transfer between two fixed wells, split into aliquots when the
/// volume exceeds the pipette capacity. One fresh tip per aliquot.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSpec {
    pub pipette: Pipette,
    pub source: Location,
    pub dest: Location,
    pub volume: Volume,
    /// Applied after the final aliquot is dispensed.
    pub mix_after: Option<Mix>,
}

/// A transfer from a fixed source into every sample well, one fresh tip
/// per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTransferSpec {
    pub pipette: Pipette,
    pub source: Location,
    pub volume_ul: f64,
    pub mix_after: Option<Mix>,
}

/// One action within a protocol step.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Transfer(TransferSpec),
    TransferToSamples(SampleTransferSpec),
    Incubate(Delay),
    SetTemperature(f64),
}

/// A named, ordered unit of work. Steps execute in declaration order;
/// none is skipped, retried or reordered.
#[derive(Debug, Clone)]
pub struct ProtocolStep {
    pub name: &'static str,
    pub ops: Vec<Op>,
}

impl ProtocolStep {
    pub fn new(name: &'static str, ops: Vec<Op>) -> Self {
        Self { name, ops }
    }
}

/// A complete protocol: deck layout, optional module, where the sample
/// tubes live, and the step list.
#[derive(Debug, Clone)]
pub struct Protocol {
    pub name: &'static str,
    pub deck: Vec<DeckSlot>,
    pub module: Option<ModuleSlot>,
    pub samples: LabwareId,
    pub steps: Vec<ProtocolStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(n: u32) -> SampleCount {
        SampleCount::new(n).unwrap()
    }

    #[test]
    fn fixed_volume_ignores_sample_count() {
        assert_eq!(Volume::Fixed(700.0).resolve(samples(2)), 700.0);
        assert_eq!(Volume::Fixed(700.0).resolve(samples(12)), 700.0);
    }

    #[test]
    fn per_sample_volume_scales_with_spares() {
        let v = Volume::PerSample {
            share_ul: 3.0,
            spare_shares: 1,
        };
        assert_eq!(v.resolve(samples(4)), 15.0);
        assert_eq!(v.resolve(samples(12)), 39.0);

        let v2 = Volume::PerSample {
            share_ul: 3.0,
            spare_shares: 2,
        };
        assert_eq!(v2.resolve(samples(12)), 42.0);
    }

    #[test]
    fn fixed_delay_resolves_as_given() {
        assert_eq!(Delay::Fixed(10.0).resolve(samples(4)).unwrap(), 10.0);
    }

    #[test]
    fn window_delay_deducts_handling_time() {
        let d = Delay::WindowLessHandling {
            window_min: 20.0,
            prep_min: 2.0,
        };
        assert_eq!(d.resolve(samples(4)).unwrap(), 14.0);
        assert_eq!(d.resolve(samples(12)).unwrap(), 6.0);
    }

    #[test]
    fn exhausted_window_is_a_configuration_error() {
        let d = Delay::WindowLessHandling {
            window_min: 5.0,
            prep_min: 2.0,
        };
        assert!(matches!(
            d.resolve(samples(4)),
            Err(ProtocolError::Configuration(_))
        ));
    }

    #[test]
    fn labware_labels_are_stable() {
        assert_eq!(LabwareId::Reservoir.label(), "reservoir");
        assert_eq!(LabwareId::TempBlock.label(), "temp_block");
        assert_eq!(LabwareId::TipRack20.label(), "tips_20ul");
    }
}
