//! The RNA-purification protocol (RNeasy mini kit), in two variants.
//!
//! Both variants run the same chemistry: dose each sample with SUPER-In,
//! assemble master mix 1 (lysozyme, proteinase K, SDS) and distribute it,
//! incubate, assemble master mix 2 (DNase I, RDD buffer) and distribute
//! it, then add RLT lysis buffer and ethanol. The temperature variant
//! additionally holds the samples on a temperature module (22 °C for
//! handling, 37 °C for the first incubation) and budgets extra spare
//! volume in master mix 1.

use crate::layout::Well;
use crate::protocol::step::{
    DeckSlot, Delay, LabwareId, Location, Mix, ModuleSlot, Op, Protocol, ProtocolStep,
    SampleTransferSpec, TransferSpec, Volume,
};
use crate::robot::Pipette;

const RESERVOIR_KIND: &str = "nest_12_reservoir_15ml";
const SAMPLE_RACK_KIND: &str = "opentrons_24_tuberack_eppendorf_1.5ml_safelock_snapcap";
const ALUMINUM_BLOCK_KIND: &str = "opentrons_24_aluminumblock_generic_2ml_screwcap";
const TIPS_20_KIND: &str = "opentrons_96_filtertiprack_20ul";
const TIPS_1000_KIND: &str = "geb_96_tiprack_1000ul";
const TEMP_MODULE_KIND: &str = "temperature module";

// Reagent positions. Master mix 1 is assembled in a spare tube on the
// sample rack; master mix 2 in the reagent block.
const SUPER_IN: Location = Location::new(LabwareId::ReagentBlock, Well::new('A', 3));
const LYSOZYME: Location = Location::new(LabwareId::ReagentBlock, Well::new('A', 1));
const PROTEINASE_K: Location = Location::new(LabwareId::ReagentBlock, Well::new('B', 1));
const SDS: Location = Location::new(LabwareId::SampleRack, Well::new('A', 1));
const MASTER_MIX_1: Location = Location::new(LabwareId::SampleRack, Well::new('A', 3));
const DNASE_I: Location = Location::new(LabwareId::ReagentBlock, Well::new('A', 5));
const MASTER_MIX_2: Location = Location::new(LabwareId::ReagentBlock, Well::new('D', 5));
const RDD_RESERVOIR: Location = Location::new(LabwareId::Reservoir, Well::new('A', 1));
const RDD_BLOCK: Location = Location::new(LabwareId::ReagentBlock, Well::new('A', 6));
const RLT: Location = Location::new(LabwareId::Reservoir, Well::new('A', 3));
const ETHANOL: Location = Location::new(LabwareId::Reservoir, Well::new('A', 5));

/// Which variant of the protocol to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Standard,
    Temperature,
}

impl Variant {
    pub fn by_name(name: &str) -> Option<Variant> {
        match name {
            "standard" => Some(Variant::Standard),
            "temperature" => Some(Variant::Temperature),
            _ => None,
        }
    }

    pub fn build(&self) -> Protocol {
        match self {
            Variant::Standard => standard(),
            Variant::Temperature => temperature(),
        }
    }
}

fn transfer(
    pipette: Pipette,
    source: Location,
    dest: Location,
    volume: Volume,
    mix_after: Option<Mix>,
) -> Op {
    Op::Transfer(TransferSpec {
        pipette,
        source,
        dest,
        volume,
        mix_after,
    })
}

fn to_samples(pipette: Pipette, source: Location, volume_ul: f64, mix_after: Option<Mix>) -> Op {
    Op::TransferToSamples(SampleTransferSpec {
        pipette,
        source,
        volume_ul,
        mix_after,
    })
}

fn mix(repetitions: u32, volume_ul: f64) -> Option<Mix> {
    Some(Mix {
        repetitions,
        volume_ul,
    })
}

/// Steps shared by both variants, parameterized by what differs: the
/// spare shares budgeted into master mix 1, the RDD buffer source, and
/// whether a second timed incubation follows master mix 2.
fn core_steps(mm1_spare: u32, rdd_source: Location) -> Vec<(usize, ProtocolStep)> {
    let per_sample = |share_ul: f64| Volume::PerSample {
        share_ul,
        spare_shares: mm1_spare,
    };
    // Master mix 2 always budgets one spare share.
    let mm2_volume = |share_ul: f64| Volume::PerSample {
        share_ul,
        spare_shares: 1,
    };

    vec![
        (
            0,
            ProtocolStep::new(
                "Distribute SUPER-In to samples",
                vec![to_samples(Pipette::P20, SUPER_IN, 1.0, mix(3, 20.0))],
            ),
        ),
        (
            1,
            ProtocolStep::new(
                "Add lysozyme to master mix 1",
                vec![transfer(
                    Pipette::P20,
                    LYSOZYME,
                    MASTER_MIX_1,
                    per_sample(3.0),
                    None,
                )],
            ),
        ),
        (
            2,
            ProtocolStep::new(
                "Add proteinase K to master mix 1",
                vec![transfer(
                    Pipette::P20,
                    PROTEINASE_K,
                    MASTER_MIX_1,
                    per_sample(1.0),
                    None,
                )],
            ),
        ),
        (
            3,
            ProtocolStep::new(
                "Add SDS to master mix 1",
                vec![transfer(
                    Pipette::P20,
                    SDS,
                    MASTER_MIX_1,
                    per_sample(3.0),
                    mix(3, 20.0),
                )],
            ),
        ),
        (
            4,
            ProtocolStep::new(
                "Add master mix 1 to samples",
                vec![to_samples(Pipette::P20, MASTER_MIX_1, 7.0, mix(10, 20.0))],
            ),
        ),
        (
            5,
            ProtocolStep::new(
                "Incubate with master mix 1",
                vec![Op::Incubate(Delay::WindowLessHandling {
                    window_min: 20.0,
                    prep_min: 2.0,
                })],
            ),
        ),
        (
            6,
            ProtocolStep::new(
                "Add DNase I to master mix 2",
                vec![transfer(
                    Pipette::P20,
                    DNASE_I,
                    MASTER_MIX_2,
                    mm2_volume(5.0),
                    None,
                )],
            ),
        ),
        (
            7,
            ProtocolStep::new(
                "Add RDD buffer to master mix 2",
                vec![transfer(
                    Pipette::P1000,
                    rdd_source,
                    MASTER_MIX_2,
                    mm2_volume(20.0),
                    mix(5, 25.0),
                )],
            ),
        ),
        (
            8,
            ProtocolStep::new(
                "Add master mix 2 to samples",
                vec![to_samples(Pipette::P1000, MASTER_MIX_2, 25.0, mix(2, 25.0))],
            ),
        ),
        (
            9,
            ProtocolStep::new(
                "Add RLT buffer to samples",
                vec![to_samples(Pipette::P1000, RLT, 700.0, mix(5, 800.0))],
            ),
        ),
        (
            10,
            ProtocolStep::new(
                "Add ethanol to samples",
                vec![to_samples(Pipette::P1000, ETHANOL, 500.0, mix(5, 800.0))],
            ),
        ),
    ]
}

/// The bench protocol: samples stay on the tube rack, no module.
pub fn standard() -> Protocol {
    let steps = core_steps(1, RDD_RESERVOIR)
        .into_iter()
        .map(|(_, s)| s)
        .collect();

    Protocol {
        name: "rna-purification",
        deck: vec![
            DeckSlot {
                id: LabwareId::Reservoir,
                kind: RESERVOIR_KIND,
                slot: 10,
            },
            DeckSlot {
                id: LabwareId::SampleRack,
                kind: SAMPLE_RACK_KIND,
                slot: 11,
            },
            DeckSlot {
                id: LabwareId::ReagentBlock,
                kind: ALUMINUM_BLOCK_KIND,
                slot: 9,
            },
            DeckSlot {
                id: LabwareId::TipRack20,
                kind: TIPS_20_KIND,
                slot: 2,
            },
            DeckSlot {
                id: LabwareId::TipRack1000,
                kind: TIPS_1000_KIND,
                slot: 1,
            },
        ],
        module: None,
        samples: LabwareId::SampleRack,
        steps,
    }
}

/// The temperature-module variant: samples sit on the module's block,
/// master mix 1 budgets an extra spare share, RDD buffer comes from the
/// reagent block, and a second 10-minute incubation follows master mix 2.
/// The 1000 µl tips take slot 1 so the large pipette is the one used for
/// deck calibration.
pub fn temperature() -> Protocol {
    let mut steps: Vec<ProtocolStep> = Vec::new();

    steps.push(ProtocolStep::new(
        "Equilibrate module at 22 °C",
        vec![Op::SetTemperature(22.0)],
    ));

    for (index, step) in core_steps(2, RDD_BLOCK) {
        // Warm before master mix 1 goes onto the samples, cool once the
        // first incubation has run its course.
        if index == 4 {
            steps.push(ProtocolStep::new(
                "Warm module to 37 °C",
                vec![Op::SetTemperature(37.0)],
            ));
        }
        if index == 6 {
            steps.push(ProtocolStep::new(
                "Cool module to 22 °C",
                vec![Op::SetTemperature(22.0)],
            ));
        }
        steps.push(step);
        if index == 8 {
            steps.push(ProtocolStep::new(
                "Incubate with master mix 2",
                vec![Op::Incubate(Delay::Fixed(10.0))],
            ));
        }
    }

    Protocol {
        name: "rna-purification-temp",
        deck: vec![
            DeckSlot {
                id: LabwareId::Reservoir,
                kind: RESERVOIR_KIND,
                slot: 10,
            },
            DeckSlot {
                id: LabwareId::SampleRack,
                kind: SAMPLE_RACK_KIND,
                slot: 11,
            },
            DeckSlot {
                id: LabwareId::ReagentBlock,
                kind: ALUMINUM_BLOCK_KIND,
                slot: 9,
            },
            DeckSlot {
                id: LabwareId::TipRack20,
                kind: TIPS_20_KIND,
                slot: 1,
            },
            DeckSlot {
                id: LabwareId::TipRack1000,
                kind: TIPS_1000_KIND,
                slot: 2,
            },
            DeckSlot {
                id: LabwareId::TempBlock,
                kind: ALUMINUM_BLOCK_KIND,
                slot: 4,
            },
        ],
        module: Some(ModuleSlot {
            kind: TEMP_MODULE_KIND,
            slot: 4,
        }),
        samples: LabwareId::TempBlock,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_points(protocol: &Protocol) -> Vec<f64> {
        protocol
            .steps
            .iter()
            .flat_map(|s| &s.ops)
            .filter_map(|op| match op {
                Op::SetTemperature(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    fn step<'a>(protocol: &'a Protocol, name: &str) -> &'a ProtocolStep {
        protocol
            .steps
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("no step named '{name}'"))
    }

    #[test]
    fn standard_has_eleven_steps_and_no_set_points() {
        let p = standard();
        assert_eq!(p.steps.len(), 11);
        assert!(set_points(&p).is_empty());
        assert!(p.module.is_none());
        assert_eq!(p.samples, LabwareId::SampleRack);
    }

    #[test]
    fn temperature_variant_has_fifteen_steps() {
        let p = temperature();
        assert_eq!(p.steps.len(), 15);
        assert!(p.module.is_some());
        assert_eq!(p.samples, LabwareId::TempBlock);
    }

    #[test]
    fn temperature_set_points_run_22_37_22() {
        assert_eq!(set_points(&temperature()), vec![22.0, 37.0, 22.0]);
    }

    #[test]
    fn warm_up_precedes_master_mix_1_distribution() {
        let p = temperature();
        let warm = p
            .steps
            .iter()
            .position(|s| s.name.starts_with("Warm module"))
            .unwrap();
        let mm1 = p
            .steps
            .iter()
            .position(|s| s.name == "Add master mix 1 to samples")
            .unwrap();
        let cool = p
            .steps
            .iter()
            .position(|s| s.name.starts_with("Cool module"))
            .unwrap();
        let incubate = p
            .steps
            .iter()
            .position(|s| s.name == "Incubate with master mix 1")
            .unwrap();
        assert!(warm < mm1);
        assert!(incubate < cool);
    }

    #[test]
    fn master_mix_2_is_drawn_from_the_reagent_block() {
        // The original bench script carried a flagged addressing mistake
        // here; the corrected source is pinned so it cannot return.
        for p in [standard(), temperature()] {
            let s = step(&p, "Add master mix 2 to samples");
            match &s.ops[0] {
                Op::TransferToSamples(spec) => {
                    assert_eq!(spec.source.labware, LabwareId::ReagentBlock);
                    assert_eq!(spec.source.well.to_string(), "D5");
                }
                other => panic!("unexpected op {other:?}"),
            }
        }
    }

    #[test]
    fn master_mix_1_spares_differ_between_variants() {
        let spare = |p: &Protocol| match &step(p, "Add lysozyme to master mix 1").ops[0] {
            Op::Transfer(spec) => match spec.volume {
                Volume::PerSample { spare_shares, .. } => spare_shares,
                other => panic!("unexpected volume {other:?}"),
            },
            other => panic!("unexpected op {other:?}"),
        };
        assert_eq!(spare(&standard()), 1);
        assert_eq!(spare(&temperature()), 2);
    }

    #[test]
    fn rdd_buffer_source_differs_between_variants() {
        let source = |p: &Protocol| match &step(p, "Add RDD buffer to master mix 2").ops[0] {
            Op::Transfer(spec) => spec.source,
            other => panic!("unexpected op {other:?}"),
        };
        assert_eq!(source(&standard()).labware, LabwareId::Reservoir);
        assert_eq!(source(&temperature()).labware, LabwareId::ReagentBlock);
        assert_eq!(source(&temperature()).well.to_string(), "A6");
    }

    #[test]
    fn tip_rack_slots_swap_in_the_temperature_variant() {
        let slot = |p: &Protocol, id: LabwareId| {
            p.deck.iter().find(|d| d.id == id).map(|d| d.slot).unwrap()
        };
        assert_eq!(slot(&standard(), LabwareId::TipRack20), 2);
        assert_eq!(slot(&standard(), LabwareId::TipRack1000), 1);
        assert_eq!(slot(&temperature(), LabwareId::TipRack20), 1);
        assert_eq!(slot(&temperature(), LabwareId::TipRack1000), 2);
    }

    #[test]
    fn second_incubation_only_in_temperature_variant() {
        assert!(
            standard()
                .steps
                .iter()
                .all(|s| s.name != "Incubate with master mix 2")
        );
        let protocol = temperature();
        let s = step(&protocol, "Incubate with master mix 2");
        assert_eq!(s.ops, vec![Op::Incubate(Delay::Fixed(10.0))]);
    }

    #[test]
    fn variant_lookup_by_name() {
        assert_eq!(Variant::by_name("standard"), Some(Variant::Standard));
        assert_eq!(Variant::by_name("temperature"), Some(Variant::Temperature));
        assert_eq!(Variant::by_name("overnight"), None);
    }
}
