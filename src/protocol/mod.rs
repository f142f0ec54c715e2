pub mod rna;
pub mod step;

pub use rna::Variant;
pub use step::{
    DeckSlot, Delay, LabwareId, Location, Mix, ModuleSlot, Op, Protocol, ProtocolStep,
    SampleTransferSpec, TransferSpec, Volume,
};
