/// The three constraint selector modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConstraintMode {
    /// V__: volume receiving at least a given dose (slider in % of rx dose).
    #[default]
    Volume,
    /// D__: minimum dose received by at least a volume percentage.
    Dose,
    /// D__cc: minimum dose received by at least an absolute volume in cc.
    DoseCc,
}
