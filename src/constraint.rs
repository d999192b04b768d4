use crate::dvh::Dvh;
use crate::enums::ConstraintMode;

/// Prescription (reference) dose for the loaded plan, in cGy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plan {
    pub rx_dose: f64,
}

/// A structure's DVH together with the externally supplied scalars needed
/// for constraint evaluation.
///
/// `volume_cc` is the structure's true physical volume; the histogram's own
/// volume scale may differ, so every absolute-volume conversion goes through
/// this one value.
pub struct StructureDvh {
    pub dvh: Dvh,
    /// True physical structure volume in cc.
    pub volume_cc: f64,
    /// Highest dose recorded for the structure, in percent of the rx dose.
    pub max_relative_dose: f64,
}

/// Derived values for one constraint evaluation, ready for display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintResult {
    /// Absolute dose of the constraint, cGy.
    pub dose: f64,
    /// Volume at the constraint, percent of structure volume.
    pub volume_percent: f64,
    /// Volume at the constraint, cc.
    pub volume_cc: f64,
    /// Dose as a percentage of the prescription dose.
    pub relative_dose: f64,
    /// (dose, volume-percent) pair for overlay on the DVH plot.
    pub marker: (f64, f64),
}

impl ConstraintMode {
    /// Upper bound for the constraint slider in this mode.
    ///
    /// `Volume` mode counts in percent of the prescription dose; the bound is
    /// the recorded bin range expressed relative to the rx dose, capped at
    /// the highest dose actually reached so the slider cannot select doses
    /// with no data. `Dose` counts in volume percent, `DoseCc` in cc.
    pub fn slider_range(self, structure: &StructureDvh, plan: &Plan) -> f64 {
        match self {
            ConstraintMode::Volume => {
                if plan.rx_dose <= 0.0 {
                    return 0.0;
                }
                let bins = (structure.dvh.max_dose() + 1) as f64;
                (bins * 100.0 / plan.rx_dose).min(structure.max_relative_dose)
            }
            ConstraintMode::Dose => 100.0,
            ConstraintMode::DoseCc => structure.volume_cc,
        }
    }
}

/// Evaluate the constraint at `value` (the current slider position, in the
/// unit of `mode`) against one structure's DVH.
///
/// Degenerate inputs (zero rx dose, zero structure volume) yield zeros in the
/// affected fields rather than an error, matching the interactive use where
/// the result feeds a label on every slider tick.
pub fn evaluate(
    structure: &StructureDvh,
    mode: ConstraintMode,
    value: f64,
    plan: &Plan,
) -> ConstraintResult {
    let dvh = &structure.dvh;
    match mode {
        ConstraintMode::Volume => {
            let dose = plan.rx_dose * value / 100.0;
            let volume_percent = dvh.volume_constraint(dose);
            ConstraintResult {
                dose,
                volume_percent,
                volume_cc: dvh.volume_constraint_cc(dose, structure.volume_cc),
                relative_dose: relative_dose(dose, plan),
                marker: (dose, volume_percent),
            }
        }
        ConstraintMode::Dose => {
            let dose = dvh.dose_constraint(value);
            ConstraintResult {
                dose,
                volume_percent: value,
                volume_cc: value * structure.volume_cc / 100.0,
                relative_dose: relative_dose(dose, plan),
                marker: (dose, value),
            }
        }
        ConstraintMode::DoseCc => {
            // A zero-volume structure covers no absolute volume at any dose;
            // degrade to all-zero labels instead of inverting a 0% target.
            if structure.volume_cc <= 0.0 {
                return ConstraintResult {
                    dose: 0.0,
                    volume_percent: 0.0,
                    volume_cc: 0.0,
                    relative_dose: 0.0,
                    marker: (0.0, 0.0),
                };
            }
            let volume_percent = value * 100.0 / structure.volume_cc;
            let dose = dvh.dose_constraint(volume_percent);
            ConstraintResult {
                dose,
                volume_percent,
                volume_cc: value,
                relative_dose: relative_dose(dose, plan),
                marker: (dose, volume_percent),
            }
        }
    }
}

fn relative_dose(dose: f64, plan: &Plan) -> f64 {
    if plan.rx_dose <= 0.0 {
        0.0
    } else {
        dose * 100.0 / plan.rx_dose
    }
}

#[cfg(test)]
mod test_evaluate {
    use super::*;
    use float_eq::assert_float_eq;

    fn sample() -> StructureDvh {
        StructureDvh {
            dvh: Dvh::new(vec![10.0, 10.0, 8.0, 4.0, 0.0]).unwrap(),
            volume_cc: 20.0,
            max_relative_dose: 110.0,
        }
    }

    // Toy plan whose rx dose sits inside the 5-bin histogram.
    fn plan() -> Plan {
        Plan { rx_dose: 4.0 }
    }

    #[test]
    fn volume_mode() {
        let result = evaluate(&sample(), ConstraintMode::Volume, 62.5, &plan());
        assert_float_eq!(result.dose, 2.5, abs <= 1e-12);
        assert_float_eq!(result.volume_percent, 60.0, abs <= 1e-12);
        assert_float_eq!(result.volume_cc, 12.0, abs <= 1e-12);
        assert_float_eq!(result.relative_dose, 62.5, abs <= 1e-12);
        assert_eq!(result.marker, (2.5, 60.0));
    }

    #[test]
    fn dose_mode() {
        let result = evaluate(&sample(), ConstraintMode::Dose, 60.0, &plan());
        assert_float_eq!(result.dose, 2.5, abs <= 1e-12);
        assert_float_eq!(result.relative_dose, 62.5, abs <= 1e-12);
        assert_float_eq!(result.volume_cc, 12.0, abs <= 1e-12);
        assert_eq!(result.marker, (2.5, 60.0));
    }

    #[test]
    fn dose_cc_mode() {
        let result = evaluate(&sample(), ConstraintMode::DoseCc, 12.0, &plan());
        assert_float_eq!(result.volume_percent, 60.0, abs <= 1e-12);
        assert_float_eq!(result.dose, 2.5, abs <= 1e-12);
        assert_eq!(result.volume_cc, 12.0);
        assert_eq!(result.marker, (2.5, 60.0));
    }

    #[test]
    fn modes_agree_on_the_same_constraint() {
        let structure = sample();
        let plan = plan();
        let by_dose = evaluate(&structure, ConstraintMode::Dose, 60.0, &plan);
        let by_cc = evaluate(&structure, ConstraintMode::DoseCc, 12.0, &plan);
        assert_float_eq!(by_dose.dose, by_cc.dose, abs <= 1e-12);
        assert_float_eq!(by_dose.volume_percent, by_cc.volume_percent, abs <= 1e-12);
    }

    #[test]
    fn zero_rx_dose_degrades_to_zero() {
        let plan = Plan { rx_dose: 0.0 };
        let result = evaluate(&sample(), ConstraintMode::Dose, 60.0, &plan);
        assert_eq!(result.relative_dose, 0.0);
        let result = evaluate(&sample(), ConstraintMode::Volume, 50.0, &plan);
        assert_eq!(result.dose, 0.0);
        assert_eq!(result.volume_percent, 100.0);
    }

    #[test]
    fn zero_structure_volume_degrades_to_zero() {
        let structure = StructureDvh {
            volume_cc: 0.0,
            ..sample()
        };
        let result = evaluate(&structure, ConstraintMode::DoseCc, 5.0, &plan());
        assert_eq!(result.dose, 0.0);
        assert_eq!(result.volume_percent, 0.0);
        assert_eq!(result.volume_cc, 0.0);
        assert_eq!(result.relative_dose, 0.0);
        assert_eq!(result.marker, (0.0, 0.0));
    }
}
