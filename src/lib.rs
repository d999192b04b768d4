//! # DVH-data library
//!
//! This crate computes and evaluates dose volume histogram (DVH) constraints
//! for radiotherapy structures
//!
//! A [`Dvh`] wraps one structure's cumulative dose histogram (bin index =
//! dose in cGy, bin value = volume in cc receiving at least that dose) and
//! answers the three interactive constraint queries with sub-bin linear
//! interpolation:
//!  - Volume constraint (V__): percent of the structure receiving at least a
//!    given dose
//!  - Volume constraint in cc: the same, as an absolute volume
//!  - Dose constraint (D__ / D__cc): minimum dose received by at least a
//!    given volume
//!
//! Queries are pure and total: out-of-range arguments are clamped, and
//! degenerate inputs (zero structure volume, zero prescription dose) yield 0
//! rather than an error, so the results can drive a label on every slider
//! tick. The crate owns no I/O; parsing the patient's DICOM data and plotting
//! the curve are the callers' concern.
//!
//! [`cache::DvhCache`] keeps one immutable DVH per structure id so repeated
//! selection events reuse instances, and [`constraint::evaluate`] bundles a
//! query with the unit conversions a constraint panel displays.
//!
//! # Examples
//!
//! ## Evaluating constraints on a structure's histogram
//!
//! ```
//! # use dvh_data::dvh::Dvh;
//! let dvh = Dvh::new(vec![10.0, 10.0, 8.0, 4.0, 0.0])?;
//! // 80% of the structure receives at least 2 cGy
//! assert_eq!(dvh.volume_constraint(2.0), 80.0);
//! // 60% of the structure receives at least 2.5 cGy, and vice versa
//! assert_eq!(dvh.volume_constraint(2.5), 60.0);
//! assert_eq!(dvh.dose_constraint(60.0), 2.5);
//! # Ok::<(), dvh_data::dvh::DvhError>(())
//! ```
//!
//! [`Dvh`]: dvh::Dvh

pub mod cache;
pub mod constraint;
pub mod dvh;
pub mod enums;
