//! Field and group arithmetic for the SM9 BN curve.
//!
//! The base field and tower levels keep their values in Montgomery form and
//! strongly reduced; the group types hold Jacobian coordinates over the
//! matching field.

pub(crate) mod curve;
pub(crate) mod field;
pub(crate) mod fp12;
pub(crate) mod fp2;
pub(crate) mod fp6;
pub(crate) mod twist;
