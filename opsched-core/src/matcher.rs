//! Duplicate detection against existing patient records.

use crate::normalize::{normalize_name, normalize_phone};
use crate::row::ImportRow;
use crate::store::ExistingPatient;

/// Whether a candidate row already exists among the given records.
///
/// A record matches when its surgery date equals the row's exactly (a
/// record without a date never matches) and the normalized names agree.
/// Phone is asymmetric on purpose: feeds frequently omit it, so an absent
/// row phone is non-discriminating, while a present one must also match.
/// Richer feed data must not be mistaken for a same-day namesake with
/// different contact info.
///
/// Only existence matters; which record matched does not.
pub fn is_duplicate(row: &ImportRow, existing: &[ExistingPatient]) -> bool {
    let name = normalize_name(&row.full_name);

    existing.iter().any(|patient| {
        if patient.surgery_date.as_deref() != Some(row.surgery_date.as_str()) {
            return false;
        }
        if normalize_name(&patient.full_name) != name {
            return false;
        }
        match &row.phone {
            None => true,
            Some(phone) => normalize_phone(&patient.phone).as_deref() == Some(phone.as_str()),
        }
    })
}
