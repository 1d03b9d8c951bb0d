//! Patient record backfill.
//!
//! Stored documents may predate fields the UI now relies on. Every read
//! passes through `normalize_patient`, which fills the gaps with fixed
//! demo defaults. The defaults live only in the returned copies; storage
//! keeps the sparse document until the next explicit save.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{
    BillPayment, Disease, DiseaseStatus, Patient, PaymentStatus, StoredBillPayment, StoredPatient,
    Tablet,
};

/// Normalize a batch of stored documents against the current clock.
pub fn normalize_patients(stored: Vec<StoredPatient>) -> Vec<Patient> {
    let now = Utc::now();
    stored
        .into_iter()
        .map(|raw| normalize_patient(raw, now))
        .collect()
}

/// Fill every optional field of a stored document.
///
/// `now` stands in for a missing `lastVisit`. Running the result back
/// through this function yields the same patient.
pub fn normalize_patient(raw: StoredPatient, now: DateTime<Utc>) -> Patient {
    let diseases = raw
        .diseases
        .filter(|d| !d.is_empty())
        .unwrap_or_else(default_diseases);

    let bill_payments =
        complete_bills(raw.bill_payments, now).unwrap_or_else(default_bill_payments);

    Patient {
        id: raw.id,
        password: raw.password,
        first_name: raw.first_name,
        diseases,
        bill_payments,
        last_visit: raw.last_visit.unwrap_or(now),
        allergies: raw.allergies.unwrap_or_default(),
        previous_treatments: raw.previous_treatments.unwrap_or_default(),
        notes: raw.notes.unwrap_or_default(),
        extra: raw.extra,
    }
}

/// Typed bills, or `None` when the list is absent, empty, or any entry
/// predates the `disease`/`paymentMethod` fields. That case swaps in the
/// whole default list; it is never patched entry by entry.
fn complete_bills(
    bills: Option<Vec<StoredBillPayment>>,
    now: DateTime<Utc>,
) -> Option<Vec<BillPayment>> {
    let bills = bills.filter(|b| !b.is_empty())?;
    bills.into_iter().map(|bill| bill.complete(now)).collect()
}

pub fn default_diseases() -> Vec<Disease> {
    vec![
        Disease {
            name: "Common Cold".into(),
            status: DiseaseStatus::Cured,
        },
        Disease {
            name: "Asthma".into(),
            status: DiseaseStatus::Ongoing,
        },
    ]
}

pub fn default_bill_payments() -> Vec<BillPayment> {
    vec![
        BillPayment {
            date: day(2023, 11, 15),
            amount: 1500.0,
            status: PaymentStatus::Paid,
            disease: "Viral Fever".into(),
            tablets: vec![
                tablet("Paracetamol", "1 tablet twice a day"),
                tablet("Azithromycin", "1 tablet once a day"),
            ],
            payment_method: "UPI".into(),
        },
        BillPayment {
            date: day(2024, 1, 20),
            amount: 250.0,
            status: PaymentStatus::Paid,
            disease: "Follow-up Consultation".into(),
            tablets: vec![],
            payment_method: "Cash".into(),
        },
        BillPayment {
            date: day(2024, 3, 5),
            amount: 800.0,
            status: PaymentStatus::Paid,
            disease: "Allergic Rhinitis".into(),
            tablets: vec![tablet("Cetirizine", "1 tablet at night")],
            payment_method: "Debit Card".into(),
        },
        BillPayment {
            date: day(2024, 5, 1),
            amount: 1200.0,
            status: PaymentStatus::Pending,
            disease: "Sinusitis".into(),
            tablets: vec![
                tablet("Amoxicillin", "1 tablet three times a day"),
                tablet("Ibuprofen", "As needed for pain"),
            ],
            payment_method: "Insurance Claim".into(),
        },
    ]
}

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn tablet(name: &str, usage: &str) -> Tablet {
    Tablet {
        name: name.into(),
        usage: usage.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
    }

    fn bare(id: &str) -> StoredPatient {
        StoredPatient {
            id: id.into(),
            password: "pw".into(),
            first_name: "Ravi".into(),
            ..Default::default()
        }
    }

    fn full_bill(disease: &str) -> StoredBillPayment {
        StoredBillPayment {
            date: Some(day(2024, 8, 2)),
            amount: Some(300.0),
            status: Some(PaymentStatus::Paid),
            disease: Some(disease.into()),
            tablets: Some(vec![tablet("Montelukast", "1 tablet at night")]),
            payment_method: Some("Cash".into()),
        }
    }

    #[test]
    fn missing_diseases_get_two_defaults() {
        let patient = normalize_patient(bare("PAT1"), now());
        assert_eq!(patient.diseases.len(), 2);
        assert_eq!(patient.diseases, default_diseases());
        assert_eq!(patient.diseases[0].name, "Common Cold");
        assert_eq!(patient.diseases[1].status, DiseaseStatus::Ongoing);
    }

    #[test]
    fn empty_diseases_get_defaults() {
        let mut raw = bare("PAT1");
        raw.diseases = Some(vec![]);
        let patient = normalize_patient(raw, now());
        assert_eq!(patient.diseases, default_diseases());
    }

    #[test]
    fn existing_disease_kept_unchanged() {
        let mut raw = bare("PAT1");
        let migraine = Disease {
            name: "Migraine".into(),
            status: DiseaseStatus::Ongoing,
        };
        raw.diseases = Some(vec![migraine.clone()]);
        let patient = normalize_patient(raw, now());
        assert_eq!(patient.diseases, vec![migraine]);
    }

    #[test]
    fn missing_bills_get_four_defaults() {
        let patient = normalize_patient(bare("PAT1"), now());
        assert_eq!(patient.bill_payments.len(), 4);
        assert_eq!(patient.bill_payments, default_bill_payments());
        assert_eq!(patient.bill_payments[0].payment_method, "UPI");
        assert_eq!(patient.bill_payments[3].status, PaymentStatus::Pending);
    }

    #[test]
    fn first_bill_missing_disease_replaces_whole_list() {
        let mut raw = bare("PAT1");
        let mut legacy = full_bill("ignored");
        legacy.disease = None;
        raw.bill_payments = Some(vec![legacy, full_bill("Asthma review")]);
        let patient = normalize_patient(raw, now());
        assert_eq!(patient.bill_payments, default_bill_payments());
    }

    #[test]
    fn first_bill_missing_payment_method_replaces_whole_list() {
        let mut raw = bare("PAT1");
        let mut legacy = full_bill("Checkup");
        legacy.payment_method = None;
        raw.bill_payments = Some(vec![legacy]);
        let patient = normalize_patient(raw, now());
        assert_eq!(patient.bill_payments, default_bill_payments());
    }

    #[test]
    fn later_incomplete_bill_also_replaces_whole_list() {
        let mut raw = bare("PAT1");
        let mut legacy = full_bill("Checkup");
        legacy.payment_method = None;
        raw.bill_payments = Some(vec![full_bill("Asthma review"), legacy]);
        let patient = normalize_patient(raw, now());
        assert_eq!(patient.bill_payments.len(), 4);
    }

    #[test]
    fn complete_bills_kept() {
        let mut raw = bare("PAT1");
        raw.bill_payments = Some(vec![full_bill("Asthma review")]);
        let patient = normalize_patient(raw, now());
        assert_eq!(patient.bill_payments.len(), 1);
        assert_eq!(patient.bill_payments[0].disease, "Asthma review");
        assert_eq!(patient.bill_payments[0].tablets[0].name, "Montelukast");
    }

    #[test]
    fn bill_missing_amount_keeps_real_history() {
        let mut raw = bare("PAT1");
        let mut partial = full_bill("Asthma review");
        partial.amount = None;
        partial.status = None;
        partial.date = None;
        raw.bill_payments = Some(vec![partial, full_bill("Checkup")]);

        let patient = normalize_patient(raw, now());
        assert_eq!(patient.bill_payments.len(), 2);
        assert_eq!(patient.bill_payments[0].disease, "Asthma review");
        assert_eq!(patient.bill_payments[0].amount, 0.0);
        assert_eq!(patient.bill_payments[0].status, PaymentStatus::Pending);
        assert_eq!(patient.bill_payments[0].date, now());
        assert_eq!(patient.bill_payments[1].disease, "Checkup");
    }

    #[test]
    fn unknown_disease_status_kept() {
        let mut raw = bare("PAT1");
        raw.diseases = Some(vec![Disease {
            name: "Diabetes".into(),
            status: DiseaseStatus::Other("Chronic".into()),
        }]);
        let patient = normalize_patient(raw, now());
        assert_eq!(patient.diseases[0].status.as_str(), "Chronic");
    }

    #[test]
    fn scalar_fields_defaulted() {
        let patient = normalize_patient(bare("PAT1"), now());
        assert_eq!(patient.last_visit, now());
        assert!(patient.allergies.is_empty());
        assert!(patient.previous_treatments.is_empty());
        assert_eq!(patient.notes, "");
    }

    #[test]
    fn present_fields_preserved() {
        let mut raw = bare("PAT1");
        let visit = day(2024, 12, 24);
        raw.last_visit = Some(visit);
        raw.allergies = Some(vec!["Penicillin".into()]);
        raw.notes = Some("Prefers morning appointments".into());
        let patient = normalize_patient(raw, now());
        assert_eq!(patient.last_visit, visit);
        assert_eq!(patient.allergies, vec!["Penicillin".to_string()]);
        assert_eq!(patient.notes, "Prefers morning appointments");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_patient(bare("PAT1"), now());
        let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let twice = normalize_patient(StoredPatient::from(once.clone()), later);
        assert_eq!(once, twice);
    }

    #[test]
    fn extra_document_fields_survive() {
        let raw: StoredPatient = serde_json::from_value(json!({
            "id": "PAT9",
            "password": "pw",
            "firstName": "Meera",
            "email": "meera@example.com"
        }))
        .unwrap();
        let patient = normalize_patient(raw, now());
        assert_eq!(patient.extra["email"], "meera@example.com");
    }

    #[test]
    fn default_bill_dates_are_fixed() {
        let bills = default_bill_payments();
        assert_eq!(bills[0].date.to_rfc3339(), "2023-11-15T00:00:00+00:00");
        assert_eq!(bills[1].date.to_rfc3339(), "2024-01-20T00:00:00+00:00");
        assert_eq!(bills[2].date.to_rfc3339(), "2024-03-05T00:00:00+00:00");
        assert_eq!(bills[3].date.to_rfc3339(), "2024-05-01T00:00:00+00:00");
    }

    #[test]
    fn batch_normalizes_each_record() {
        let patients = normalize_patients(vec![bare("PAT1"), bare("PAT2")]);
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[1].id, "PAT2");
        assert!(patients.iter().all(|p| p.bill_payments.len() == 4));
    }
}
