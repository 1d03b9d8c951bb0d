use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::{DiseaseStatus, PaymentStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub name: String,
    pub status: DiseaseStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tablet {
    pub name: String,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPayment {
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub status: PaymentStatus,
    pub disease: String,
    #[serde(default)]
    pub tablets: Vec<Tablet>,
    pub payment_method: String,
}

/// A fully populated patient record, as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub password: String,
    pub first_name: String,
    pub diseases: Vec<Disease>,
    pub bill_payments: Vec<BillPayment>,
    pub last_visit: DateTime<Utc>,
    pub allergies: Vec<String>,
    pub previous_treatments: Vec<String>,
    pub notes: String,
    /// Remaining document fields (demographics, contact details) carried
    /// through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A bill entry as it may sit in storage. Older documents predate the
/// `disease` and `paymentMethod` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBillPayment {
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub tablets: Option<Vec<Tablet>>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl StoredBillPayment {
    /// The typed entry, or `None` when `disease` or `paymentMethod` is
    /// missing. Other gaps are filled in place: `now` for the date, zero
    /// amount, `Pending` status, no tablets.
    pub fn complete(self, now: DateTime<Utc>) -> Option<BillPayment> {
        Some(BillPayment {
            disease: self.disease?,
            payment_method: self.payment_method?,
            date: self.date.unwrap_or(now),
            amount: self.amount.unwrap_or_default(),
            status: self.status.unwrap_or(PaymentStatus::Pending),
            tablets: self.tablets.unwrap_or_default(),
        })
    }
}

impl From<BillPayment> for StoredBillPayment {
    fn from(bill: BillPayment) -> Self {
        Self {
            date: Some(bill.date),
            amount: Some(bill.amount),
            status: Some(bill.status),
            disease: Some(bill.disease),
            tablets: Some(bill.tablets),
            payment_method: Some(bill.payment_method),
        }
    }
}

/// A patient document as read from storage, before backfill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPatient {
    pub id: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub diseases: Option<Vec<Disease>>,
    #[serde(default)]
    pub bill_payments: Option<Vec<StoredBillPayment>>,
    #[serde(default)]
    pub last_visit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    #[serde(default)]
    pub previous_treatments: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Patient> for StoredPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            password: patient.password,
            first_name: patient.first_name,
            diseases: Some(patient.diseases),
            bill_payments: Some(
                patient
                    .bill_payments
                    .into_iter()
                    .map(StoredBillPayment::from)
                    .collect(),
            ),
            last_visit: Some(patient.last_visit),
            allergies: Some(patient.allergies),
            previous_treatments: Some(patient.previous_treatments),
            notes: Some(patient.notes),
            extra: patient.extra,
        }
    }
}
