//! Patient document queries over a migrated SQLite connection.

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{Patient, StoredPatient};

/// Read every stored patient document in saved order.
pub fn load_patient_documents(conn: &Connection) -> Result<Vec<StoredPatient>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT document FROM patients ORDER BY position")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut patients = Vec::new();
    for row in rows {
        let document = row?;
        patients.push(serde_json::from_str::<StoredPatient>(&document)?);
    }
    Ok(patients)
}

/// Erase the collection, then insert `patients` in order.
///
/// Runs inside one transaction, so a failed insert leaves the previous
/// collection in place.
pub fn replace_patient_documents(
    conn: &mut Connection,
    patients: &[Patient],
) -> Result<usize, DatabaseError> {
    let tx = conn.transaction()?;
    let removed = tx.execute("DELETE FROM patients", [])?;
    tracing::debug!(removed, "Cleared patient collection");

    if !patients.is_empty() {
        let mut stmt =
            tx.prepare("INSERT INTO patients (position, patient_id, document) VALUES (?1, ?2, ?3)")?;
        for (position, patient) in patients.iter().enumerate() {
            let document = serde_json::to_string(patient)?;
            stmt.execute(params![position as i64, patient.id, document])?;
        }
    }

    tx.commit()?;
    Ok(patients.len())
}
