//! Patient registration and hospital selection.
//!
//! Registration is a two-step workflow: the person row is inserted first,
//! then the hospital choice either turns it into an assignment or rolls the
//! registration back. The second step runs in one transaction so a crash
//! cannot leave a patient half-registered.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vaccination_management_database::models::{NewAssignment, NewPerson};
use vaccination_management_database::schema::{hospital, location, person, vaccinates};
use vaccination_management_database::Pool;

use crate::error::AppError;
use crate::templating::render;

const PRIORITY_AGE_YEARS: u32 = 45;

/// Age-based priority for the vaccination queue.
fn is_priority(date_of_birth: NaiveDate, today: NaiveDate) -> bool {
    today
        .years_since(date_of_birth)
        .is_some_and(|age| age >= PRIORITY_AGE_YEARS)
}

#[derive(Serialize)]
struct HospitalOption {
    name: String,
    address: String,
}

#[derive(Serialize)]
struct PatientFormPage {
    pincodes: Vec<String>,
    hospitals: Vec<HospitalOption>,
}

pub async fn patient_form(State(pool): State<Pool>) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;
    let pincodes: Vec<String> = location::table
        .select(location::pincode)
        .load(&mut connection)
        .await?;
    let hospitals: Vec<(String, String)> = hospital::table
        .select((hospital::name, hospital::address))
        .load(&mut connection)
        .await?;

    Ok(render(
        "patient",
        &PatientFormPage {
            pincodes,
            hospitals: hospitals
                .into_iter()
                .map(|(name, address)| HospitalOption { name, address })
                .collect(),
        },
    ))
}

#[derive(Deserialize)]
pub struct RegisterPatient {
    name: String,
    email: String,
    pincode: String,
    date_of_birth: NaiveDate,
    contact_no: String,
    gender: String,
}

pub async fn register_patient(
    State(pool): State<Pool>,
    Form(form): Form<RegisterPatient>,
) -> Result<Redirect, AppError> {
    let mut connection = pool.get().await?;
    let patient_id: i32 = diesel::insert_into(person::table)
        .values(NewPerson {
            name: &form.name,
            email: &form.email,
            address: &form.pincode,
            date_of_birth: form.date_of_birth,
            contact_no: &form.contact_no,
            gender: &form.gender,
        })
        .returning(person::id)
        .get_result(&mut connection)
        .await?;
    info!(patient_id, "registered patient");

    Ok(Redirect::to(&format!(
        "/choose_hosp/{}/{patient_id}",
        form.pincode
    )))
}

#[derive(Serialize)]
struct ChooseHospitalPage {
    patient_id: i32,
    priority: bool,
    hospitals: Vec<HospitalOption>,
}

pub async fn choose_hospital(
    State(pool): State<Pool>,
    Path((pin, patient_id)): Path<(String, i32)>,
) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;
    let date_of_birth: Option<NaiveDate> = person::table
        .find(patient_id)
        .select(person::date_of_birth)
        .first(&mut connection)
        .await
        .optional()?;
    let hospitals: Vec<(String, String)> = hospital::table
        .filter(hospital::address.eq(&pin))
        .select((hospital::name, hospital::address))
        .load(&mut connection)
        .await?;

    Ok(render(
        "choose_hosp",
        &ChooseHospitalPage {
            patient_id,
            priority: date_of_birth
                .is_some_and(|date_of_birth| is_priority(date_of_birth, Utc::now().date_naive())),
            hospitals: hospitals
                .into_iter()
                .map(|(name, address)| HospitalOption { name, address })
                .collect(),
        },
    ))
}

#[derive(Deserialize)]
pub struct AssignHospital {
    hospital_name: String,
}

pub async fn assign_hospital(
    State(pool): State<Pool>,
    Path(patient_id): Path<i32>,
    Form(form): Form<AssignHospital>,
) -> Result<Response, AppError> {
    let mut connection = pool.get().await?;
    let assigned = connection
        .transaction::<_, AppError, _>(|connection| {
            async move {
                let hospital_id: Option<i32> = hospital::table
                    .filter(hospital::name.eq(&form.hospital_name))
                    .select(hospital::id)
                    .first(connection)
                    .await
                    .optional()?;
                let Some(hospital_id) = hospital_id else {
                    // roll the registration back
                    diesel::delete(person::table.find(patient_id))
                        .execute(connection)
                        .await?;
                    info!(patient_id, "no such hospital, dropped registration");
                    return Ok(false);
                };
                diesel::insert_into(vaccinates::table)
                    .values(NewAssignment {
                        patient_id,
                        hospital_id,
                    })
                    .execute(connection)
                    .await?;
                // registration must leave no unassigned patients behind
                let removed = diesel::delete(
                    person::table
                        .filter(person::id.ne_all(vaccinates::table.select(vaccinates::patient_id))),
                )
                .execute(connection)
                .await?;
                debug!(removed, "cleaned up unassigned patients");
                info!(patient_id, hospital_id, "assigned patient to hospital");
                Ok(true)
            }
            .scope_boxed()
        })
        .await?;

    if assigned {
        Ok(Redirect::to("/").into_response())
    } else {
        Err(AppError::HospitalNotFound)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::is_priority;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn forty_five_and_older_get_priority() {
        let today = date("2024-03-01");
        assert!(is_priority(date("1979-03-01"), today));
        assert!(is_priority(date("1950-06-15"), today));
    }

    #[test]
    fn younger_patients_do_not() {
        let today = date("2024-03-01");
        assert!(!is_priority(date("1979-03-02"), today));
        assert!(!is_priority(date("2001-01-01"), today));
    }
}
