//! The hospital's patient roster and the dose-administration entry point.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vaccination_management_database::models::Hospital;
use vaccination_management_database::schema::{hospital, person, vaccinates};
use vaccination_management_database::Pool;

use crate::error::AppError;
use crate::ledger::{decide, DoseDecision, DoseStatus, RosterFilter};
use crate::session::{resolve_hospital, HospitalSession};
use crate::templating::{login_prompt, render};

#[derive(Serialize)]
struct RosterEntry {
    patient_id: i32,
    name: String,
    email: String,
    contact_no: String,
    gender: String,
    date_of_birth: NaiveDate,
    first_dose: Option<NaiveDate>,
    second_dose: Option<NaiveDate>,
}

#[derive(Serialize)]
struct RosterPage {
    hospital: Hospital,
    patients: Vec<RosterEntry>,
    message: &'static str,
}

type RosterRow = (
    i32,
    String,
    String,
    String,
    String,
    NaiveDate,
    Option<NaiveDate>,
    Option<NaiveDate>,
);

async fn load_roster(
    connection: &mut AsyncPgConnection,
    hospital_id: i32,
    filter: RosterFilter,
) -> Result<Vec<RosterEntry>, AppError> {
    let rows: Vec<RosterRow> = vaccinates::table
        .inner_join(person::table)
        .filter(vaccinates::hospital_id.eq(hospital_id))
        .select((
            person::id,
            person::name,
            person::email,
            person::contact_no,
            person::gender,
            person::date_of_birth,
            vaccinates::first_dose,
            vaccinates::second_dose,
        ))
        .load(connection)
        .await?;
    Ok(rows
        .into_iter()
        .filter(|row| filter.matches(DoseStatus::classify(row.6, row.7)))
        .map(
            |(patient_id, name, email, contact_no, gender, date_of_birth, first_dose, second_dose)| {
                RosterEntry {
                    patient_id,
                    name,
                    email,
                    contact_no,
                    gender,
                    date_of_birth,
                    first_dose,
                    second_dose,
                }
            },
        )
        .collect())
}

async fn roster_page(
    session: &HospitalSession,
    pool: &Pool,
    filter: RosterFilter,
) -> Result<Response, AppError> {
    let Some(hospital_id) = session.hospital_id() else {
        return Ok(login_prompt("").into_response());
    };
    let mut connection = pool.get().await?;
    let Some(hospital) = resolve_hospital(&mut connection, hospital_id).await? else {
        return Ok(login_prompt("").into_response());
    };
    let patients = load_roster(&mut connection, hospital_id, filter).await?;
    Ok(render(
        "hosp_logindata",
        &RosterPage {
            hospital,
            patients,
            message: filter.message(),
        },
    )
    .into_response())
}

pub async fn roster_all(
    session: HospitalSession,
    State(pool): State<Pool>,
) -> Result<Response, AppError> {
    roster_page(&session, &pool, RosterFilter::All).await
}

pub async fn roster_one_dose(
    session: HospitalSession,
    State(pool): State<Pool>,
) -> Result<Response, AppError> {
    roster_page(&session, &pool, RosterFilter::OneDose).await
}

pub async fn roster_no_dose(
    session: HospitalSession,
    State(pool): State<Pool>,
) -> Result<Response, AppError> {
    roster_page(&session, &pool, RosterFilter::NoDose).await
}

pub async fn roster_both_doses(
    session: HospitalSession,
    State(pool): State<Pool>,
) -> Result<Response, AppError> {
    roster_page(&session, &pool, RosterFilter::BothDoses).await
}

#[derive(Deserialize)]
pub struct AdministerDoses {
    patient_id: i32,
    #[serde(default)]
    first_dose: String,
    #[serde(default)]
    second_dose: String,
}

#[derive(Clone, Copy)]
enum AdministerOutcome {
    Administered,
    MissingAssignment,
    Rejected,
}

/// Applies the submitted dose dates to the patient's assignment, gated on
/// the hospital's remaining stock.
///
/// The gate and the update run in one transaction with the hospital row
/// locked, so two concurrent submissions cannot both pass a last-dose check.
/// Only the submitted fields are written; a recorded dose date is never
/// cleared again.
pub async fn administer_doses(
    session: HospitalSession,
    State(pool): State<Pool>,
    Form(form): Form<AdministerDoses>,
) -> Result<Response, AppError> {
    let Some(hospital_id) = session.hospital_id() else {
        return Ok(login_prompt("").into_response());
    };
    let mut connection = pool.get().await?;
    let patient_id = form.patient_id;
    let outcome = connection
        .transaction::<_, AppError, _>(|connection| {
            async move {
                let remaining_quantity: i32 = hospital::table
                    .find(hospital_id)
                    .select(hospital::remaining_quantity)
                    .for_update()
                    .first(connection)
                    .await?;
                match decide(remaining_quantity, &form.first_dose, &form.second_dose) {
                    DoseDecision::Administer { first, second } => {
                        let assignment = vaccinates::table
                            .filter(vaccinates::hospital_id.eq(hospital_id))
                            .filter(vaccinates::patient_id.eq(form.patient_id));
                        let updated = match second {
                            Some(second) => {
                                diesel::update(assignment)
                                    .set((
                                        vaccinates::first_dose.eq(first),
                                        vaccinates::second_dose.eq(second),
                                    ))
                                    .execute(connection)
                                    .await?
                            }
                            None => {
                                diesel::update(assignment)
                                    .set(vaccinates::first_dose.eq(first))
                                    .execute(connection)
                                    .await?
                            }
                        };
                        Ok(if updated == 0 {
                            AdministerOutcome::MissingAssignment
                        } else {
                            AdministerOutcome::Administered
                        })
                    }
                    DoseDecision::Reject => Ok(AdministerOutcome::Rejected),
                }
            }
            .scope_boxed()
        })
        .await?;

    match outcome {
        AdministerOutcome::Administered => {
            info!(hospital_id, patient_id, "administered doses");
            Ok(Redirect::to("/hosp_logindata").into_response())
        }
        AdministerOutcome::MissingAssignment | AdministerOutcome::Rejected => {
            if matches!(outcome, AdministerOutcome::MissingAssignment) {
                warn!(hospital_id, patient_id, "no assignment matched the dose update");
            }
            let Some(hospital) = resolve_hospital(&mut connection, hospital_id).await? else {
                return Ok(login_prompt("").into_response());
            };
            let patients = load_roster(&mut connection, hospital_id, RosterFilter::All).await?;
            Ok(render(
                "hosp_logindata",
                &RosterPage {
                    hospital,
                    patients,
                    message: RosterFilter::All.message(),
                },
            )
            .into_response())
        }
    }
}
