//! Hospital signup, login and the post-login overview page.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;
use vaccination_management_database::models::NewHospital;
use vaccination_management_database::schema::{
    hospital, inventory, location, supplies, vaccinates, vaccine,
};
use vaccination_management_database::Pool;

use crate::credentials;
use crate::error::AppError;
use crate::session::{resolve_hospital, HospitalSession};
use crate::templating::{login_prompt, render};

#[derive(Serialize)]
struct RegisterHospitalPage {
    pincodes: Vec<String>,
    vaccines: Vec<String>,
    message: &'static str,
    color: &'static str,
}

async fn signup_form_choices(
    connection: &mut AsyncPgConnection,
) -> Result<(Vec<String>, Vec<String>), AppError> {
    let pincodes: Vec<String> = location::table
        .select(location::pincode)
        .load(connection)
        .await?;
    let vaccines: Vec<String> = vaccine::table
        .select(vaccine::name)
        .load(connection)
        .await?;
    Ok((pincodes, vaccines))
}

pub async fn register_hospital_form(State(pool): State<Pool>) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;
    let (pincodes, vaccines) = signup_form_choices(&mut connection).await?;
    Ok(render(
        "register_hospital",
        &RegisterHospitalPage {
            pincodes,
            vaccines,
            message: "Enter details to Register",
            color: "success",
        },
    ))
}

#[derive(Deserialize)]
pub struct RegisterHospital {
    name: String,
    email: String,
    contact_no: String,
    kind: String,
    pincode: String,
    vaccine: String,
    password: String,
    password_repeat: String,
}

pub async fn register_hospital(
    State(pool): State<Pool>,
    Form(form): Form<RegisterHospital>,
) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;
    let (pincodes, vaccines) = signup_form_choices(&mut connection).await?;
    let page = |message, color| {
        render(
            "register_hospital",
            &RegisterHospitalPage {
                pincodes,
                vaccines,
                message,
                color,
            },
        )
    };

    let duplicates: i64 = hospital::table
        .filter(hospital::email.eq(&form.email))
        .count()
        .get_result(&mut connection)
        .await?;
    if duplicates > 0 {
        return Ok(page(
            "That email has already been registered! Kindly head over to the login page",
            "danger",
        ));
    }
    if form.password != form.password_repeat {
        return Ok(page("Passwords do not match!", "danger"));
    }

    let password_hash = credentials::hash_password(&form.password)?;
    diesel::insert_into(hospital::table)
        .values(NewHospital {
            name: &form.name,
            email: &form.email,
            contact_no: &form.contact_no,
            kind: &form.kind,
            address: &form.pincode,
            password_hash: &password_hash,
            vaccine: &form.vaccine,
            remaining_quantity: 0,
        })
        .execute(&mut connection)
        .await?;
    info!(name = %form.name, "registered hospital");

    Ok(page(
        "Success! Your Hospital has been registered. Please login to continue.",
        "success",
    ))
}

pub async fn login_form() -> Html<String> {
    login_prompt("")
}

#[derive(Deserialize)]
pub struct HospitalLogin {
    email: String,
    password: String,
}

pub async fn hospital_login(
    session: HospitalSession,
    State(pool): State<Pool>,
    Form(form): Form<HospitalLogin>,
) -> Result<Response, AppError> {
    let mut connection = pool.get().await?;
    let account: Option<(i32, String)> = hospital::table
        .filter(hospital::email.eq(&form.email))
        .select((hospital::id, hospital::password_hash))
        .first(&mut connection)
        .await
        .optional()?;
    let Some((hospital_id, password_hash)) = account else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            login_prompt("Error: Account not found."),
        )
            .into_response());
    };
    if !credentials::verify_password(&form.password, &password_hash)? {
        return Ok((
            StatusCode::UNAUTHORIZED,
            login_prompt("Error: Email or password does not match."),
        )
            .into_response());
    }

    info!(hospital_id, "hospital logged in");
    Ok((session.log_in(hospital_id), Redirect::to("/hospitaldata")).into_response())
}

pub async fn logout(session: HospitalSession) -> impl IntoResponse {
    (session.log_out(), Redirect::to("/"))
}

#[derive(Serialize)]
struct RecentShipment {
    source: String,
    quantity: i32,
    supplied_on: NaiveDate,
}

#[derive(Serialize)]
struct HospitalOverviewPage {
    hospital: vaccination_management_database::models::Hospital,
    administered_count: i64,
    shipments: Vec<RecentShipment>,
}

pub async fn hospital_overview(
    session: HospitalSession,
    State(pool): State<Pool>,
) -> Result<Response, AppError> {
    let Some(hospital_id) = session.hospital_id() else {
        return Ok(login_prompt("").into_response());
    };
    let mut connection = pool.get().await?;
    let Some(hospital) = resolve_hospital(&mut connection, hospital_id).await? else {
        return Ok(login_prompt("").into_response());
    };

    let administered_count: i64 = vaccinates::table
        .filter(vaccinates::hospital_id.eq(hospital_id))
        .filter(vaccinates::first_dose.is_not_null())
        .count()
        .get_result(&mut connection)
        .await?;
    let shipments: Vec<(String, i32, NaiveDate)> = supplies::table
        .inner_join(inventory::table)
        .filter(supplies::hospital_id.eq(hospital_id))
        .order(supplies::supplied_on.desc())
        .select((inventory::name, supplies::quantity, supplies::supplied_on))
        .load(&mut connection)
        .await?;

    Ok(render(
        "hospitaldata",
        &HospitalOverviewPage {
            hospital,
            administered_count,
            shipments: shipments
                .into_iter()
                .map(|(source, quantity, supplied_on)| RecentShipment {
                    source,
                    quantity,
                    supplied_on,
                })
                .collect(),
        },
    )
    .into_response())
}
