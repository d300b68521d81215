//! Inventory sources and the supply ledger.
//!
//! Recording a shipment is the only operation that replenishes a hospital's
//! remaining-quantity counter; the insert and the increment happen in one
//! transaction.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use tracing::info;
use vaccination_management_database::models::{Hospital, NewInventoryItem, NewSupply};
use vaccination_management_database::schema::{hospital, inventory, location, supplies, vaccine};
use vaccination_management_database::Pool;

use crate::error::AppError;
use crate::session::{resolve_hospital, HospitalSession};
use crate::templating::{login_prompt, render};

#[derive(Serialize)]
struct RegisterInventoryPage {
    pincodes: Vec<String>,
}

pub async fn register_inventory_form(State(pool): State<Pool>) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;
    let pincodes: Vec<String> = location::table
        .select(location::pincode)
        .load(&mut connection)
        .await?;
    Ok(render("register_inventory", &RegisterInventoryPage { pincodes }))
}

#[derive(Deserialize)]
pub struct RegisterInventory {
    name: String,
    contact_no: String,
    pincode: String,
}

pub async fn register_inventory(
    State(pool): State<Pool>,
    Form(form): Form<RegisterInventory>,
) -> Result<Redirect, AppError> {
    let mut connection = pool.get().await?;
    diesel::insert_into(inventory::table)
        .values(NewInventoryItem {
            name: &form.name,
            contact_no: &form.contact_no,
            address: &form.pincode,
        })
        .execute(&mut connection)
        .await?;
    info!(name = %form.name, "registered inventory source");
    Ok(Redirect::to("/"))
}

#[derive(Serialize)]
struct Shipment {
    supply_id: i32,
    source: String,
    quantity: i32,
    supplied_on: NaiveDate,
    total_cost: f64,
}

#[derive(Serialize)]
struct InventoryPage {
    hospital: Hospital,
    shipments: Vec<Shipment>,
    warning: Option<&'static str>,
}

async fn inventory_page(
    connection: &mut AsyncPgConnection,
    hospital: Hospital,
    warning: Option<&'static str>,
) -> Result<Html<String>, AppError> {
    let rows: Vec<(i32, String, i32, NaiveDate)> = supplies::table
        .inner_join(inventory::table)
        .filter(supplies::hospital_id.eq(hospital.id))
        .order(supplies::supplied_on.desc())
        .select((
            supplies::id,
            inventory::name,
            supplies::quantity,
            supplies::supplied_on,
        ))
        .load(connection)
        .await?;
    // government hospitals receive their doses free of charge
    let dose_cost: f64 = if hospital.kind == "P" {
        vaccine::table
            .filter(vaccine::name.eq(&hospital.vaccine))
            .select(vaccine::cost)
            .first(connection)
            .await
            .optional()?
            .unwrap_or(0.0)
    } else {
        0.0
    };

    let shipments = rows
        .into_iter()
        .map(|(supply_id, source, quantity, supplied_on)| Shipment {
            supply_id,
            source,
            quantity,
            supplied_on,
            total_cost: dose_cost * f64::from(quantity),
        })
        .collect();
    Ok(render(
        "inventory_data",
        &InventoryPage {
            hospital,
            shipments,
            warning,
        },
    ))
}

pub async fn inventory_overview(
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
    Ok(inventory_page(&mut connection, hospital, None)
        .await?
        .into_response())
}

#[derive(Deserialize)]
pub struct RecordSupply {
    inventory_id: i32,
    quantity: i32,
    supplied_on: NaiveDate,
}

pub async fn record_supply(
    session: HospitalSession,
    State(pool): State<Pool>,
    Form(form): Form<RecordSupply>,
) -> Result<Response, AppError> {
    let Some(hospital_id) = session.hospital_id() else {
        return Ok(login_prompt("").into_response());
    };
    let mut connection = pool.get().await?;
    let quantity = form.quantity;
    let recorded = connection
        .transaction::<_, AppError, _>(|connection| {
            async move {
                let known: i64 = inventory::table
                    .filter(inventory::id.eq(form.inventory_id))
                    .count()
                    .get_result(connection)
                    .await?;
                if known == 0 {
                    return Ok(false);
                }
                diesel::insert_into(supplies::table)
                    .values(NewSupply {
                        hospital_id,
                        inventory_id: form.inventory_id,
                        quantity: form.quantity,
                        supplied_on: form.supplied_on,
                    })
                    .execute(connection)
                    .await?;
                // the shipment is what replenishes the counter the dose gate
                // checks
                diesel::update(hospital::table.find(hospital_id))
                    .set(
                        hospital::remaining_quantity
                            .eq(hospital::remaining_quantity + form.quantity),
                    )
                    .execute(connection)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await?;

    if recorded {
        info!(hospital_id, quantity, "recorded supply");
        return Ok(Redirect::to("/inventory_data").into_response());
    }
    let Some(hospital) = resolve_hospital(&mut connection, hospital_id).await? else {
        return Ok(login_prompt("").into_response());
    };
    Ok(
        inventory_page(&mut connection, hospital, Some("Unknown inventory source"))
            .await?
            .into_response(),
    )
}

#[derive(Deserialize)]
pub struct DeleteSupply {
    supply_id: i32,
}

pub async fn delete_supply(
    session: HospitalSession,
    State(pool): State<Pool>,
    Form(form): Form<DeleteSupply>,
) -> Result<Response, AppError> {
    let Some(hospital_id) = session.hospital_id() else {
        return Ok(Redirect::to("/").into_response());
    };
    let mut connection = pool.get().await?;
    diesel::delete(
        supplies::table
            .filter(supplies::id.eq(form.supply_id))
            .filter(supplies::hospital_id.eq(hospital_id)),
    )
    .execute(&mut connection)
    .await?;
    info!(hospital_id, supply_id = form.supply_id, "deleted supply record");
    Ok(Redirect::to("/inventory_data").into_response())
}
