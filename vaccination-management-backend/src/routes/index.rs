use axum::extract::State;
use axum::response::Html;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use vaccination_management_database::schema::{hospital, inventory, vaccinates};
use vaccination_management_database::Pool;

use crate::error::AppError;
use crate::templating::render;

#[derive(Serialize)]
struct VaccineCount {
    vaccine: String,
    count: i64,
}

#[derive(Serialize)]
struct Dashboard {
    assignment_count: i64,
    hospital_count: i64,
    inventory_count: i64,
    per_vaccine: Vec<VaccineCount>,
}

pub async fn index(State(pool): State<Pool>) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;
    let assignment_count: i64 = vaccinates::table.count().get_result(&mut connection).await?;
    let hospital_count: i64 = hospital::table.count().get_result(&mut connection).await?;
    let inventory_count: i64 = inventory::table.count().get_result(&mut connection).await?;
    let per_vaccine: Vec<(String, i64)> = vaccinates::table
        .inner_join(hospital::table)
        .group_by(hospital::vaccine)
        .select((hospital::vaccine, diesel::dsl::count_star()))
        .load(&mut connection)
        .await?;

    Ok(render(
        "home",
        &Dashboard {
            assignment_count,
            hospital_count,
            inventory_count,
            per_vaccine: per_vaccine
                .into_iter()
                .map(|(vaccine, count)| VaccineCount { vaccine, count })
                .collect(),
        },
    ))
}
