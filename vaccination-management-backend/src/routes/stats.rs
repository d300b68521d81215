use axum::extract::State;
use axum::response::Html;
use chrono::NaiveDate;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use vaccination_management_database::schema::{hospital, person, vaccinates};
use vaccination_management_database::Pool;

use crate::error::AppError;
use crate::ledger::{percentage, DoseStatus};
use crate::templating::render;

#[derive(Serialize, Debug, PartialEq, Eq)]
struct Share {
    label: String,
    count: i64,
    percentage: i64,
}

/// Turns grouped counts into rows with an integer share of the total.
fn shares(rows: Vec<(String, i64)>) -> Vec<Share> {
    let total: i64 = rows.iter().map(|(_, count)| count).sum();
    rows.into_iter()
        .map(|(label, count)| Share {
            label,
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

#[derive(Serialize, Default)]
struct DoseCoverage {
    no_dose: i64,
    one_dose: i64,
    both_doses: i64,
}

#[derive(Serialize)]
struct StatPage {
    gender: Vec<Share>,
    hospital_types: Vec<Share>,
    vaccines: Vec<Share>,
    dose: DoseCoverage,
}

pub async fn stat(State(pool): State<Pool>) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;
    let gender: Vec<(String, i64)> = person::table
        .group_by(person::gender)
        .select((person::gender, count_star()))
        .load(&mut connection)
        .await?;
    let hospital_types: Vec<(String, i64)> = hospital::table
        .group_by(hospital::kind)
        .select((hospital::kind, count_star()))
        .load(&mut connection)
        .await?;
    let vaccines: Vec<(String, i64)> = hospital::table
        .group_by(hospital::vaccine)
        .select((hospital::vaccine, count_star()))
        .load(&mut connection)
        .await?;
    let doses: Vec<(Option<NaiveDate>, Option<NaiveDate>)> = vaccinates::table
        .select((vaccinates::first_dose, vaccinates::second_dose))
        .load(&mut connection)
        .await?;

    let mut dose = DoseCoverage::default();
    for (first, second) in doses {
        match DoseStatus::classify(first, second) {
            DoseStatus::NoDose => dose.no_dose += 1,
            DoseStatus::OneDose => dose.one_dose += 1,
            DoseStatus::BothDoses => dose.both_doses += 1,
        }
    }

    Ok(render(
        "stat",
        &StatPage {
            gender: shares(gender),
            hospital_types: shares(hospital_types),
            vaccines: shares(vaccines),
            dose,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::{shares, Share};

    #[test]
    fn shares_are_relative_to_the_whole_roster() {
        let rows = vec![("F".to_owned(), 3), ("M".to_owned(), 1)];
        assert_eq!(
            shares(rows),
            vec![
                Share {
                    label: "F".to_owned(),
                    count: 3,
                    percentage: 75,
                },
                Share {
                    label: "M".to_owned(),
                    count: 1,
                    percentage: 25,
                },
            ]
        );
    }

    #[test]
    fn no_rows_means_no_shares() {
        assert_eq!(shares(vec![]), vec![]);
    }
}
