use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::{hospital, inventory, person, supplies, vaccinates};

#[derive(Queryable, Selectable, Serialize, Clone, Debug)]
#[diesel(table_name = hospital)]
pub struct Hospital {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub contact_no: String,
    pub kind: String,
    pub address: String,
    /// Never rendered; the digest stays server-side.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub vaccine: String,
    pub remaining_quantity: i32,
}

#[derive(Insertable)]
#[diesel(table_name = hospital)]
pub struct NewHospital<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub contact_no: &'a str,
    pub kind: &'a str,
    pub address: &'a str,
    pub password_hash: &'a str,
    pub vaccine: &'a str,
    pub remaining_quantity: i32,
}

#[derive(Insertable)]
#[diesel(table_name = person)]
pub struct NewPerson<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub address: &'a str,
    pub date_of_birth: NaiveDate,
    pub contact_no: &'a str,
    pub gender: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = vaccinates)]
pub struct NewAssignment {
    pub patient_id: i32,
    pub hospital_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = inventory)]
pub struct NewInventoryItem<'a> {
    pub name: &'a str,
    pub contact_no: &'a str,
    pub address: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = supplies)]
pub struct NewSupply {
    pub hospital_id: i32,
    pub inventory_id: i32,
    pub quantity: i32,
    pub supplied_on: NaiveDate,
}
