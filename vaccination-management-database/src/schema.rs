diesel::table! {
    person (id) {
        id -> Int4,
        #[max_length = 255]
        name -> Varchar,
        #[max_length = 255]
        email -> Varchar,
        #[max_length = 16]
        address -> Varchar,
        date_of_birth -> Date,
        #[max_length = 32]
        contact_no -> Varchar,
        #[max_length = 16]
        gender -> Varchar,
    }
}

diesel::table! {
    hospital (id) {
        id -> Int4,
        #[max_length = 255]
        name -> Varchar,
        #[max_length = 255]
        email -> Varchar,
        #[max_length = 32]
        contact_no -> Varchar,
        #[max_length = 1]
        kind -> Varchar,
        #[max_length = 16]
        address -> Varchar,
        #[max_length = 255]
        password_hash -> Varchar,
        #[max_length = 255]
        vaccine -> Varchar,
        remaining_quantity -> Int4,
    }
}

diesel::table! {
    vaccinates (id) {
        id -> Int4,
        patient_id -> Int4,
        hospital_id -> Int4,
        first_dose -> Nullable<Date>,
        second_dose -> Nullable<Date>,
    }
}

diesel::table! {
    inventory (id) {
        id -> Int4,
        #[max_length = 255]
        name -> Varchar,
        #[max_length = 32]
        contact_no -> Varchar,
        #[max_length = 16]
        address -> Varchar,
    }
}

diesel::table! {
    supplies (id) {
        id -> Int4,
        hospital_id -> Int4,
        inventory_id -> Int4,
        quantity -> Int4,
        supplied_on -> Date,
    }
}

diesel::table! {
    vaccine (id) {
        id -> Int4,
        #[max_length = 255]
        name -> Varchar,
        cost -> Float8,
    }
}

diesel::table! {
    location (pincode) {
        #[max_length = 16]
        pincode -> Varchar,
    }
}

diesel::joinable!(vaccinates -> person (patient_id));
diesel::joinable!(vaccinates -> hospital (hospital_id));
diesel::joinable!(supplies -> hospital (hospital_id));
diesel::joinable!(supplies -> inventory (inventory_id));

diesel::allow_tables_to_appear_in_same_query!(
    person, hospital, vaccinates, inventory, supplies, vaccine, location,
);
