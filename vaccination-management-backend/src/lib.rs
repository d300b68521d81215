pub mod credentials;
pub mod error;
pub mod ledger;
pub mod routes;
pub mod session;
pub mod templating;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::info;
use vaccination_management_config::Config;
use vaccination_management_database::{get_database_connection, Pool};

use crate::error::AppError;
use crate::routes::hospitals::{
    hospital_login, hospital_overview, login_form, logout, register_hospital,
    register_hospital_form,
};
use crate::routes::index::index;
use crate::routes::inventory::{
    delete_supply, inventory_overview, record_supply, register_inventory, register_inventory_form,
};
use crate::routes::patients::{assign_hospital, choose_hospital, patient_form, register_patient};
use crate::routes::roster::{
    administer_doses, roster_all, roster_both_doses, roster_no_dose, roster_one_dose,
};
use crate::routes::stats::stat;

#[derive(Clone, FromRef)]
pub struct AppState {
    pool: Pool,
    key: Key,
}

impl AppState {
    #[must_use]
    pub fn new(pool: Pool, key: Key) -> Self {
        Self { pool, key }
    }
}

#[must_use]
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(index))
        .route("/stat", get(stat))
        .route("/patient", get(patient_form).post(register_patient))
        .route("/choose_hosp/:pin/:pid", get(choose_hospital))
        .route("/choose_hosp/:id", post(assign_hospital))
        .route(
            "/Registerhospital",
            get(register_hospital_form).post(register_hospital),
        )
        .route("/hosp_login", get(login_form))
        .route("/hospital_login", post(hospital_login))
        .route("/logout", get(logout))
        .route("/hospitaldata", get(hospital_overview))
        .route("/hosp_logindata", get(roster_all).post(administer_doses))
        .route("/onedose", get(roster_one_dose))
        .route("/nodose", get(roster_no_dose))
        .route("/bothdose", get(roster_both_doses))
        .route(
            "/Registerinventory",
            get(register_inventory_form).post(register_inventory),
        )
        .route(
            "/inventory_data",
            get(inventory_overview).post(record_supply),
        )
        .route("/delete", post(delete_supply));

    router.with_state(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::default())
                    .on_response(DefaultOnResponse::default()),
            )
            .layer(CatchPanicLayer::new()),
    )
}

pub async fn run_server(config: Config) -> Result<(), AppError> {
    info!("starting up server...");

    let pool = get_database_connection(&config.database_url)?;
    let key = Key::from(config.session_secret.as_bytes());
    let app = app(AppState::new(pool, key));

    let listener = TcpListener::bind(&config.listen_address).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[allow(clippy::redundant_pub_crate)]
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
