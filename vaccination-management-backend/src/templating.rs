use axum::response::Html;
use handlebars::Handlebars;
use once_cell::sync::Lazy;

pub static HANDLEBARS: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut registry = Handlebars::new();
    let templates = [
        ("home", include_str!("../templates/home.hbs")),
        ("stat", include_str!("../templates/stat.hbs")),
        ("patient", include_str!("../templates/patient.hbs")),
        ("choose_hosp", include_str!("../templates/choose_hosp.hbs")),
        (
            "register_hospital",
            include_str!("../templates/register_hospital.hbs"),
        ),
        ("hosp_login", include_str!("../templates/hosp_login.hbs")),
        ("hospitaldata", include_str!("../templates/hospitaldata.hbs")),
        (
            "hosp_logindata",
            include_str!("../templates/hosp_logindata.hbs"),
        ),
        (
            "register_inventory",
            include_str!("../templates/register_inventory.hbs"),
        ),
        (
            "inventory_data",
            include_str!("../templates/inventory_data.hbs"),
        ),
    ];
    for (name, source) in templates {
        registry.register_template_string(name, source).unwrap();
    }
    registry
});

pub fn render<T: serde::Serialize>(template_name: &str, value: &T) -> Html<String> {
    Html(
        HANDLEBARS
            .render(template_name, value)
            .unwrap_or_else(|render_error| render_error.to_string()),
    )
}

/// The login form every hospital-area page falls back to when the request
/// carries no valid session.
pub fn login_prompt(message: &str) -> Html<String> {
    render("hosp_login", &serde_json::json!({ "message": message }))
}
