use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::db::BankStorage;
use crate::handlers::{api, web};

/// Shared per-process state: the storage handle and the flash-cookie key.
/// Nothing in here is mutable.
#[derive(Clone)]
pub struct RegistryState {
    pub storage: BankStorage,
    pub insecure_cookie: bool,
    cookie_key: Key,
}

impl RegistryState {
    pub fn new(storage: BankStorage, cookie_key: Key, insecure_cookie: bool) -> Self {
        Self {
            storage,
            insecure_cookie,
            cookie_key,
        }
    }
}

impl FromRef<RegistryState> for Key {
    fn from_ref(state: &RegistryState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn registry_router(state: RegistryState) -> Router {
    Router::new()
        .route("/", get(web::index))
        .route("/bank/new", get(web::new_bank_form).post(web::create_bank))
        .route("/bank/{id}", get(web::view_bank))
        .route(
            "/bank/{id}/edit",
            get(web::edit_bank_form).post(web::update_bank),
        )
        .route("/bank/{id}/delete", post(web::delete_bank))
        .route("/api/banks", get(api::list_banks).post(api::create_bank))
        .route(
            "/api/banks/{id}",
            get(api::get_bank)
                .put(api::update_bank)
                .delete(api::delete_bank),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
