use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{error, info, warn};

use crate::db::models::BankPayload;
use crate::middleware::bank_request::BankId;
use crate::middleware::flash::{Flash, FlashJar};
use crate::router::RegistryState;
use crate::views;

const NOT_FOUND: &str = "Bank not found";

fn redirect_with(flash: FlashJar, notice: Flash, to: &str) -> Response {
    (flash.set(notice), Redirect::to(to)).into_response()
}

fn edit_path(id: i64) -> String {
    format!("/bank/{id}/edit")
}

/// GET / -> list of all banks; an empty list with a notice if the database fails.
pub async fn index(State(state): State<RegistryState>, flash: FlashJar) -> Response {
    let (pending, flash) = flash.take();
    match state.storage.list_all().await {
        Ok(banks) => {
            info!(count = banks.len(), "retrieved banks");
            (flash, Html(views::index(&banks, pending.as_ref()))).into_response()
        }
        Err(e) => {
            error!(error = %e, "error fetching banks");
            if let Some(dropped) = &pending {
                warn!(notice = %dropped.message, "pending notice replaced by fetch error");
            }
            let notice = Flash::danger(format!("Error fetching banks: {e}"));
            (flash, Html(views::index(&[], Some(&notice)))).into_response()
        }
    }
}

/// GET /bank/{id}
pub async fn view_bank(
    State(state): State<RegistryState>,
    BankId(id): BankId,
    flash: FlashJar,
) -> Response {
    match state.storage.get(id).await {
        Ok(Some(bank)) => {
            info!(bank_id = id, "retrieved bank");
            let (pending, flash) = flash.take();
            (flash, Html(views::bank_detail(&bank, pending.as_ref()))).into_response()
        }
        Ok(None) => {
            warn!(bank_id = id, "bank not found");
            redirect_with(flash, Flash::warning(NOT_FOUND), "/")
        }
        Err(e) => {
            error!(bank_id = id, error = %e, "error fetching bank");
            redirect_with(flash, Flash::danger(format!("Error fetching bank: {e}")), "/")
        }
    }
}

/// GET /bank/new
pub async fn new_bank_form(flash: FlashJar) -> Response {
    let (pending, flash) = flash.take();
    (flash, Html(views::create_form("", "", pending.as_ref()))).into_response()
}

/// POST /bank/new -> redirect to the list, or the form again with a notice.
///
/// Validation failures re-render in place (200) instead of redirecting, so the
/// submitted values stay in the form.
pub async fn create_bank(
    State(state): State<RegistryState>,
    flash: FlashJar,
    Form(payload): Form<BankPayload>,
) -> Response {
    let name = payload.name.as_deref().unwrap_or_default();
    let location = payload.location.as_deref().unwrap_or_default();

    let input = match payload.validate() {
        Ok(input) => input,
        Err(e) => {
            warn!("validation failed: name and location are required");
            let (_, flash) = flash.take();
            let notice = Flash::warning(e.to_string());
            return (flash, Html(views::create_form(name, location, Some(&notice))))
                .into_response();
        }
    };

    match state.storage.create(input).await {
        Ok(_) => redirect_with(flash, Flash::success("Bank created successfully!"), "/"),
        Err(e) => {
            error!(error = %e, "error creating bank");
            let (_, flash) = flash.take();
            let notice = Flash::danger(format!("Error creating bank: {e}"));
            (flash, Html(views::create_form(name, location, Some(&notice)))).into_response()
        }
    }
}

/// GET /bank/{id}/edit
pub async fn edit_bank_form(
    State(state): State<RegistryState>,
    BankId(id): BankId,
    flash: FlashJar,
) -> Response {
    match state.storage.get(id).await {
        Ok(Some(bank)) => {
            let (pending, flash) = flash.take();
            (flash, Html(views::edit_form(&bank, pending.as_ref()))).into_response()
        }
        Ok(None) => {
            warn!(bank_id = id, "bank not found for editing");
            redirect_with(flash, Flash::warning(NOT_FOUND), "/")
        }
        Err(e) => {
            error!(bank_id = id, error = %e, "error fetching bank for editing");
            redirect_with(flash, Flash::danger(format!("Error fetching bank: {e}")), "/")
        }
    }
}

/// POST /bank/{id}/edit -> detail page on success, back to the form otherwise.
pub async fn update_bank(
    State(state): State<RegistryState>,
    BankId(id): BankId,
    flash: FlashJar,
    Form(payload): Form<BankPayload>,
) -> Response {
    let input = match payload.validate() {
        Ok(input) => input,
        Err(e) => {
            warn!(bank_id = id, "validation failed");
            return redirect_with(flash, Flash::warning(e.to_string()), &edit_path(id));
        }
    };

    match state.storage.update(id, input).await {
        Ok(Some(_)) => redirect_with(
            flash,
            Flash::success("Bank updated successfully!"),
            &format!("/bank/{id}"),
        ),
        Ok(None) => {
            warn!(bank_id = id, "bank not found for update");
            redirect_with(flash, Flash::warning(NOT_FOUND), "/")
        }
        Err(e) => {
            error!(bank_id = id, error = %e, "error updating bank");
            redirect_with(
                flash,
                Flash::danger(format!("Error updating bank: {e}")),
                &edit_path(id),
            )
        }
    }
}

/// POST /bank/{id}/delete -> always back to the list.
pub async fn delete_bank(
    State(state): State<RegistryState>,
    BankId(id): BankId,
    flash: FlashJar,
) -> Response {
    let notice = match state.storage.delete(id).await {
        Ok(true) => Flash::success("Bank deleted successfully!"),
        Ok(false) => {
            warn!(bank_id = id, "bank not found for deletion");
            Flash::warning(NOT_FOUND)
        }
        Err(e) => {
            error!(bank_id = id, error = %e, "error deleting bank");
            Flash::danger(format!("Error deleting bank: {e}"))
        }
    };
    redirect_with(flash, notice, "/")
}
