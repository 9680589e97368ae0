//! Drives an [`EditDialog`] across one form submission.
//!
//! A GET renders the draft taken from the stored entity. A POST reopens the
//! dialog over the same entity, swaps in the submitted draft and presses the
//! chosen button. A dialog that closes redirects to its list page with the
//! notifications flashed; one that stays open is rendered again.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::api::dtos::requests::DialogAction;
use crate::api::views::push_flash;
use crate::domain::dialogs::{DialogError, EditDialog, FormDraft};

/// Status to render a dialog that is still open with.
pub async fn press<D: FormDraft>(dialog: &mut EditDialog<D>, action: DialogAction) -> Option<StatusCode> {
    let result = match action {
        DialogAction::Save => dialog.save().await,
        DialogAction::Delete => dialog.delete().await,
        DialogAction::Discard => {
            dialog.discard();
            Ok(())
        }
    };

    match result {
        Ok(()) if !dialog.is_open() => None,
        Ok(()) => Some(StatusCode::OK),
        Err(DialogError::Persistence(e)) => Some(e.status()),
        Err(_) => Some(StatusCode::UNPROCESSABLE_ENTITY),
    }
}

pub fn close<D: FormDraft>(cookies: &Cookies, dialog: &mut EditDialog<D>, to: &str) -> Response {
    push_flash(cookies, &dialog.take_notifications());
    Redirect::to(to).into_response()
}
