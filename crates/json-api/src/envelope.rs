//! Response envelope

use salvo::{
    http::ResBody,
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every response body, success or failure, has this shape.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub(crate) fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data,
        })
    }
}

/// Renders error responses as a failed envelope carrying the error's brief.
#[handler]
pub(crate) async fn catcher(res: &mut Response, ctrl: &mut FlowCtrl) {
    let status = res.status_code.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if !status.is_client_error() && !status.is_server_error() {
        return;
    }

    let message = match res.take_body() {
        ResBody::Error(error) => error.brief,
        _ => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    res.status_code(status);
    res.render(Json(Envelope {
        success: false,
        message,
        data: Value::Null,
    }));

    ctrl.skip_rest();
}
