//! Wire DTOs for the push gateway send endpoint.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::PushMessage;

#[derive(Debug, Serialize)]
pub(super) struct PushRequestDto<'a> {
    pub(super) token: &'a str,
    pub(super) notification: PushNotificationDto<'a>,
    pub(super) data: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PushNotificationDto<'a> {
    pub(super) title: &'a str,
    pub(super) body: &'a str,
}

impl<'a> From<&'a PushMessage> for PushRequestDto<'a> {
    fn from(message: &'a PushMessage) -> Self {
        Self {
            token: message.token.as_ref(),
            notification: PushNotificationDto {
                title: &message.title,
                body: &message.body,
            },
            data: &message.data,
        }
    }
}
