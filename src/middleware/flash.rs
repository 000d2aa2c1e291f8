use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::{debug, warn};

use crate::router::RegistryState;

const FLASH_COOKIE: &str = "bank_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Danger,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Warning => "warning",
            FlashLevel::Danger => "danger",
        }
    }
}

/// A one-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }
}

/// Session-scoped, single-slot notice queue backed by an encrypted cookie.
///
/// `set` overwrites any pending notice; `take` returns it and clears the cookie, so a
/// notice is rendered exactly once. Return the jar in the response for either to stick.
pub struct FlashJar {
    jar: PrivateCookieJar,
    secure: bool,
}

impl FlashJar {
    pub fn take(self) -> (Option<Flash>, Self) {
        let pending = self
            .jar
            .get(FLASH_COOKIE)
            .and_then(|c| serde_json::from_str::<Flash>(c.value()).ok());
        if pending.is_none() {
            return (None, self);
        }
        debug!("flash notice consumed");
        let jar = self.jar.remove(clear_cookie(FLASH_COOKIE));
        (
            pending,
            Self {
                jar,
                secure: self.secure,
            },
        )
    }

    pub fn set(self, flash: Flash) -> Self {
        let value = match serde_json::to_string(&flash) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "failed to encode flash notice; dropping it");
                return self;
            }
        };
        let jar = self.jar.add(build_cookie(FLASH_COOKIE, value, self.secure));
        Self {
            jar,
            secure: self.secure,
        }
    }
}

impl FromRequestParts<RegistryState> for FlashJar {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &RegistryState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_request_parts(parts, state).await?;
        Ok(Self {
            jar,
            secure: !state.insecure_cookie,
        })
    }
}

impl IntoResponseParts for FlashJar {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}

fn build_cookie(name: &str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(15))
        .build()
}

fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
