//! Bearer-token extractor. Resolves the `Authorization` header into an
//! [`Actor`] before the handler body runs, so every protected endpoint sees
//! an authenticated caller or a 401.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::LocalBoxFuture;

use super::state::HttpState;
use crate::domain::{Actor, BearerToken, Error};

/// Request guard proving the caller presented a valid bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(Actor);

impl Authenticated {
    pub fn actor(&self) -> &Actor {
        &self.0
    }

    pub fn into_actor(self) -> Actor {
        self.0
    }
}

fn bearer_token(header: Option<&str>) -> Result<BearerToken, Error> {
    let header = header.ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))?;
    if token.trim().is_empty() {
        return Err(Error::unauthorized("missing bearer token"));
    }
    Ok(BearerToken::from_presented(token))
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("http state is not configured"))?;
            let token = bearer_token(header.as_deref())?;
            let actor = state.auth.authenticate(&token).await?;
            Ok(Self(actor))
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::bearer_token;
    use crate::domain::ErrorCode;

    #[test]
    fn well_formed_header_yields_token() {
        let token = bearer_token(Some("Bearer abc123")).expect("token");
        assert_eq!(token.reveal(), "abc123");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic dXNlcjpwdw=="))]
    #[case(Some("Bearer "))]
    #[case(Some("abc123"))]
    fn malformed_headers_are_unauthorized(#[case] header: Option<&str>) {
        let error = bearer_token(header).expect_err("must reject");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
