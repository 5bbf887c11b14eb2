//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, web};

use crate::domain::ports::{
    MockAccountSettings, MockLoginService, MockPasswordReset, MockUserManagement,
};
use crate::domain::test_fixtures::fixed_clock;
use crate::domain::{Error, User, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Cookie session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Mocked ports; set expectations then call [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub users: MockUserManagement,
    pub settings: MockAccountSettings,
    pub password_reset: MockPasswordReset,
}

impl MockPorts {
    /// Make `resolve_actor` return `actor` for any id.
    pub fn with_actor(mut self, actor: &User) -> Self {
        let actor = actor.clone();
        self.login
            .expect_resolve_actor()
            .returning(move |_| Ok(Some(actor.clone())));
        self
    }

    pub fn into_state(self) -> HttpState {
        HttpState::with_clock(
            HttpStatePorts {
                login: Arc::new(self.login),
                users: Arc::new(self.users),
                settings: Arc::new(self.settings),
                password_reset: Arc::new(self.password_reset),
            },
            fixed_clock(),
        )
    }
}

async fn sign_in_as(session: SessionContext, id: web::Path<String>) -> Result<HttpResponse, Error> {
    let id = UserId::new(id.as_str()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::Ok().finish())
}

/// The API under `/api/v1` plus `GET /test/sign-in/{id}` to open a session.
pub fn api_test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(super::configure))
        .route("/test/sign-in/{id}", web::get().to(sign_in_as))
}

/// Open a session for `user` through the sign-in test route.
pub async fn sign_in<S>(app: &S, user: &User) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let response = actix_web::test::call_service(
        app,
        actix_web::test::TestRequest::get()
            .uri(&format!("/test/sign-in/{}", user.id))
            .to_request(),
    )
    .await;
    session_cookie(&response)
}
