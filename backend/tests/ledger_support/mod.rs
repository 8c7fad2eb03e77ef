//! In-process harness driving the REST API over the in-memory ledger.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use meal_ledger::Trace;
use meal_ledger::domain::{Role, TRACE_ID_HEADER, UserId};
use meal_ledger::inbound::http::api_scope;
use meal_ledger::inbound::http::state::{HttpState, HttpStatePorts};
use meal_ledger::outbound::identity::JwtIdentityVerifier;
use meal_ledger::outbound::memory::InMemoryLedger;
use meal_ledger::test_support::{
    FixedClock, TEST_JWT_SECRET, fixture_now, mint_token, sample_profile,
};
use serde_json::Value;

/// A registered user and a token identifying them.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: UserId,
    pub token: String,
}

/// Snapshot of one HTTP exchange.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub trace_id: Option<String>,
}

/// Ledger, clock and handler state shared across requests.
pub struct LedgerHarness {
    pub ledger: Arc<InMemoryLedger>,
    pub clock: Arc<FixedClock>,
    state: web::Data<HttpState>,
}

impl LedgerHarness {
    pub fn new() -> Self {
        let ledger = Arc::new(InMemoryLedger::new());
        let clock = Arc::new(FixedClock::new(fixture_now()));
        let ports = HttpStatePorts::over_stores(
            ledger.clone(),
            ledger.clone(),
            ledger.clone(),
            clock.clone(),
            Arc::new(JwtIdentityVerifier::new(TEST_JWT_SECRET)),
        );
        Self {
            ledger,
            clock,
            state: web::Data::new(HttpState::new(ports)),
        }
    }

    /// Register a user as the identity provider would and mint their token.
    pub fn register(&self, name: &str, email: &str, role: Role) -> Account {
        let id = UserId::random();
        self.ledger
            .register_user(sample_profile(id, name, email, role))
            .expect("register user");
        let claim = match role {
            Role::Admin => "admin",
            Role::Member => "member",
        };
        Account {
            id,
            token: mint_token(TEST_JWT_SECRET, &id, claim, 3600),
        }
    }

    /// Send `request` as `account`, or anonymously when `None`.
    pub async fn send(&self, account: Option<&Account>, request: actix_test::TestRequest) -> Reply {
        let app = actix_test::init_service(
            App::new()
                .app_data(self.state.clone())
                .wrap(Trace)
                .service(api_scope()),
        )
        .await;
        let request = match account {
            Some(account) => request.insert_header((
                actix_web::http::header::AUTHORIZATION,
                format!("Bearer {}", account.token),
            )),
            None => request,
        };
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = actix_test::read_body(response).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        Reply {
            status,
            body,
            trace_id,
        }
    }
}
