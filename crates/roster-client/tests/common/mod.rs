#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode as HttpStatus;
use axum::routing::get;
use roster_client::error::{FetchError, FetchResult, StatusCode, TransportError, TransportResult};
use roster_client::{RosterRenderer, RosterTable, TrustApi};
use roster_core::{
    IdToken, Persona, PersonaName, Revision, RosterColumn, SortOrder, SortState, TrustAction,
    TrustList,
};
use tokio::task::JoinHandle;
use url::Url;

#[derive(Default)]
struct MockState {
    revision: u64,
    lists: BTreeMap<TrustList, BTreeMap<PersonaName, Persona>>,
    known: BTreeMap<IdToken, PersonaName>,

    fail_revision: usize,
    fail_list: BTreeMap<TrustList, usize>,
    fail_submit: usize,

    revision_polls: usize,
    fetches: Vec<(TrustList, SortState)>,
    submits: Vec<(TrustAction, IdToken, String)>,
}

impl MockState {
    fn list_mut(&mut self, list: TrustList) -> &mut BTreeMap<PersonaName, Persona> {
        self.lists.entry(list).or_default()
    }

    fn insert(&mut self, list: TrustList, persona: Persona) {
        self.known
            .insert(persona.token.clone(), persona.name.clone());
        for other in TrustList::ALL {
            self.list_mut(other).remove(&persona.name);
        }
        self.list_mut(list).insert(persona.name.clone(), persona);
        self.revision += 1;
    }

    fn sorted(&self, list: TrustList, sort: SortState) -> Vec<Persona> {
        let mut personas: Vec<_> = self
            .lists
            .get(&list)
            .map(|l| l.values().cloned().collect())
            .unwrap_or_default();

        personas.sort_by(|a, b| {
            let ord = match sort.key {
                RosterColumn::User => a.name.cmp(&b.name),
                RosterColumn::Reason => a.reason.cmp(&b.reason),
                RosterColumn::Subscribe => a.subscribed.cmp(&b.subscribed),
            };
            ord.then_with(|| a.name.cmp(&b.name))
        });
        if sort.order == SortOrder::Descending {
            personas.reverse();
        }
        personas
    }

    fn apply(&mut self, action: TrustAction, token: &IdToken, reason: &str) -> bool {
        let Some(name) = self.known.get(token).cloned() else {
            return false;
        };

        match action {
            TrustAction::Trust => {
                self.insert(TrustList::Trusted, Persona::new(name).with_reason(reason));
            }
            TrustAction::Distrust => {
                self.insert(TrustList::Distrusted, Persona::new(name).with_reason(reason));
            }
            TrustAction::Neutral => {
                for list in TrustList::ALL {
                    self.list_mut(list).remove(&name);
                }
                self.revision += 1;
            }
            TrustAction::Subscribe => {
                let Some(persona) = self.list_mut(TrustList::Trusted).get_mut(&name) else {
                    return false;
                };
                persona.subscribed = true;
                self.revision += 1;
            }
        }
        true
    }
}

fn take_failure(counter: &mut usize) -> bool {
    if *counter == 0 {
        return false;
    }
    *counter -= 1;
    true
}

fn unavailable() -> TransportError {
    TransportError::Status {
        status: StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// In-memory trust endpoint
///
/// Keeps a persona in at most one list, bumps the revision on every change,
/// and sorts lists the way it is asked to.
#[derive(Default)]
pub struct MockTrustServer {
    state: Mutex<MockState>,
}

impl MockTrustServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("Locking failed")
    }

    pub fn revision(&self) -> Revision {
        Revision(self.lock().revision)
    }

    pub fn bump_revision(&self) {
        self.lock().revision += 1;
    }

    pub fn add(&self, list: TrustList, persona: Persona) {
        self.lock().insert(list, persona);
    }

    /// Make `name` known without putting it in any list
    pub fn learn(&self, name: &str) -> IdToken {
        let name = PersonaName::from(name);
        let token = IdToken::encode(&name);
        self.lock().known.insert(token.clone(), name);
        token
    }

    pub fn list(&self, list: TrustList) -> Vec<Persona> {
        self.lock().sorted(list, SortState::default())
    }

    pub fn fail_revision(&self, times: usize) {
        self.lock().fail_revision = times;
    }

    pub fn fail_list(&self, list: TrustList, times: usize) {
        self.lock().fail_list.insert(list, times);
    }

    pub fn fail_submit(&self, times: usize) {
        self.lock().fail_submit = times;
    }

    pub fn revision_polls(&self) -> usize {
        self.lock().revision_polls
    }

    pub fn fetches(&self) -> Vec<(TrustList, SortState)> {
        self.lock().fetches.clone()
    }

    pub fn fetch_count(&self, list: TrustList) -> usize {
        self.lock().fetches.iter().filter(|(l, _)| *l == list).count()
    }

    pub fn submits(&self) -> Vec<(TrustAction, IdToken, String)> {
        self.lock().submits.clone()
    }
}

#[async_trait]
impl TrustApi for MockTrustServer {
    async fn fetch_revision(&self) -> FetchResult<Revision> {
        let mut state = self.lock();
        state.revision_polls += 1;
        if take_failure(&mut state.fail_revision) {
            return Err(FetchError::Transport {
                source: unavailable(),
            });
        }
        Ok(Revision(state.revision))
    }

    async fn fetch_list(&self, list: TrustList, sort: SortState) -> FetchResult<Vec<Persona>> {
        let mut state = self.lock();
        state.fetches.push((list, sort));
        if take_failure(state.fail_list.entry(list).or_default()) {
            return Err(FetchError::Transport {
                source: unavailable(),
            });
        }
        Ok(state.sorted(list, sort))
    }

    async fn submit_action(
        &self,
        action: TrustAction,
        token: &IdToken,
        reason: &str,
    ) -> TransportResult<()> {
        let mut state = self.lock();
        state
            .submits
            .push((action, token.clone(), reason.to_owned()));
        if take_failure(&mut state.fail_submit) {
            return Err(unavailable());
        }
        if !state.apply(action, token, reason) {
            return Err(TransportError::Status {
                status: StatusCode::BAD_REQUEST,
            });
        }
        Ok(())
    }
}

/// Keeps every table it was asked to render
#[derive(Default)]
pub struct RecordingRenderer {
    tables: Mutex<Vec<RosterTable>>,
}

impl RecordingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn renders(&self, list: TrustList) -> usize {
        self.tables
            .lock()
            .expect("Locking failed")
            .iter()
            .filter(|t| t.list == list)
            .count()
    }

    pub fn last(&self, list: TrustList) -> Option<RosterTable> {
        self.tables
            .lock()
            .expect("Locking failed")
            .iter()
            .rev()
            .find(|t| t.list == list)
            .cloned()
    }
}

impl RosterRenderer for RecordingRenderer {
    fn render(&self, table: &RosterTable) {
        self.tables
            .lock()
            .expect("Locking failed")
            .push(table.clone());
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn users_xml(list: TrustList, personas: &[Persona]) -> String {
    let mut out = String::from("<Users>");
    for persona in personas {
        out.push_str("<Persona>");
        out.push_str(&format!("<User>{}</User>", escape(persona.name.as_str())));
        out.push_str(&format!("<UserB64>{}</UserB64>", persona.token));
        if list == TrustList::Trusted {
            out.push_str(&format!("<Subscribed>{}</Subscribed>", persona.subscribed));
        }
        out.push_str(&format!("<Reason>{}</Reason>", escape(&persona.reason)));
        out.push_str("</Persona>");
    }
    out.push_str("</Users>");
    out
}

async fn get_section(
    State(mock): State<Arc<MockTrustServer>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<String, HttpStatus> {
    let section = query.get("section").map(String::as_str);
    if section == Some("revision") {
        return Ok(format!("<Revision>{}</Revision>", mock.revision()));
    }

    let list = TrustList::ALL
        .into_iter()
        .find(|l| Some(l.section()) == section)
        .ok_or(HttpStatus::BAD_REQUEST)?;
    let sort = SortState {
        key: query
            .get("key")
            .and_then(|k| k.parse().ok())
            .unwrap_or(RosterColumn::User),
        order: query
            .get("order")
            .and_then(|o| SortOrder::from_wire(o))
            .unwrap_or(SortOrder::DEFAULT),
    };

    let mut state = mock.lock();
    state.fetches.push((list, sort));
    Ok(users_xml(list, &state.sorted(list, sort)))
}

async fn post_action(
    State(mock): State<Arc<MockTrustServer>>,
    Form(form): Form<HashMap<String, String>>,
) -> HttpStatus {
    let (Some(action), Some(persona)) = (
        form.get("action").and_then(|a| a.parse::<TrustAction>().ok()),
        form.get("persona"),
    ) else {
        return HttpStatus::BAD_REQUEST;
    };
    let reason = form.get("reason").cloned().unwrap_or_default();
    let token = IdToken::from_wire(persona.as_str());

    let mut state = mock.lock();
    state.submits.push((action, token.clone(), reason.clone()));
    if state.apply(action, &token, &reason) {
        HttpStatus::OK
    } else {
        HttpStatus::BAD_REQUEST
    }
}

/// The mock endpoint, served as XML over HTTP on a random port
pub struct XmlTrustServer {
    pub mock: Arc<MockTrustServer>,
    pub url: Url,
    handle: JoinHandle<()>,
}

impl XmlTrustServer {
    pub async fn start() -> Self {
        let mock = MockTrustServer::new();
        let router = Router::new()
            .route("/MuWire/Trust", get(get_section).post(post_action))
            .with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Has local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });

        Self {
            mock,
            url: Url::parse(&format!("http://{addr}/MuWire/Trust")).expect("Valid url"),
            handle,
        }
    }
}

impl Drop for XmlTrustServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
