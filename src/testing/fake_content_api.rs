use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::domain::{ContentEntry, DirectoryEntry, FetchError, RemoteFile};
use crate::ports::{ContentApi, ContentRequest};

pub type ScriptedResponse = Result<ContentEntry, FetchError>;

/// Shared, ordered record of fetches and appends across fakes.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn encode_body(text: &str) -> String {
    STANDARD.encode(text)
}

#[derive(Default)]
struct FakeState {
    scripts: HashMap<String, VecDeque<ScriptedResponse>>,
    requests: Vec<ContentRequest>,
}

/// Content API returning scripted responses per path, in order.
#[derive(Clone, Default)]
pub struct FakeContentApi {
    state: Arc<Mutex<FakeState>>,
    journal: Journal,
}

impl FakeContentApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn script(self, path: &str, responses: Vec<ScriptedResponse>) -> Self {
        self.state
            .lock()
            .unwrap()
            .scripts
            .entry(path.to_string())
            .or_default()
            .extend(responses);
        self
    }

    pub fn with_file(self, path: &str, yaml: &str) -> Self {
        let file = RemoteFile::base64(path, encode_body(yaml));
        self.script(path, vec![Ok(ContentEntry::File(file))])
    }

    pub fn with_directory(self, path: &str, children: &[&str]) -> Self {
        let entries = children.iter().map(|child| DirectoryEntry::file(*child)).collect();
        self.script(path, vec![Ok(ContentEntry::Directory(entries))])
    }

    pub fn requests(&self) -> Vec<ContentRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

impl ContentApi for FakeContentApi {
    fn get_content(&self, request: &ContentRequest) -> Result<ContentEntry, FetchError> {
        self.journal.push(format!("fetch {}", request.path));
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        state.scripts.get_mut(&request.path).and_then(VecDeque::pop_front).unwrap_or_else(|| {
            Err(FetchError::Status { status: 404, message: "test: no scripted response".into() })
        })
    }
}
