//! In-memory connection that answers pages from a script.

#![allow(dead_code)]

use odbc_query::protocol::{ExecuteBatchFrame, QueryExecuteBatchResponse, ResponseStatus};
use odbc_query::{Configuration, Connection, TransportError};
use std::collections::VecDeque;
use std::sync::Mutex;

pub enum ScriptedReply {
    /// One count per row of the page.
    Counts(i64),
    Response(QueryExecuteBatchResponse),
    Raw(Vec<u8>),
    Fail(TransportError),
}

#[derive(Debug, Clone)]
pub struct RecordedPage {
    pub frame: ExecuteBatchFrame,
    pub connection_timeout: u32,
}

impl RecordedPage {
    pub fn size(&self) -> usize {
        self.frame.rows.len()
    }
}

pub struct MockConnection {
    config: Configuration,
    script: Mutex<VecDeque<ScriptedReply>>,
    pages: Mutex<Vec<RecordedPage>>,
}

impl MockConnection {
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            script: Mutex::new(VecDeque::new()),
            pages: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self::new(Configuration::new().with_page_size(page_size))
    }

    pub fn push(&self, reply: ScriptedReply) -> &Self {
        self.script.lock().unwrap().push_back(reply);
        self
    }

    pub fn fail_page_with(&self, status: ResponseStatus, message: &str) -> &Self {
        self.push(ScriptedReply::Response(QueryExecuteBatchResponse::failure(
            status, message,
        )))
    }

    pub fn pages(&self) -> Vec<RecordedPage> {
        self.pages.lock().unwrap().clone()
    }

    pub fn page_sizes(&self) -> Vec<usize> {
        self.pages().iter().map(RecordedPage::size).collect()
    }

    pub fn last_flags(&self) -> Vec<bool> {
        self.pages().iter().map(|p| p.frame.last).collect()
    }
}

impl Connection for MockConnection {
    fn configuration(&self) -> &Configuration {
        &self.config
    }

    fn sync_message(&self, request: &[u8], timeout_secs: u32) -> Result<Vec<u8>, TransportError> {
        let frame = ExecuteBatchFrame::decode(request)
            .map_err(|e| TransportError::General(format!("bad request frame: {}", e)))?;
        let rows = frame.rows.len();
        self.pages.lock().unwrap().push(RecordedPage {
            frame,
            connection_timeout: timeout_secs,
        });

        // An exhausted script answers every row with a count of 1.
        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ScriptedReply::Counts(1));

        match reply {
            ScriptedReply::Counts(n) => Ok(QueryExecuteBatchResponse::success(vec![n; rows])
                .encode()
                .unwrap()),
            ScriptedReply::Response(rsp) => Ok(rsp.encode().unwrap()),
            ScriptedReply::Raw(bytes) => Ok(bytes),
            ScriptedReply::Fail(err) => Err(err),
        }
    }
}
