//! Single-connection loopback server speaking the framed batch protocol.

#![allow(dead_code)]

use odbc_query::connection::tcp::{read_frame, write_frame};
use odbc_query::protocol::{ExecuteBatchFrame, QueryExecuteBatchResponse};
use std::net::{SocketAddr, TcpListener};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct LoopbackServer {
    pub addr: SocketAddr,
    frames: mpsc::Receiver<ExecuteBatchFrame>,
    handle: Option<JoinHandle<()>>,
}

impl LoopbackServer {
    /// Serves one client. `respond` maps each decoded page to a response;
    /// `delay` is slept before answering.
    pub fn start<F>(delay: Duration, respond: F) -> Self
    where
        F: Fn(&ExecuteBatchFrame) -> QueryExecuteBatchResponse + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            while let Ok(request) = read_frame(&mut stream) {
                let frame = ExecuteBatchFrame::decode(&request).expect("valid request frame");
                let response = respond(&frame).encode().expect("encodable response");
                let _ = tx.send(frame);
                thread::sleep(delay);
                if write_frame(&mut stream, &response).is_err() {
                    break;
                }
            }
        });

        Self {
            addr,
            frames: rx,
            handle: Some(handle),
        }
    }

    pub fn received(&self) -> Vec<ExecuteBatchFrame> {
        self.frames.try_iter().collect()
    }

    pub fn connection_string(&self, page_size: usize) -> String {
        format!("ADDRESS={};PAGE_SIZE={}", self.addr, page_size)
    }
}

impl Drop for LoopbackServer {
    fn drop(&mut self) {
        // The thread exits once the client side of the socket is closed.
        if let Some(handle) = self.handle.take() {
            if !thread::panicking() {
                let _ = handle.join();
            }
        }
    }
}
