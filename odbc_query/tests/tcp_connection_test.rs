use odbc_query::protocol::{QueryExecuteBatchRequest, QueryExecuteBatchResponse};
use odbc_query::{
    BatchQuery, Configuration, Connection, DiagnosticRecordStorage, Query, SqlResult, SqlState,
    TcpConnection,
};
use std::sync::Arc;
use std::time::Duration;

mod helpers;
use helpers::{init_logging, int_rows, LoopbackServer};

fn connect(server: &LoopbackServer, page_size: usize) -> TcpConnection {
    let config = Configuration::from_connection_string(&server.connection_string(page_size))
        .expect("valid connection string");
    TcpConnection::connect(config).expect("loopback connect")
}

#[test]
fn test_batch_over_tcp() {
    init_logging();
    let server = LoopbackServer::start(Duration::ZERO, |frame| {
        QueryExecuteBatchResponse::success(vec![1; frame.rows.len()])
    });
    let conn: Arc<dyn Connection> = Arc::new(connect(&server, 2));

    let mut q = BatchQuery::new(conn, "INSERT INTO t VALUES (?, ?)", int_rows(5), 0);
    let mut diag = DiagnosticRecordStorage::new();
    assert_eq!(q.execute(&mut diag), SqlResult::Success);
    assert_eq!(q.rows_affected(), &[1, 1, 1, 1, 1]);
    drop(q);

    let frames = server.received();
    assert_eq!(frames.len(), 3);
    assert_eq!(
        frames.iter().map(|f| f.last).collect::<Vec<_>>(),
        vec![false, false, true]
    );
}

#[test]
fn test_set_schema_changes_requests() {
    init_logging();
    let server = LoopbackServer::start(Duration::ZERO, |frame| {
        QueryExecuteBatchResponse::success(vec![0; frame.rows.len()])
    });
    let tcp = Arc::new(connect(&server, 10));
    tcp.set_schema("OTHER").unwrap();
    assert_eq!(tcp.schema(), "OTHER");

    let mut q = BatchQuery::new(tcp.clone(), "DELETE FROM t WHERE id = ?", int_rows(1), 0);
    q.execute(&mut DiagnosticRecordStorage::new());
    drop(q);
    drop(tcp);

    assert_eq!(server.received()[0].schema, "OTHER");
}

#[test]
fn test_slow_server_times_out() {
    init_logging();
    let server = LoopbackServer::start(Duration::from_secs(3), |frame| {
        QueryExecuteBatchResponse::success(vec![1; frame.rows.len()])
    });
    let tcp = connect(&server, 10);
    let params = int_rows(1);
    let request = QueryExecuteBatchRequest::new("PUBLIC", "SELECT 1", &params, 0, 1, true, 1)
        .encode()
        .unwrap();

    let err = tcp
        .sync_message(&request, 1)
        .expect_err("response arrives after the read timeout");
    assert!(err.is_timeout());
    assert_eq!(err.sql_state(), SqlState::TimeoutExpired);
}

#[test]
fn test_late_reply_never_answers_next_request() {
    init_logging();
    let server = LoopbackServer::start(Duration::from_secs(4), |frame| {
        QueryExecuteBatchResponse::success(vec![111; frame.rows.len()])
    });
    let tcp = Arc::new(connect(&server, 10));

    let mut slow = BatchQuery::new(tcp.clone(), "UPDATE t SET v = ?", int_rows(1), 1);
    let mut diag = DiagnosticRecordStorage::new();
    assert_eq!(slow.execute(&mut diag), SqlResult::Error);
    assert_eq!(diag.get_status_record(1).unwrap().sql_state, SqlState::TimeoutExpired);
    assert!(tcp.is_broken());

    let mut next = BatchQuery::new(tcp.clone(), "UPDATE t SET v = ?", int_rows(1), 0);
    let mut diag = DiagnosticRecordStorage::new();
    assert_eq!(next.execute(&mut diag), SqlResult::Error);
    assert_eq!(diag.get_status_record(1).unwrap().sql_state, SqlState::CommunicationLinkFailure);
    assert!(next.rows_affected().is_empty());
    assert_eq!(next.affected_rows(), 0);

    assert_eq!(server.received().len(), 1);
}
