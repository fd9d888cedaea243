pub mod mock;
pub mod server;

#[allow(unused_imports)]
pub use mock::{MockConnection, RecordedPage, ScriptedReply};
#[allow(unused_imports)]
pub use server::LoopbackServer;

/// Routes `log` output through the test harness; safe to call repeatedly.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn int_rows(n: i32) -> odbc_query::ParameterSet {
    odbc_query::ParameterSet::from_rows(
        (0..n)
            .map(|i| vec![odbc_query::Value::Integer(i), format!("name_{}", i).into()])
            .collect(),
    )
    .expect("uniform rows")
}
