pub mod message;
pub mod value;
pub mod wire;

pub use message::{
    ExecuteBatchFrame, QueryExecuteBatchRequest, QueryExecuteBatchResponse, RequestType,
    ResponseStatus,
};
pub use value::Value;
pub use wire::{WireReader, WireWriter};
