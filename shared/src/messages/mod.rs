pub mod error;
pub mod outbox;
pub mod packet;
pub mod replication_message;
