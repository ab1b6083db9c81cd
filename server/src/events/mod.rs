mod main_events;

pub use main_events::{ConnectEvent, DisconnectEvent, ErrorEvent, MainEvent, MainEvents, RequestEvent};
