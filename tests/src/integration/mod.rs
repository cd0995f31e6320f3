//! End-to-end proctoring flows.

pub mod support;

#[cfg(test)]
mod client_server_flow;
#[cfg(test)]
mod http_client;
#[cfg(test)]
mod server_rules;
