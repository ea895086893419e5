//! Relevo - personnel-transfer handover interviews
//!
//! A small service and client for transfer handovers: managers register a
//! transfer, the outgoing employee answers a guided interview, and the
//! collected handover material lands on the transfer record. Server and
//! client share the wire types, so both live in this crate; the interview
//! progression itself is a pure state machine in [`interview`].

pub mod api;
pub mod client;
pub mod db;
pub mod interview;
