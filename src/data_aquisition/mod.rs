/*
 * This module provides data aquisition abilities for the crate.
 * It doesn't care what it gets, just how: the CLI session state machine and
 * the telemetry walk are defined against injected transport capabilities, so
 * transports can be swapped (or mocked) without touching the parsers.
 */

pub mod core;
pub mod session;
pub mod snmp;
pub mod ssh;

#[cfg(test)]
pub(crate) mod testing;
