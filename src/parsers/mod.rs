/*
 * Pure text parsers for the per-command CLI output and telemetry walks, one
 * submodule per vendor family. Parsers never talk to a device: they take
 * lines or walk entries and return typed records, skipping silently whatever
 * does not match.
 */

pub mod hp;
