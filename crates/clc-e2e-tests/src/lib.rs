//! End-to-end tests for the Hazelcast command-line client.
//!
//! These tests drive the full stack:
//! - command registration and the dynamic command tree
//! - map and queue commands against an in-memory cluster
//! - Viridian commands against a local HTTP responder
//! - token storage and cancellation

#![cfg(test)]
