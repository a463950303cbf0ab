//! Scenario tests for the setup pipeline

#[allow(dead_code)]
mod helpers;

mod failure_rollback;
