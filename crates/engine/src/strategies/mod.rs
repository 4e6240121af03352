//! Per-kind retention strategies.
//!
//! Each strategy is a pure function over (desired, observed). The typed
//! ones (workload, pod) project through k8s-openapi structs; the rest
//! poke the handful of paths they care about with the generic accessor.

pub(crate) mod job;
pub(crate) mod pod;
pub(crate) mod secret;
pub(crate) mod service;
pub(crate) mod storage;
pub(crate) mod workload;
