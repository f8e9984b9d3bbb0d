//! Solve orchestration for the dispatch engine.
//!
//! This crate owns everything between a submission request and a persisted
//! result: the idempotency gate that keeps one active solve per plan, the
//! problem assembler that encodes catalog data into a routing problem, the
//! bounded worker fabric that runs the assemble → solve → persist pipeline
//! off the request path, and the persister that atomically replaces a plan's
//! result generation.
//!
//! The entry point is [`SolveService`]: wire it with stores, a matrix
//! provider, an optimizer, and a lock service, then call
//! [`SolveService::submit`].

#![forbid(unsafe_code)]

mod assembler;
mod error;
mod fabric;
mod persister;
mod runner;
mod service;
mod transitions;

pub use assembler::ProblemAssembler;
pub use error::{AssemblyError, SubmitError};
pub use fabric::FabricConfig;
pub use service::{EngineStores, PlanRoute, SolveRequest, SolveService};
