//! Franchise site registry with minimum-separation feasibility evaluation.
//!
//! The interesting part lives in [`placement`]: a pure feasibility engine that
//! decides whether a candidate coordinate is far enough from every Approved
//! site, and the placement policy that turns an infeasible approval attempt
//! into an automatic rejection. Everything around it (storage, geocoding, the
//! HTTP router) is a narrow collaborator.

pub mod config;
pub mod error;
pub mod geo;
pub mod placement;
pub mod telemetry;
