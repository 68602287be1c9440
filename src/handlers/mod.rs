// handlers/mod.rs - two tiers: public (no auth) and protected (JWT auth).
// Role checks happen inside the protected handlers and the workflow planner.
pub mod protected;
pub mod public;
