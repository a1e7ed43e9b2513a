//! # API Gateway (ur-05)
//!
//! **Subsystem ID:** 5
//!
//! ## Purpose
//!
//! HTTP surface of the rating service: profile registration and editing,
//! sessions, moderation, profile reads and votes. Every handler delegates to
//! a subsystem port; the gateway only authenticates, authorizes and maps
//! results onto status codes.
//!
//! ## Routes
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | POST | `/api/users` | - |
//! | POST | `/api/users/login` | - |
//! | GET | `/api/users/:id` | - |
//! | GET | `/api/users?page=&limit=` | - |
//! | PUT | `/api/users/:id` | own, or staff |
//! | PUT | `/api/users/:id/password` | own, or staff |
//! | PUT | `/api/users/:id/state` | staff |
//! | DELETE | `/api/users/:id` | own, or admin |
//! | POST / PUT | `/api/vote` | session |
//! | GET | `/health` | - |
//!
//! ## Security Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | Session state re-checked on every protected request | `auth/extractor.rs` |
//! | 2 | Token signature verified before claims are parsed | `auth/session.rs` - `verify()` |
//! | 3 | Credential comparison is constant-time | `auth/hasher.rs` - `verify()` |
//! | 4 | Store error text never reaches a response body | `domain/error.rs` - `ApiError::internal()` |
//! | 5 | Profile writes drop the cached snapshot | `handlers/` - `invalidate_profile()` |
//!
//! ## Module Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs  - ApiGatewayService (listener, graceful shutdown)  │
//! │  router.rs   - AppState, route table, health                    │
//! │  handlers/   - users, votes                                     │
//! │  auth/       - SessionKeys, CredentialHasher, AuthenticatedUser │
//! │  middleware/ - CORS                                             │
//! │  domain/     - config, ApiError, password policy, bodies        │
//! └─────────────────────────────────────────────────────────────────┘
//!         ↓ AccountStore      ↓ ProfileReader       ↓ RatingApi
//!       (ur-04)              (ur-03)               (ur-02)
//! ```

pub mod auth;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;

pub use auth::{AuthenticatedUser, CredentialHasher, HmacHasher, SessionKeys};
pub use domain::*;
pub use router::{build_router, AppState};
pub use service::ApiGatewayService;
