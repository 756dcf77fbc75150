// Public handlers (`/`, `/health`, `GET /drinks`) take no token; every other
// drinks handler sits behind an `AuthGate` layered on in `routes`.
pub mod drinks;
pub mod system;
