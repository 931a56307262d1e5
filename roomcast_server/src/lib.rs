//! WebSocket signaling relay for WebRTC peer-to-peer connection setup.
//!
//! Clients join a named room over a persistent WebSocket; every text frame a
//! client sends is relayed to every other member of the same room. The
//! payload is opaque to the server and relayed as-is, without parsing. A
//! separate HTTP endpoint accepts file uploads tagged by room name.
//!
//! # Endpoints
//!
//! - **GET /ws/{room}** - join `room` and relay signaling messages
//! - **POST /upload/{room}** - multipart file upload, stored as `{room}-{name}`
//! - **GET /** - demo client page, **GET /static/...** - static assets
//! - **GET /health** - health check
//!
//! # Example
//!
//! ```bash
//! # Start the server
//! roomcast-server
//!
//! # Join a room from two terminals and type messages
//! websocat ws://127.0.0.1:8000/ws/my_room
//!
//! # Upload a recording for a room
//! curl -F file=@clip.webm http://127.0.0.1:8000/upload/my_room
//! ```

#![forbid(unsafe_code)]

pub mod broadcast;
pub mod config;
pub mod error;
pub mod handler;
pub mod session;
pub mod state;
pub mod upload;

pub use broadcast::broadcast;
pub use config::Config;
pub use error::{SessionEnd, UploadError};
pub use handler::{AppState, router};
pub use state::{ConnectionId, RoomId, RoomMember, RoomRegistry};
