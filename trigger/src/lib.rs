// Modules behind the `trigger` launcher binary.
//
// Split out of `main.rs` so the send-or-spawn flow can be tested against
// real loopback sockets.

pub mod deliver;
pub mod procs;
